// Update rules - one module per corrective rule:
// - engine.rs: UpdateRule trait and the RuleEngine that runs a rule over an export
// - categories.rs: Uncategorized normalization
// - prices.rs: price ending rounding
// - shipping.rs: shipping class from Cloud Commerce package settings
// - disclaimers.rs: age-restriction disclaimer for knife products

pub mod categories;
pub mod disclaimers;
pub mod engine;
pub mod prices;
pub mod shipping;

pub use categories::FixCategoriesRule;
pub use disclaimers::AddDisclaimersRule;
pub use engine::*;
pub use prices::RoundPricesRule;
pub use shipping::SetShippingClassesRule;
