use super::engine::UpdateRule;
use crate::config::WootoolsConfig;
use crate::error::RuleError;
use crate::types::{parse_categories, ExportRecord, UpdateRow};

/// Newline as the WooCommerce export writes it inside descriptions.
const ESCAPED_NEWLINE: &str = "\\n";

const DISCLAIMER_PARAGRAPHS: [&str; 5] = [
    "DISCLAIMER:",
    "You must be 18 years or older in order to purchase this product.",
    "ID will be required on delivery to the UK. The product will not be delivered to \
     anyone under the age of 18 or without valid proof of age. The buyer is responsible \
     for any additional shipping charge incurred if ID is not available.",
    "It is the buyers obligation that they ensure they know their states rules and \
     regulation in regards to knives and to make sure they are not breaking the law by \
     purchasing knives.",
    "By purchasing from this website and you agree that you are 18 years or older and \
     understand rules and regulations in relation to knives in your own state or territory.",
];

// AddDisclaimersRule - appends the age-restriction notice to descriptions of
// products in restricted categories
pub struct AddDisclaimersRule<'a> {
    config: &'a WootoolsConfig,
    marker: String,
    disclaimer: String,
}

impl<'a> AddDisclaimersRule<'a> {
    pub fn new(config: &'a WootoolsConfig) -> Self {
        let marker = format!("<div class='{}'>", config.disclaimers.html_class);
        let mut lines = vec![format!("{ESCAPED_NEWLINE}<br>"), marker.clone()];
        lines.extend(DISCLAIMER_PARAGRAPHS.iter().map(|p| format!("\t<p>{p}</p>")));
        lines.push("</div>".to_string());
        let disclaimer = lines.join(ESCAPED_NEWLINE);
        Self {
            config,
            marker,
            disclaimer,
        }
    }

    /// The opening tag that identifies an existing disclaimer.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn disclaimer(&self) -> &str {
        &self.disclaimer
    }

    /// Whether any category, or any level of a `>` hierarchy, is restricted.
    pub fn is_restricted(&self, categories: &[String]) -> bool {
        categories.iter().any(|category| {
            category.split('>').map(str::trim).any(|level| {
                self.config
                    .disclaimers
                    .categories
                    .iter()
                    .any(|restricted| restricted == level)
            })
        })
    }

    /// Return the description with the disclaimer appended, or `None` if it
    /// already has one.
    pub fn add_disclaimer(&self, description: &str) -> Option<String> {
        if description.contains(&self.marker) {
            return None;
        }
        let escaped = description
            .replace("\r\n", ESCAPED_NEWLINE)
            .replace('\n', ESCAPED_NEWLINE);
        Some(escaped + &self.disclaimer)
    }
}

impl<'a> UpdateRule for AddDisclaimersRule<'a> {
    fn name(&self) -> &str {
        "AddDisclaimers"
    }

    fn header(&self) -> [&str; 2] {
        [
            self.config.export.id.as_str(),
            self.config.export.description.as_str(),
        ]
    }

    fn required_columns(&self) -> Vec<&str> {
        let columns = &self.config.export;
        vec![
            columns.id.as_str(),
            columns.categories.as_str(),
            columns.description.as_str(),
        ]
    }

    fn process_export_row(&self, record: &ExportRecord) -> Result<Option<UpdateRow>, RuleError> {
        let columns = &self.config.export;
        let categories = parse_categories(record.require(&columns.categories)?);
        if !self.is_restricted(&categories) {
            return Ok(None);
        }
        match self.add_disclaimer(record.require(&columns.description)?) {
            Some(description) => Ok(Some(UpdateRow::new(
                record.require(&columns.id)?,
                description,
            ))),
            None => Ok(None),
        }
    }
}
