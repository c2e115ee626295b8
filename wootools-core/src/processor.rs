use crate::config::WootoolsConfig;
use crate::error::Result;
use crate::export::Export;
use crate::inventory::InventoryLookup;
use crate::rules::{
    AddDisclaimersRule, FixCategoriesRule, RoundPricesRule, RuleEngine, SetShippingClassesRule,
    UpdateRule,
};
use crate::types::UpdateSet;
use std::path::Path;
use std::time::{Duration, Instant};

/// Runs one update rule per call, from export file paths to an update set.
pub struct UpdateProcessor {
    config: WootoolsConfig,
    rule_engine: RuleEngine,
}

impl UpdateProcessor {
    pub fn new(config: WootoolsConfig) -> Self {
        Self {
            config,
            rule_engine: RuleEngine::new(),
        }
    }

    pub fn config(&self) -> &WootoolsConfig {
        &self.config
    }

    pub fn fix_categories(&self, export_path: &Path) -> Result<UpdateSet> {
        let export = self.read(export_path)?;
        self.run(&FixCategoriesRule::new(&self.config), &export)
    }

    pub fn round_prices(&self, export_path: &Path) -> Result<UpdateSet> {
        let export = self.read(export_path)?;
        self.run(&RoundPricesRule::new(&self.config)?, &export)
    }

    pub fn add_disclaimers(&self, export_path: &Path) -> Result<UpdateSet> {
        let export = self.read(export_path)?;
        self.run(&AddDisclaimersRule::new(&self.config), &export)
    }

    /// Shipping classes for the storefront export, looked up in the Cloud
    /// Commerce inventory export.
    pub fn set_shipping_classes(&self, woo_export: &Path, cc_export: &Path) -> Result<UpdateSet> {
        let export = self.read(woo_export)?;
        let inventory = InventoryLookup::from_export(
            &self.read(cc_export)?,
            &self.config.inventory,
            &self.config.shipping.range_marker,
        )?;
        if inventory.is_empty() {
            log::warn!("{} has no inventory records", cc_export.display());
        }
        self.run(&SetShippingClassesRule::new(&self.config, &inventory), &export)
    }

    /// Per-rule timings of every rule run so far.
    pub fn rule_timings(&self) -> Vec<(String, Duration)> {
        self.rule_engine.rule_timings.borrow().clone()
    }

    fn read(&self, path: &Path) -> Result<Export> {
        let start = Instant::now();
        let export = Export::from_path(path)?;
        log::debug!(
            "Read {} records from {} in {:.0}ms",
            export.len(),
            path.display(),
            start.elapsed().as_millis()
        );
        Ok(export)
    }

    fn run(&self, rule: &dyn UpdateRule, export: &Export) -> Result<UpdateSet> {
        let start = Instant::now();
        let updates = self.rule_engine.apply(rule, export)?;
        log::debug!(
            "{} produced {} updates in {:.0}ms",
            rule.name(),
            updates.len(),
            start.elapsed().as_millis()
        );
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WootoolsError;
    use std::io::Write;
    use std::path::PathBuf;

    struct TempCsv(PathBuf);

    impl TempCsv {
        fn new(name: &str, content: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "wootools-processor-{}-{name}.csv",
                std::process::id()
            ));
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(content.as_bytes()).unwrap();
            Self(path)
        }
    }

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn fix_categories_from_file() {
        let export = TempCsv::new("categories", "ID,Categories\n1,\n2,Home\n");
        let processor = UpdateProcessor::new(WootoolsConfig::default());
        let updates = processor.fix_categories(&export.0).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates.rows[0].id, "1");
        assert_eq!(processor.rule_timings().len(), 1);
        assert_eq!(processor.rule_timings()[0].0, "FixCategories");
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let missing = Path::new("/definitely/not/here.csv");
        let processor = UpdateProcessor::new(WootoolsConfig::default());
        let result = processor.round_prices(missing);
        assert!(matches!(
            result,
            Err(WootoolsError::OpenExport { ref path, .. }) if path == missing
        ));
    }

    #[test]
    fn shipping_reads_both_exports() {
        let woo = TempCsv::new(
            "woo",
            "ID,SKU,Categories,Shipping class\n5,AB-1,Home,\n6,AB-2,Home,\n",
        );
        let cc = TempCsv::new(
            "cc",
            "VAR_SKU,RNG_SKU,OPT_Package Type,OPT_International Shipping\n\
             AB-1,RNG_AB,Courier,Standard\n\
             AB-2,RNG_AB,Packet,Standard\n",
        );
        let processor = UpdateProcessor::new(WootoolsConfig::default());
        let updates = processor.set_shipping_classes(&woo.0, &cc.0).unwrap();
        assert_eq!(updates.header, ["ID".to_string(), "Shipping class".to_string()]);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates.rows[0].id, "5");
        assert_eq!(updates.rows[0].value, "Heavy");
    }
}
