//! End-to-end rule runs over export fixtures.
//!
//! `woo_export.csv` is a small WooCommerce export (with a UTF-8 BOM) covering
//! every rule's interesting cases; `cc_export.csv` is the matching Cloud
//! Commerce inventory. `woo_export_clean.csv` needs no updates at all.

use std::path::PathBuf;
use wootools_core::emitter::to_csv_string;
use wootools_core::rules::{FixCategoriesRule, RuleEngine};
use wootools_core::{
    status_message, Export, RuleError, UpdateProcessor, UpdateSet, WootoolsConfig,
    WootoolsError,
};

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

fn processor() -> UpdateProcessor {
    UpdateProcessor::new(WootoolsConfig::default())
}

fn rows(updates: &UpdateSet) -> Vec<(&str, &str)> {
    updates
        .rows
        .iter()
        .map(|row| (row.id.as_str(), row.value.as_str()))
        .collect()
}

// ============================================================================
// Reading exports
// ============================================================================

mod reading {
    use super::*;

    #[test]
    fn bom_is_stripped_from_first_column() {
        let export = Export::from_path(&fixture("woo_export.csv")).unwrap();
        assert_eq!(export.header().columns()[0], "ID");
        assert!(export.header().contains("ID"));
        assert_eq!(export.len(), 7);
    }

    #[test]
    fn quoted_multiline_description_is_one_field() {
        let export = Export::from_path(&fixture("woo_export.csv")).unwrap();
        let first = &export.records()[0];
        assert_eq!(
            first.get("Description"),
            Some("Full tang blade.\nLeather sheath included.")
        );
        assert_eq!(export.records()[1].get("ID"), Some("2"));
    }
}

// ============================================================================
// Rules over the fixture export
// ============================================================================

mod rules {
    use super::*;

    #[test]
    fn fix_categories() {
        let updates = processor().fix_categories(&fixture("woo_export.csv")).unwrap();
        assert_eq!(updates.header, ["ID".to_string(), "Categories".to_string()]);
        assert_eq!(rows(&updates), vec![("2", "Home"), ("3", "Uncategorized")]);
        assert_eq!(
            to_csv_string(&updates).unwrap(),
            "ID,Categories\n2,Home\n3,Uncategorized\n"
        );
        assert_eq!(status_message(&updates), "2 update rows.");
    }

    #[test]
    fn round_prices() {
        let updates = processor().round_prices(&fixture("woo_export.csv")).unwrap();
        assert_eq!(updates.header[1], "Regular price");
        assert_eq!(
            rows(&updates),
            vec![("1", "12.75"), ("4", "6.99"), ("5", "9.99"), ("7", "24.99")]
        );
    }

    #[test]
    fn add_disclaimers() {
        let updates = processor().add_disclaimers(&fixture("woo_export.csv")).unwrap();
        assert_eq!(updates.len(), 1, "only the knife without a notice is updated");

        let row = &updates.rows[0];
        assert_eq!(row.id, "1");
        assert!(row
            .value
            .starts_with("Full tang blade.\\nLeather sheath included.\\n<br>"));
        assert!(row.value.contains("<div class='disclaimer'>"));
        assert!(!row.value.contains('\n'));
    }

    #[test]
    fn set_shipping_classes() {
        let updates = processor()
            .set_shipping_classes(&fixture("woo_export.csv"), &fixture("cc_export.csv"))
            .unwrap();
        assert_eq!(updates.header, ["ID".to_string(), "Shipping class".to_string()]);
        assert_eq!(
            rows(&updates),
            vec![("1", "Knife"), ("2", ""), ("3", "Heavy"), ("4", "Heavy")]
        );
        assert_eq!(
            to_csv_string(&updates).unwrap(),
            "ID,Shipping class\n1,Knife\n2,\n3,Heavy\n4,Heavy\n"
        );
    }
}

// ============================================================================
// Idempotence and empty runs
// ============================================================================

mod clean_export {
    use super::*;

    #[test]
    fn nothing_to_update() {
        let processor = processor();
        let export = fixture("woo_export_clean.csv");
        let runs = [
            processor.fix_categories(&export).unwrap(),
            processor.round_prices(&export).unwrap(),
            processor.add_disclaimers(&export).unwrap(),
            processor
                .set_shipping_classes(&export, &fixture("cc_export.csv"))
                .unwrap(),
        ];
        for updates in &runs {
            assert!(updates.is_empty(), "unexpected updates: {:?}", updates.rows);
            assert_eq!(status_message(updates), "No data to write.");
            assert_eq!(to_csv_string(updates).unwrap(), "");
        }
        assert_eq!(processor.rule_timings().len(), 4);
    }
}

// ============================================================================
// Failed runs
// ============================================================================

mod failures {
    use super::*;

    #[test]
    fn unknown_skus_abort_the_run_naming_each_sku() {
        let result = processor().set_shipping_classes(
            &fixture("woo_export.csv"),
            &fixture("cc_export_partial.csv"),
        );
        let (rule, failures) = match result {
            Err(WootoolsError::RuleFailures { rule, failures }) => (rule, failures),
            other => panic!("expected the shipping run to abort, got {other:?}"),
        };
        assert_eq!(rule, "SetShippingClasses");
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].row_id, "2");
        assert_eq!(
            failures[0].error,
            RuleError::ProductNotFound {
                sku: "22A-LL0-001".to_string()
            }
        );
        assert_eq!(failures[1].row_id, "6");
        assert!(failures[1].error.to_string().contains("55D-CUR-001"));
    }

    #[test]
    fn missing_column_fails_before_any_record() {
        let export = Export::from_csv_str("ID,Name\n1,Mug\n").unwrap();
        let config = WootoolsConfig::default();
        let engine = RuleEngine::new();
        let result = engine.apply(&FixCategoriesRule::new(&config), &export);
        assert!(matches!(
            result,
            Err(WootoolsError::MissingColumn { ref column, .. }) if column == "Categories"
        ));
    }

    #[test]
    fn inventory_without_sku_columns_is_rejected() {
        let result = processor().set_shipping_classes(
            &fixture("woo_export.csv"),
            &fixture("woo_export_clean.csv"),
        );
        assert!(matches!(
            result,
            Err(WootoolsError::MissingColumn { ref rule, .. }) if rule == "InventoryLookup"
        ));
    }
}
