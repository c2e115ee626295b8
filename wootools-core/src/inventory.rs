use crate::config::InventoryColumns;
use crate::error::{Result, RuleError, WootoolsError};
use crate::export::Export;
use crate::types::ExportRecord;
use std::collections::HashMap;

/// Cloud Commerce export rows indexed by both unit SKU and range SKU.
#[derive(Debug, Clone)]
pub struct InventoryLookup {
    records: Vec<ExportRecord>,
    by_sku: HashMap<String, usize>,
    range_marker: String,
}

impl InventoryLookup {
    pub fn from_export(
        export: &Export,
        columns: &InventoryColumns,
        range_marker: &str,
    ) -> Result<Self> {
        for column in [&columns.sku, &columns.range_sku] {
            if !export.header().contains(column) {
                return Err(WootoolsError::MissingColumn {
                    rule: "InventoryLookup".to_string(),
                    column: column.clone(),
                });
            }
        }

        let records = export.records().to_vec();
        let mut by_sku = HashMap::with_capacity(records.len() * 2);
        for (position, record) in records.iter().enumerate() {
            for column in [&columns.sku, &columns.range_sku] {
                let code = record.get(column).unwrap_or_default().trim();
                if !code.is_empty() {
                    by_sku.insert(code.to_string(), position);
                }
            }
        }

        log::info!(
            "Indexed {} inventory records under {} SKUs",
            records.len(),
            by_sku.len()
        );
        Ok(Self {
            records,
            by_sku,
            range_marker: range_marker.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&ExportRecord> {
        self.by_sku.get(code).map(|&position| &self.records[position])
    }

    /// Find the inventory record for a storefront SKU.
    ///
    /// The SKU itself is tried first, then its range key.
    pub fn resolve(&self, sku: &str) -> std::result::Result<&ExportRecord, RuleError> {
        self.get(sku)
            .or_else(|| self.get(&range_key(sku, &self.range_marker)))
            .ok_or_else(|| RuleError::ProductNotFound {
                sku: sku.to_string(),
            })
    }
}

/// Derive the range-level lookup key from a unit SKU.
///
/// SKUs carrying the range marker keep their first two `_` segments
/// (`RNG_ABC-123_RED` -> `RNG_ABC-123`); others keep only the first.
pub fn range_key(sku: &str, range_marker: &str) -> String {
    let segments = if sku.contains(range_marker) { 2 } else { 1 };
    sku.split('_').take(segments).collect::<Vec<_>>().join("_")
}
