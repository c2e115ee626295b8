use crate::error::{Result, RowFailure, RuleError, WootoolsError};
use crate::export::Export;
use crate::types::{ExportRecord, UpdateRow, UpdateSet};
use std::cell::RefCell;
use std::time::{Duration, Instant};

/// A corrective update rule: one export record in, at most one update row out.
///
/// Returning `Ok(None)` means the record needs no change (or cannot be
/// changed safely). Returning an error aborts the whole run.
pub trait UpdateRule {
    fn name(&self) -> &str;

    /// Output header, `[ID, <updated field>]`.
    fn header(&self) -> [&str; 2];

    /// Export columns the rule reads.
    fn required_columns(&self) -> Vec<&str>;

    fn process_export_row(
        &self,
        record: &ExportRecord,
    ) -> std::result::Result<Option<UpdateRow>, RuleError>;
}

pub struct RuleEngine {
    pub rule_timings: RefCell<Vec<(String, Duration)>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rule_timings: RefCell::new(Vec::new()),
        }
    }

    /// Evaluate `rule` against every export record, keeping export order.
    ///
    /// All record failures are collected before returning, so the caller sees
    /// every offending row at once. No update set is produced in that case.
    pub fn apply(&self, rule: &dyn UpdateRule, export: &Export) -> Result<UpdateSet> {
        let rule_start = Instant::now();
        log::info!("Applying rule {} to {} records", rule.name(), export.len());

        for column in rule.required_columns() {
            if !export.header().contains(column) {
                return Err(WootoolsError::MissingColumn {
                    rule: rule.name().to_string(),
                    column: column.to_string(),
                });
            }
        }

        let [id_column, field_column] = rule.header();
        let mut updates = UpdateSet::new(id_column, field_column);
        let mut failures = Vec::new();

        for record in export {
            match rule.process_export_row(record) {
                Ok(Some(row)) => updates.rows.push(row),
                Ok(None) => {}
                Err(error) => {
                    let row_id = record.get(id_column).unwrap_or_default().to_string();
                    log::error!("{}: row {row_id}: {error}", rule.name());
                    failures.push(RowFailure { row_id, error });
                }
            }
        }

        self.rule_timings
            .borrow_mut()
            .push((rule.name().to_string(), rule_start.elapsed()));

        if !failures.is_empty() {
            return Err(WootoolsError::RuleFailures {
                rule: rule.name().to_string(),
                failures,
            });
        }

        log::info!(
            "   {} produced {} updates from {} records",
            rule.name(),
            updates.len(),
            export.len()
        );
        Ok(updates)
    }
}
