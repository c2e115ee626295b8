use super::engine::UpdateRule;
use crate::config::WootoolsConfig;
use crate::error::RuleError;
use crate::types::{format_categories, parse_categories, ExportRecord, UpdateRow};

// FixCategoriesRule - every product ends up in a category, and "Uncategorized"
// only stays on products that have nothing else
pub struct FixCategoriesRule<'a> {
    config: &'a WootoolsConfig,
}

impl<'a> FixCategoriesRule<'a> {
    pub fn new(config: &'a WootoolsConfig) -> Self {
        Self { config }
    }
}

impl<'a> UpdateRule for FixCategoriesRule<'a> {
    fn name(&self) -> &str {
        "FixCategories"
    }

    fn header(&self) -> [&str; 2] {
        [
            self.config.export.id.as_str(),
            self.config.export.categories.as_str(),
        ]
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![
            self.config.export.id.as_str(),
            self.config.export.categories.as_str(),
        ]
    }

    fn process_export_row(&self, record: &ExportRecord) -> Result<Option<UpdateRow>, RuleError> {
        let columns = &self.config.export;
        let categories = parse_categories(record.require(&columns.categories)?);
        let fixed = update_categories(&categories, &self.config.categories.uncategorized);
        match fixed {
            Some(fixed) => Ok(Some(UpdateRow::new(
                record.require(&columns.id)?,
                format_categories(&fixed),
            ))),
            None => Ok(None),
        }
    }
}

/// Return the corrected category list, or `None` if no change is needed.
pub fn update_categories(categories: &[String], uncategorized: &str) -> Option<Vec<String>> {
    if categories.is_empty() {
        return Some(vec![uncategorized.to_string()]);
    }
    let others: Vec<String> = categories
        .iter()
        .filter(|category| category.as_str() != uncategorized)
        .cloned()
        .collect();
    if others.is_empty() || others.len() == categories.len() {
        return None;
    }
    Some(others)
}
