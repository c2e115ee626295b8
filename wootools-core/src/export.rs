//! Reading product exports.
//!
//! Both the WooCommerce and the Cloud Commerce exports are plain CSV files
//! with a header row, optionally prefixed with a UTF-8 byte order mark.

use crate::error::{Result, WootoolsError};
use crate::types::{ExportRecord, Header};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use std::sync::Arc;

const UTF8_BOM: &str = "\u{feff}";

/// An export file held in memory: a shared header and its records in file order.
#[derive(Debug, Clone)]
pub struct Export {
    header: Arc<Header>,
    records: Vec<ExportRecord>,
}

impl Export {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| WootoolsError::OpenExport {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_csv_str(&content).map_err(|e| match e {
            WootoolsError::Csv(source) => WootoolsError::ReadExport {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_csv_str(content: &str) -> Result<Self> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(WootoolsError::EmptyExport);
        }
        let header = Arc::new(Header::new(columns));

        let mut records = Vec::new();
        for result in reader.records() {
            let row: StringRecord = result?;
            let values = row.iter().map(str::to_string).collect();
            records.push(ExportRecord::new(Arc::clone(&header), values));
        }

        log::debug!(
            "Read export with {} columns and {} records",
            header.columns().len(),
            records.len()
        );
        Ok(Self { header, records })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn records(&self) -> &[ExportRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Export {
    type Item = &'a ExportRecord;
    type IntoIter = std::slice::Iter<'a, ExportRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
