use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while evaluating a rule against a single export record.
///
/// Record-local problems (an unparseable price, say) are not errors: the rule
/// returns no update for them. Everything here aborts the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("The product with SKU {sku} was not found in the Cloud Commerce export.")]
    ProductNotFound { sku: String },

    #[error("No {attribute} set for \"{sku}\"")]
    MissingAttribute { sku: String, attribute: &'static str },

    #[error("Unrecognised {attribute} \"{value}\" for \"{sku}\"")]
    UnknownAttribute {
        sku: String,
        attribute: &'static str,
        value: String,
    },

    #[error("column \"{0}\" is not present in the export")]
    MissingColumn(String),
}

/// A rule failure tied to the export row that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row_id: String,
    pub error: RuleError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row_id, self.error)
    }
}

/// Run-level errors raised by the reader, the engine and the emitter.
#[derive(Debug, Error)]
pub enum WootoolsError {
    #[error("failed to open export {}: {source}", .path.display())]
    OpenExport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read export {}: {source}", .path.display())]
    ReadExport {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("export has no header row")]
    EmptyExport,

    #[error("{rule} needs column \"{column}\", which is missing from the export header")]
    MissingColumn { rule: String, column: String },

    #[error("{rule} aborted: {} record(s) failed", .failures.len())]
    RuleFailures {
        rule: String,
        failures: Vec<RowFailure>,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WootoolsError>;
