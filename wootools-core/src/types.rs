use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ===== EXPORT COLUMN NAMES =====
// WooCommerce product export columns read by the rules.

pub const ID: &str = "ID";
pub const SKU: &str = "SKU";
pub const CATEGORIES: &str = "Categories";
pub const SHIPPING_CLASS: &str = "Shipping class";
pub const PRICE: &str = "Regular price";
pub const DESCRIPTION: &str = "Description";

// Cloud Commerce product export columns used by the inventory lookup.

pub const CC_SKU: &str = "VAR_SKU";
pub const CC_RANGE_SKU: &str = "RNG_SKU";
pub const CC_PACKAGE_TYPE: &str = "OPT_Package Type";
pub const CC_INTERNATIONAL_SHIPPING: &str = "OPT_International Shipping";

// ===== RECORDS =====

/// Column names of an export, with a name -> position index.
///
/// When a name appears more than once the first column wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    pub fn new(columns: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Self { columns, index }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }
}

/// One exported row, addressed by column name through a shared header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    header: Arc<Header>,
    values: Vec<String>,
}

impl ExportRecord {
    pub fn new(header: Arc<Header>, values: Vec<String>) -> Self {
        Self { header, values }
    }

    /// Build a standalone record from `(column, value)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let header = Header::new(pairs.iter().map(|(name, _)| name.to_string()).collect());
        let values = pairs.iter().map(|(_, value)| value.to_string()).collect();
        Self::new(Arc::new(header), values)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .position(column)
            .and_then(|position| self.values.get(position))
            .map(String::as_str)
    }

    pub fn require(&self, column: &str) -> Result<&str, RuleError> {
        self.get(column)
            .ok_or_else(|| RuleError::MissingColumn(column.to_string()))
    }
}

// ===== UPDATES =====

/// A single corrective import row: the product ID and the field's new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRow {
    pub id: String,
    pub value: String,
}

impl UpdateRow {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Everything one rule produced for one export, in export order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSet {
    pub header: [String; 2],
    pub rows: Vec<UpdateRow>,
}

impl UpdateSet {
    pub fn new(id_column: &str, field_column: &str) -> Self {
        Self {
            header: [id_column.to_string(), field_column.to_string()],
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ===== SHIPPING =====

/// WooCommerce shipping classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShippingClass {
    Standard,
    Heavy,
    Knife,
}

impl ShippingClass {
    /// The value stored in the export's "Shipping class" column.
    pub fn label(&self) -> &'static str {
        match self {
            ShippingClass::Standard => "",
            ShippingClass::Heavy => "Heavy",
            ShippingClass::Knife => "Knife",
        }
    }
}

impl fmt::Display for ShippingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cloud Commerce package types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageType {
    Packet,
    LargeLetter,
    LargeLetterSingle,
    HeavyAndLarge,
    Courier,
}

impl PackageType {
    pub const ALL: [PackageType; 5] = [
        PackageType::Packet,
        PackageType::LargeLetter,
        PackageType::LargeLetterSingle,
        PackageType::HeavyAndLarge,
        PackageType::Courier,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PackageType::Packet => "Packet",
            PackageType::LargeLetter => "Large Letter",
            PackageType::LargeLetterSingle => "Large Letter (Single)",
            PackageType::HeavyAndLarge => "Heavy and Large",
            PackageType::Courier => "Courier",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    pub fn is_heavy(&self) -> bool {
        matches!(self, PackageType::HeavyAndLarge | PackageType::Courier)
    }
}

/// Cloud Commerce international shipping options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternationalShipping {
    Standard,
    Express,
    NoInternationalShipping,
}

impl InternationalShipping {
    pub const ALL: [InternationalShipping; 3] = [
        InternationalShipping::Standard,
        InternationalShipping::Express,
        InternationalShipping::NoInternationalShipping,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InternationalShipping::Standard => "Standard",
            InternationalShipping::Express => "Express",
            InternationalShipping::NoInternationalShipping => "No International Shipping",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    pub fn is_heavy(&self) -> bool {
        matches!(
            self,
            InternationalShipping::Express | InternationalShipping::NoInternationalShipping
        )
    }
}

// ===== CATEGORIES =====

/// Split an export categories field into trimmed, non-empty categories.
pub fn parse_categories(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join categories the way the WooCommerce importer expects them.
pub fn format_categories(categories: &[String]) -> String {
    categories.join(", ")
}
