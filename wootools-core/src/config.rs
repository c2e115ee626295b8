use crate::error::WootoolsError;
use crate::price::{Price, RoundingTable};
use crate::types::{self, ShippingClass};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WootoolsConfig {
    /// Column names in the WooCommerce product export
    #[serde(default)]
    pub export: ExportColumns,
    /// Column names in the Cloud Commerce product export
    #[serde(default)]
    pub inventory: InventoryColumns,
    #[serde(default)]
    pub categories: CategoriesConfig,
    #[serde(default)]
    pub prices: PricesConfig,
    #[serde(default)]
    pub shipping: ShippingConfig,
    #[serde(default)]
    pub disclaimers: DisclaimersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportColumns {
    pub id: String,
    pub sku: String,
    pub categories: String,
    pub shipping_class: String,
    pub price: String,
    pub description: String,
}

impl Default for ExportColumns {
    fn default() -> Self {
        Self {
            id: types::ID.to_string(),
            sku: types::SKU.to_string(),
            categories: types::CATEGORIES.to_string(),
            shipping_class: types::SHIPPING_CLASS.to_string(),
            price: types::PRICE.to_string(),
            description: types::DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryColumns {
    /// Unit (variation) SKU
    pub sku: String,
    /// Range (parent product) SKU
    pub range_sku: String,
    pub package_type: String,
    pub international_shipping: String,
}

impl Default for InventoryColumns {
    fn default() -> Self {
        Self {
            sku: types::CC_SKU.to_string(),
            range_sku: types::CC_RANGE_SKU.to_string(),
            package_type: types::CC_PACKAGE_TYPE.to_string(),
            international_shipping: types::CC_INTERNATIONAL_SHIPPING.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesConfig {
    /// Category given to products that have none
    pub uncategorized: String,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            uncategorized: "Uncategorized".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricesConfig {
    /// Allowed pence endings (0-99)
    pub endings: Vec<u8>,
    /// Prices are never rounded below this
    pub min_price: Price,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            endings: vec![25, 49, 75, 99],
            min_price: Price::from_pence(25),
        }
    }
}

impl PricesConfig {
    pub fn rounding_table(&self) -> Result<RoundingTable, WootoolsError> {
        RoundingTable::new(&self.endings, self.min_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingConfig {
    /// SKUs containing this marker are looked up by their first two `_` segments
    pub range_marker: String,
    /// Categories that force a shipping class regardless of package type
    pub category_overrides: BTreeMap<String, ShippingClass>,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        let mut category_overrides = BTreeMap::new();
        category_overrides.insert(
            "Sports and Leisure > Knives".to_string(),
            ShippingClass::Knife,
        );
        Self {
            range_marker: "RNG".to_string(),
            category_overrides,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclaimersConfig {
    /// Products in these categories get the age disclaimer
    pub categories: Vec<String>,
    /// CSS class of the disclaimer `<div>`, also used to detect it
    pub html_class: String,
}

impl Default for DisclaimersConfig {
    fn default() -> Self {
        Self {
            categories: vec!["Knives".to_string()],
            html_class: "disclaimer".to_string(),
        }
    }
}

impl WootoolsConfig {
    /// Load config from file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        let config: WootoolsConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                log::warn!("Failed to load config from {p} ({e:#}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), WootoolsError> {
        self.prices.rounding_table()?;
        if self.shipping.range_marker.is_empty() {
            return Err(WootoolsError::Config(
                "shipping.range_marker must not be empty".to_string(),
            ));
        }
        if self.disclaimers.html_class.trim().is_empty() {
            return Err(WootoolsError::Config(
                "disclaimers.html_class must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
