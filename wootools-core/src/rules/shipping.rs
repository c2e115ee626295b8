use super::engine::UpdateRule;
use crate::config::WootoolsConfig;
use crate::error::RuleError;
use crate::inventory::InventoryLookup;
use crate::types::{
    parse_categories, ExportRecord, InternationalShipping, PackageType, ShippingClass, UpdateRow,
};

const PACKAGE_TYPE: &str = "Package Type";
const INTERNATIONAL_SHIPPING: &str = "International Shipping";

// SetShippingClassesRule - derives each product's shipping class from its
// Cloud Commerce package settings, unless a category forces one
pub struct SetShippingClassesRule<'a> {
    config: &'a WootoolsConfig,
    inventory: &'a InventoryLookup,
}

impl<'a> SetShippingClassesRule<'a> {
    pub fn new(config: &'a WootoolsConfig, inventory: &'a InventoryLookup) -> Self {
        Self { config, inventory }
    }

    /// Package type and international shipping of the inventory record for `sku`.
    pub fn get_package_types(
        &self,
        sku: &str,
    ) -> Result<(PackageType, InternationalShipping), RuleError> {
        let columns = &self.config.inventory;
        let record = self.inventory.resolve(sku)?;
        let inventory_sku = record.get(&columns.sku).unwrap_or(sku);

        let package_type =
            required_attribute(record, &columns.package_type, inventory_sku, PACKAGE_TYPE)?;
        let package_type =
            PackageType::from_label(package_type).ok_or_else(|| RuleError::UnknownAttribute {
                sku: inventory_sku.to_string(),
                attribute: PACKAGE_TYPE,
                value: package_type.to_string(),
            })?;

        let shipping = required_attribute(
            record,
            &columns.international_shipping,
            inventory_sku,
            INTERNATIONAL_SHIPPING,
        )?;
        let shipping = InternationalShipping::from_label(shipping).ok_or_else(|| {
            RuleError::UnknownAttribute {
                sku: inventory_sku.to_string(),
                attribute: INTERNATIONAL_SHIPPING,
                value: shipping.to_string(),
            }
        })?;

        Ok((package_type, shipping))
    }

    /// The forced class for the last overridden category in the list, if any.
    pub fn category_override(&self, categories: &[String]) -> Option<ShippingClass> {
        categories
            .iter()
            .filter_map(|category| self.config.shipping.category_overrides.get(category))
            .last()
            .copied()
    }
}

fn required_attribute<'r>(
    record: &'r ExportRecord,
    column: &str,
    sku: &str,
    attribute: &'static str,
) -> Result<&'r str, RuleError> {
    let value = record.get(column).unwrap_or_default().trim();
    if value.is_empty() {
        return Err(RuleError::MissingAttribute {
            sku: sku.to_string(),
            attribute,
        });
    }
    Ok(value)
}

/// Shipping class for a package type and international shipping option.
pub fn get_shipping_class(
    package_type: PackageType,
    international_shipping: InternationalShipping,
) -> ShippingClass {
    if package_type.is_heavy() || international_shipping.is_heavy() {
        ShippingClass::Heavy
    } else {
        ShippingClass::Standard
    }
}

impl<'a> UpdateRule for SetShippingClassesRule<'a> {
    fn name(&self) -> &str {
        "SetShippingClasses"
    }

    fn header(&self) -> [&str; 2] {
        [
            self.config.export.id.as_str(),
            self.config.export.shipping_class.as_str(),
        ]
    }

    fn required_columns(&self) -> Vec<&str> {
        let columns = &self.config.export;
        vec![
            columns.id.as_str(),
            columns.sku.as_str(),
            columns.categories.as_str(),
            columns.shipping_class.as_str(),
        ]
    }

    fn process_export_row(&self, record: &ExportRecord) -> Result<Option<UpdateRow>, RuleError> {
        let columns = &self.config.export;
        let sku = record.require(&columns.sku)?.trim();
        if sku.is_empty() {
            return Ok(None);
        }

        let categories = parse_categories(record.require(&columns.categories)?);
        let shipping_class = match self.category_override(&categories) {
            Some(forced) => forced,
            None => {
                let (package_type, international_shipping) = self.get_package_types(sku)?;
                get_shipping_class(package_type, international_shipping)
            }
        };

        let existing = record.require(&columns.shipping_class)?;
        if shipping_class.label() == existing {
            return Ok(None);
        }
        Ok(Some(UpdateRow::new(
            record.require(&columns.id)?,
            shipping_class.label(),
        )))
    }
}
