use super::engine::UpdateRule;
use crate::config::WootoolsConfig;
use crate::error::{RuleError, WootoolsError};
use crate::price::{Price, PriceError, RoundingTable};
use crate::types::{ExportRecord, UpdateRow};

// RoundPricesRule - moves every regular price to the nearest .25/.49/.75/.99
pub struct RoundPricesRule<'a> {
    config: &'a WootoolsConfig,
    table: RoundingTable,
}

impl<'a> RoundPricesRule<'a> {
    pub fn new(config: &'a WootoolsConfig) -> Result<Self, WootoolsError> {
        let table = config.prices.rounding_table()?;
        log::debug!(
            "Price endings {:?}, minimum price {}, maximum adjustment {}p",
            table.endings(),
            table.min_price(),
            table.max_delta()
        );
        Ok(Self { config, table })
    }

    /// Return the rounded price string, or `None` if the price is already
    /// valid or cannot be rounded.
    pub fn fix_price(&self, price: &str) -> Result<Option<String>, PriceError> {
        let price = Price::parse(price)?;
        if price.pence() < 1 || self.table.is_valid_ending(price.pence_ending()) {
            return Ok(None);
        }
        Ok(Some(self.table.round(price).to_string()))
    }
}

impl<'a> UpdateRule for RoundPricesRule<'a> {
    fn name(&self) -> &str {
        "RoundPrices"
    }

    fn header(&self) -> [&str; 2] {
        [self.config.export.id.as_str(), self.config.export.price.as_str()]
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.export.id.as_str(), self.config.export.price.as_str()]
    }

    fn process_export_row(&self, record: &ExportRecord) -> Result<Option<UpdateRow>, RuleError> {
        let columns = &self.config.export;
        let id = record.require(&columns.id)?;
        match self.fix_price(record.require(&columns.price)?) {
            Ok(Some(price)) => Ok(Some(UpdateRow::new(id, price))),
            Ok(None) => Ok(None),
            // Variable products carry no regular price of their own.
            Err(PriceError::Empty) => Ok(None),
            Err(e) => {
                log::warn!("Skipping product {id}: {e}");
                Ok(None)
            }
        }
    }
}
