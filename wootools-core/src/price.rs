//! Exact penny arithmetic for retail prices.
//!
//! Prices are held as an integer count of pence so that rounding to a price
//! ending never goes through binary floating point.

use crate::error::WootoolsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("price is blank")]
    Empty,

    #[error("\"{0}\" is not a price")]
    Invalid(String),

    #[error("price \"{0}\" is negative")]
    Negative(String),
}

/// A non-negative amount of money, exact to the penny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(u64);

impl Price {
    /// Largest price `parse` accepts, so rounding arithmetic never overflows.
    pub const MAX: Price = Price(i64::MAX as u64);

    pub const fn from_pence(pence: u64) -> Self {
        Self(pence)
    }

    pub fn pence(&self) -> u64 {
        self.0
    }

    /// The two-digit fractional part, 0-99.
    pub fn pence_ending(&self) -> u8 {
        (self.0 % 100) as u8
    }

    /// Parse a decimal amount such as `12`, `12.5` or `12.50`.
    ///
    /// More than two fractional digits are rounded half-up to the penny.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        let invalid = || PriceError::Invalid(trimmed.to_string());

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }

        let pounds: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let digit = |index: usize| -> u64 {
            fraction
                .as_bytes()
                .get(index)
                .map_or(0, |b| u64::from(b - b'0'))
        };
        let mut pence = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            pence += 1;
        }

        let total = pounds
            .checked_mul(100)
            .and_then(|p| p.checked_add(pence))
            .filter(|total| *total <= Self::MAX.0)
            .ok_or_else(invalid)?;

        if negative && total > 0 {
            return Err(PriceError::Negative(trimmed.to_string()));
        }
        Ok(Self(total))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl TryFrom<String> for Price {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

/// Nearest-ending rounding for a fixed set of pence endings.
///
/// Built once per run; the largest adjustment any price can receive is
/// computed up front and only used as a sanity bound.
#[derive(Debug, Clone)]
pub struct RoundingTable {
    endings: Vec<u8>,
    candidates: Vec<i64>,
    min_price: Price,
    max_delta: i64,
}

impl RoundingTable {
    pub fn new(endings: &[u8], min_price: Price) -> Result<Self, WootoolsError> {
        if endings.is_empty() {
            return Err(WootoolsError::Config(
                "at least one price ending is required".to_string(),
            ));
        }
        if let Some(bad) = endings.iter().find(|e| **e > 99) {
            return Err(WootoolsError::Config(format!(
                "price ending {bad} is not between 0 and 99"
            )));
        }

        let mut sorted = endings.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        if !sorted.contains(&min_price.pence_ending()) {
            return Err(WootoolsError::Config(format!(
                "minimum price {min_price} does not end in a valid price ending"
            )));
        }

        // The highest ending of the previous pound sits below zero and the
        // lowest ending of the next pound above 99.
        let mut candidates: Vec<i64> = sorted.iter().map(|e| i64::from(*e)).collect();
        let lowest = candidates[0];
        let highest = candidates[candidates.len() - 1];
        candidates.push(highest - 100);
        candidates.push(lowest + 100);

        let mut table = Self {
            endings: sorted,
            candidates,
            min_price,
            max_delta: 0,
        };
        table.max_delta = (0..100u8)
            .map(|pence| table.round_delta(pence).abs())
            .max()
            .unwrap_or(0);
        Ok(table)
    }

    pub fn endings(&self) -> &[u8] {
        &self.endings
    }

    pub fn min_price(&self) -> Price {
        self.min_price
    }

    /// Largest number of pence any price is moved by.
    pub fn max_delta(&self) -> i64 {
        self.max_delta
    }

    pub fn is_valid_ending(&self, pence: u8) -> bool {
        self.endings.contains(&pence)
    }

    /// Pence to add to reach the nearest valid ending. First candidate wins ties.
    pub fn round_delta(&self, pence: u8) -> i64 {
        let pence = i64::from(pence);
        let mut best = self.candidates[0];
        for &candidate in &self.candidates[1..] {
            if (candidate - pence).abs() < (best - pence).abs() {
                best = candidate;
            }
        }
        best - pence
    }

    /// Round to the nearest valid ending, never going below the minimum price.
    pub fn round(&self, price: Price) -> Price {
        let delta = self.round_delta(price.pence_ending());
        debug_assert!(
            delta.abs() <= self.max_delta,
            "rounding delta {delta} exceeds the maximum of {}",
            self.max_delta
        );
        match price.pence().checked_add_signed(delta) {
            Some(rounded) if rounded >= self.min_price.pence() => Price::from_pence(rounded),
            _ => self.min_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn default_table() -> RoundingTable {
        RoundingTable::new(&[25, 49, 75, 99], Price::from_pence(25)).unwrap()
    }

    #[test]
    fn parses_common_price_shapes() {
        assert_eq!(Price::parse("12.50"), Ok(Price::from_pence(1250)));
        assert_eq!(Price::parse("12.5"), Ok(Price::from_pence(1250)));
        assert_eq!(Price::parse("12"), Ok(Price::from_pence(1200)));
        assert_eq!(Price::parse(" 0.01 "), Ok(Price::from_pence(1)));
        assert_eq!(Price::parse(".99"), Ok(Price::from_pence(99)));
        assert_eq!(Price::parse("3."), Ok(Price::from_pence(300)));
        assert_eq!(Price::parse("1.005"), Ok(Price::from_pence(101)));
        assert_eq!(Price::parse("1.004"), Ok(Price::from_pence(100)));
    }

    #[test]
    fn rejects_bad_prices() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("  "), Err(PriceError::Empty));
        assert_eq!(Price::parse("abc"), Err(PriceError::Invalid("abc".into())));
        assert_eq!(Price::parse("1.2.3"), Err(PriceError::Invalid("1.2.3".into())));
        assert_eq!(Price::parse("."), Err(PriceError::Invalid(".".into())));
        assert_eq!(Price::parse("-1.00"), Err(PriceError::Negative("-1.00".into())));
        assert_eq!(Price::parse("-0"), Ok(Price::from_pence(0)));
    }

    #[test]
    fn amounts_beyond_the_maximum_are_invalid() {
        assert_eq!(Price::parse("92233720368547758.07"), Ok(Price::MAX));
        assert_eq!(
            Price::parse("92233720368547758.08"),
            Err(PriceError::Invalid("92233720368547758.08".into()))
        );
        assert!(matches!(
            Price::parse("100000000000000000.10"),
            Err(PriceError::Invalid(_))
        ));
    }

    #[test]
    fn largest_price_rounds_exactly() {
        assert_eq!(
            default_table().round(Price::MAX),
            Price::from_pence(i64::MAX as u64 - 8)
        );
    }

    #[test]
    fn formats_with_two_fraction_digits() {
        assert_eq!(Price::from_pence(25).to_string(), "0.25");
        assert_eq!(Price::from_pence(105299).to_string(), "1052.99");
        assert_eq!(Price::from_pence(300).to_string(), "3.00");
    }

    #[test]
    fn default_max_delta_is_thirteen_pence() {
        assert_eq!(default_table().max_delta(), 13);
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        let table = default_table();
        // 37 is 12 from both 25 and 49.
        assert_eq!(table.round_delta(37), -12);
        // 12 is 13 from both 25 and the wrap ending.
        assert_eq!(table.round_delta(12), 13);
    }

    #[test]
    fn wrap_candidate_rounds_into_previous_pound() {
        let table = default_table();
        assert_eq!(table.round(Price::from_pence(200)), Price::from_pence(199));
        assert_eq!(table.round(Price::from_pence(1)), Price::from_pence(25));
    }

    #[test]
    fn rejects_invalid_tables() {
        assert!(RoundingTable::new(&[], Price::from_pence(25)).is_err());
        assert!(RoundingTable::new(&[25, 100], Price::from_pence(25)).is_err());
        assert!(RoundingTable::new(&[49, 99], Price::from_pence(25)).is_err());
    }

    #[test]
    fn price_deserializes_from_string() {
        let price: Price = serde_yaml::from_str("\"0.25\"").unwrap();
        assert_eq!(price, Price::from_pence(25));
        assert!(serde_yaml::from_str::<Price>("\"-1\"").is_err());
    }

    proptest! {
        #[test]
        fn every_ending_rounds_onto_a_valid_ending(pence in 0u8..100) {
            let table = default_table();
            let delta = table.round_delta(pence);
            prop_assert!(delta.abs() <= table.max_delta());
            let ending = (i64::from(pence) + delta).rem_euclid(100) as u8;
            prop_assert!(table.is_valid_ending(ending));
        }

        #[test]
        fn rounded_prices_stay_within_bounds(pence in 1u64..1_500_000) {
            let table = default_table();
            let price = Price::from_pence(pence);
            let rounded = table.round(price);
            prop_assert!(rounded >= table.min_price());
            prop_assert!(table.is_valid_ending(rounded.pence_ending()));
            prop_assert!(rounded.pence() as i64 >= pence as i64 - table.max_delta());
            prop_assert!(
                rounded == table.min_price()
                    || rounded.pence() as i64 <= pence as i64 + table.max_delta()
            );
        }
    }
}
