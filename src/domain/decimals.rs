//! Per-symbol precision rules for order placement.
//!
//! Exchanges reject orders that carry more decimal places than a pair
//! allows. Callers round through [`Decimals`] before calling `buy`/`sell`.
//! Rounding always truncates toward zero so a rounded amount never exceeds
//! what the caller asked for (or can afford).

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Decimal places allowed for prices and amounts of one symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decimals {
    pub price_decimal: u32,
    pub amount_decimal: u32,
}

impl Decimals {
    #[must_use]
    pub const fn new(price_decimal: u32, amount_decimal: u32) -> Self {
        Self {
            price_decimal,
            amount_decimal,
        }
    }

    /// Derive precision from tick and step sizes such as `"0.01000000"`.
    ///
    /// # Errors
    ///
    /// Fails if either size is not a positive decimal number.
    pub fn from_steps(tick_size: &str, step_size: &str) -> Result<Self, DomainError> {
        Ok(Self {
            price_decimal: places_of(tick_size)?,
            amount_decimal: places_of(step_size)?,
        })
    }

    /// Truncate a price to the allowed decimal places.
    ///
    /// Values a `Decimal` cannot hold (NaN, infinities, magnitudes above
    /// roughly 7.9e28) come back unchanged and never satisfy
    /// [`fits_price`](Self::fits_price).
    #[must_use]
    pub fn round_price(&self, price: f64) -> f64 {
        truncate(price, self.price_decimal)
    }

    /// Truncate an amount to the allowed decimal places. Unrepresentable
    /// values pass through as for [`round_price`](Self::round_price).
    #[must_use]
    pub fn round_amount(&self, amount: f64) -> f64 {
        truncate(amount, self.amount_decimal)
    }

    /// Price rendered with exactly the allowed number of decimals.
    ///
    /// Unrepresentable values fall back to `f64` formatting, so NaN renders
    /// as `NaN` and infinities as `inf`.
    #[must_use]
    pub fn format_price(&self, price: f64) -> String {
        format_truncated(price, self.price_decimal)
    }

    /// Amount rendered with exactly the allowed number of decimals.
    #[must_use]
    pub fn format_amount(&self, amount: f64) -> String {
        format_truncated(amount, self.amount_decimal)
    }

    /// True if `price` already fits the precision.
    #[must_use]
    pub fn fits_price(&self, price: f64) -> bool {
        fits(price, self.price_decimal)
    }

    /// True if `amount` already fits the precision.
    #[must_use]
    pub fn fits_amount(&self, amount: f64) -> bool {
        fits(amount, self.amount_decimal)
    }
}

fn places_of(step: &str) -> Result<u32, DomainError> {
    let invalid = || DomainError::InvalidStepSize {
        step: step.to_string(),
    };
    let value = Decimal::from_str(step.trim()).map_err(|_| invalid())?;
    if value <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(value.normalize().scale())
}

fn truncated(value: f64, places: u32) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp_with_strategy(places, RoundingStrategy::ToZero))
}

fn truncate(value: f64, places: u32) -> f64 {
    truncated(value, places)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

fn format_truncated(value: f64, places: u32) -> String {
    match truncated(value, places) {
        Some(mut d) => {
            d.rescale(places);
            d.to_string()
        }
        None => format!("{value:.*}", places as usize),
    }
}

fn fits(value: f64, places: u32) -> bool {
    Decimal::from_f64(value).is_some_and(|d| d.normalize().scale() <= places)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_steps_counts_significant_places() {
        let decs = Decimals::from_steps("0.01000000", "0.00100000").unwrap();
        assert_eq!(decs, Decimals::new(2, 3));

        let whole = Decimals::from_steps("1.00000000", "10").unwrap();
        assert_eq!(whole, Decimals::new(0, 0));
    }

    #[test]
    fn from_steps_accepts_rendered_decimals() {
        use rust_decimal_macros::dec;

        let tick = dec!(0.00001000).to_string();
        let step = dec!(1).to_string();
        assert_eq!(Decimals::from_steps(&tick, &step).unwrap(), Decimals::new(5, 0));
    }

    #[test]
    fn from_steps_rejects_garbage() {
        assert!(Decimals::from_steps("abc", "0.1").is_err());
        assert!(Decimals::from_steps("0.1", "0").is_err());
        assert!(Decimals::from_steps("-0.1", "0.1").is_err());
    }

    #[test]
    fn rounding_truncates_toward_zero() {
        let decs = Decimals::new(2, 3);
        assert_eq!(decs.round_price(25.4789), 25.47);
        assert_eq!(decs.round_amount(1.23456), 1.234);
        assert_eq!(decs.round_amount(0.0009), 0.0);
    }

    #[test]
    fn rounded_values_fit() {
        let decs = Decimals::new(4, 2);
        for value in [0.123456, 98765.4321, 1.0, 3.3333333] {
            assert!(decs.fits_price(decs.round_price(value)));
            assert!(decs.fits_amount(decs.round_amount(value)));
            assert!(decs.round_price(value) <= value);
        }
        assert!(!decs.fits_amount(0.123));
    }

    #[test]
    fn unrepresentable_values_pass_through() {
        let decs = Decimals::new(2, 3);

        assert!(decs.round_price(f64::NAN).is_nan());
        assert_eq!(decs.round_amount(f64::INFINITY), f64::INFINITY);
        assert_eq!(decs.round_price(1e30), 1e30);
        assert_eq!(decs.format_price(f64::NAN), "NaN");
        assert_eq!(decs.format_amount(f64::NEG_INFINITY), "-inf");
        assert!(!decs.fits_price(f64::NAN));
        assert!(!decs.fits_amount(f64::INFINITY));
        assert!(!decs.fits_price(1e30));
    }

    #[test]
    fn format_pads_to_precision() {
        let decs = Decimals::new(3, 0);
        assert_eq!(decs.format_price(25.1), "25.100");
        assert_eq!(decs.format_amount(7.9), "7");
    }

    #[test]
    fn serializes_with_contract_field_names() {
        let json = serde_json::to_value(Decimals::new(2, 6)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"priceDecimal": 2, "amountDecimal": 6})
        );
    }
}
