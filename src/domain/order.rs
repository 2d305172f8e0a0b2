//! Placed orders and their closed enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of an order or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire literal.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Filled,
    NotFilled,
    PartiallyFilled,
}

impl Status {
    /// Wire literal.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filled => "FILLED",
            Self::NotFilled => "NOT_FILLED",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
        }
    }

    /// Status for an executed quantity out of a requested one.
    #[must_use]
    pub fn from_fill(requested: f64, executed: f64) -> Self {
        if executed <= 0.0 {
            Self::NotFilled
        } else if executed + f64::EPSILON * requested.abs().max(1.0) >= requested {
            Self::Filled
        } else {
            Self::PartiallyFilled
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order as placed on, or reported by, an exchange.
///
/// For a `QUOTE_BASE` symbol, `left_*` amounts are in QUOTE (the price
/// currency) and `right_*` amounts are in BASE (the order quantity).
/// Executed fields stay at zero until something fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakedOrder {
    /// Exchange order id, always set.
    pub id: String,
    pub status: Status,
    /// Requested amount in the quote currency.
    pub left_amount: f64,
    /// Requested amount in the base currency.
    pub right_amount: f64,
    pub left_amount_executed: f64,
    pub right_amount_executed: f64,
    /// Fee charged so far, in the currency received.
    pub commission: f64,
    /// Requested limit price.
    pub price: f64,
    /// Average execution price.
    pub price_executed: f64,
    pub side: Side,
}

impl MakedOrder {
    /// An order the exchange accepted but has not filled yet.
    ///
    /// Only the id and the enums are guaranteed; executed fields are zero.
    #[must_use]
    pub fn unfilled(id: impl Into<String>, side: Side) -> Self {
        Self {
            id: id.into(),
            status: Status::NotFilled,
            left_amount: 0.0,
            right_amount: 0.0,
            left_amount_executed: 0.0,
            right_amount_executed: 0.0,
            commission: 0.0,
            price: 0.0,
            price_executed: 0.0,
            side,
        }
    }

    /// Attach the requested quantity and limit price.
    #[must_use]
    pub fn with_request(mut self, amount: f64, price: f64) -> Self {
        self.right_amount = amount;
        self.left_amount = amount * price;
        self.price = price;
        self
    }

    /// Record an execution of `amount` at average `price`, plus fees.
    ///
    /// The status is recomputed from the requested amount.
    #[must_use]
    pub fn with_execution(mut self, amount: f64, price: f64, commission: f64) -> Self {
        self.right_amount_executed = amount;
        self.left_amount_executed = amount * price;
        self.price_executed = if amount > 0.0 { price } else { 0.0 };
        self.commission = commission;
        self.status = Status::from_fill(self.right_amount, amount);
        self
    }

    /// Requested base quantity still open.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        (self.right_amount - self.right_amount_executed).max(0.0)
    }

    /// True once nothing is left to fill.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.status == Status::Filled
    }

    /// True if any executed field is non-zero.
    #[must_use]
    pub fn has_execution(&self) -> bool {
        self.left_amount_executed != 0.0
            || self.right_amount_executed != 0.0
            || self.price_executed != 0.0
            || self.commission != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_wire_literals() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"SELL\"");
        assert_eq!(
            serde_json::to_string(&Status::NotFilled).unwrap(),
            "\"NOT_FILLED\""
        );
        assert_eq!(
            serde_json::to_string(&Status::PartiallyFilled).unwrap(),
            "\"PARTIALLY_FILLED\""
        );
        assert!(serde_json::from_str::<Side>("\"HOLD\"").is_err());
    }

    #[test]
    fn unfilled_order_has_no_execution() {
        let order = MakedOrder::unfilled("42", Side::Buy).with_request(0.01, 25.0);

        assert_eq!(order.status, Status::NotFilled);
        assert_eq!(order.right_amount, 0.01);
        assert!((order.left_amount - 0.25).abs() < 1e-12);
        assert!(!order.has_execution());
        assert_eq!(order.remaining(), 0.01);
    }

    #[test]
    fn execution_updates_status() {
        let partial = MakedOrder::unfilled("1", Side::Sell)
            .with_request(2.0, 10.0)
            .with_execution(0.5, 10.0, 0.005);
        assert_eq!(partial.status, Status::PartiallyFilled);
        assert_eq!(partial.remaining(), 1.5);

        let full = partial.with_execution(2.0, 10.0, 0.02);
        assert!(full.is_filled());
        assert_eq!(full.left_amount_executed, 20.0);
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let json = serde_json::to_value(MakedOrder::unfilled("7", Side::Buy)).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in [
            "id",
            "status",
            "leftAmount",
            "rightAmount",
            "leftAmountExecuted",
            "rightAmountExecuted",
            "commission",
            "price",
            "priceExecuted",
            "side",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}
