//! Domain validation errors for canonical value types.
//!
//! These errors are returned when a value or a normalized series would
//! break one of the contract's invariants: validating `try_new`
//! constructors, the order book / k-line / trade normalizers and the
//! validating adapter decorator all report through [`DomainError`].
//!
//! # Examples
//!
//! ```
//! use tradeport::domain::error::DomainError;
//! use tradeport::domain::book::Order;
//!
//! let result = Order::try_new(25.0, 0.0);
//! assert!(matches!(result, Err(DomainError::NonPositiveAmount { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Symbol is not of the canonical `QUOTE_BASE` form.
    #[error("invalid symbol '{symbol}': {reason}")]
    InvalidSymbol {
        /// The rejected input.
        symbol: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Native symbol could not be translated back to canonical form.
    #[error("unknown native symbol '{native}'")]
    UnknownNativeSymbol {
        /// The exchange-native pair notation.
        native: String,
    },

    /// Amounts in books, orders and trades must be positive.
    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The invalid amount.
        amount: f64,
    },

    /// Prices must be positive and finite.
    #[error("price must be positive, got {price}")]
    NonPositivePrice {
        /// The invalid price.
        price: f64,
    },

    /// Balances can never go below zero.
    #[error("balance must be non-negative, got free={free} locked={locked}")]
    NegativeBalance {
        /// Free part.
        free: f64,
        /// Locked part.
        locked: f64,
    },

    /// Best ask must stay strictly above best bid.
    #[error("crossed book: best ask {best_ask} <= best bid {best_bid}")]
    CrossedBook {
        /// Lowest ask price.
        best_ask: f64,
        /// Highest bid price.
        best_bid: f64,
    },

    /// A book side is not sorted the way the contract requires.
    #[error("{side} are not sorted {expected}")]
    UnsortedBook {
        /// `asks` or `bids`.
        side: &'static str,
        /// `ascending` or `descending`.
        expected: &'static str,
    },

    /// A book side holds more levels than the configured depth.
    #[error("{side} hold {levels} levels, depth is {depth}")]
    DepthExceeded {
        /// `asks` or `bids`.
        side: &'static str,
        /// Levels returned.
        levels: usize,
        /// Configured depth.
        depth: usize,
    },

    /// OHLC values are inconsistent (`low <= open, close <= high`).
    #[error("invalid candle at {time}: {reason}")]
    InvalidCandle {
        /// Bucket time.
        time: i64,
        /// What is inconsistent.
        reason: &'static str,
    },

    /// Price and volume candles do not line up.
    #[error("misaligned k-line: {reason}")]
    MisalignedKLine {
        /// What does not line up.
        reason: String,
    },

    /// A time series is not in ascending time order.
    #[error("{series} not sorted by time at index {index}")]
    UnorderedSeries {
        /// Name of the series.
        series: &'static str,
        /// First offending position.
        index: usize,
    },

    /// The exchange has no candle interval for the requested period.
    #[error("unsupported candle period: {minutes} minutes")]
    UnsupportedCandlePeriod {
        /// Requested period.
        minutes: u32,
    },

    /// A tick/step size string could not be interpreted.
    #[error("invalid step size '{step}'")]
    InvalidStepSize {
        /// The offending step string.
        step: String,
    },
}
