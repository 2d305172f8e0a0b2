//! Executed market trades and side inference.
//!
//! Some exchanges do not say whether a trade was buyer- or seller-initiated.
//! [`normalize_trades`] fills the gap from the price move: a trade priced
//! above the previous one is a buy, below it a sell. An unchanged price says
//! nothing about the aggressor, and the first trade of a window has nothing
//! to compare against, so an unreported side stays `None` in both cases.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::order::Side;

/// Most trades a history carries.
pub const MAX_TRADES: usize = 100;

/// One executed market trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Execution time, Unix seconds.
    pub time: i64,
    /// Quantity in the base currency.
    pub amount: f64,
    /// Price in the quote currency.
    pub price: f64,
    /// Aggressor side; `None` when neither reported nor inferable.
    pub side: Option<Side>,
}

impl Trade {
    #[must_use]
    pub const fn new(time: i64, amount: f64, price: f64, side: Option<Side>) -> Self {
        Self {
            time,
            amount,
            price,
            side,
        }
    }
}

/// Sort ascending by time, keep the [`MAX_TRADES`] most recent trades and
/// infer every missing side from the previous trade's price.
///
/// Trades sharing a timestamp keep the exchange's relative order.
#[must_use]
pub fn normalize_trades(mut trades: Vec<Trade>) -> Vec<Trade> {
    trades.sort_by_key(|trade| trade.time);
    let excess = trades.len().saturating_sub(MAX_TRADES);
    trades.drain(..excess);
    infer_sides(&mut trades);
    trades
}

/// Fill missing sides in an already ordered window, in place.
///
/// Reported sides are kept; their prices still serve as the reference for
/// the next trade.
pub fn infer_sides(trades: &mut [Trade]) {
    let mut previous_price: Option<f64> = None;

    for trade in trades.iter_mut() {
        if trade.side.is_none() {
            trade.side = previous_price.and_then(|previous| {
                match trade.price.partial_cmp(&previous) {
                    Some(Ordering::Greater) => Some(Side::Buy),
                    Some(Ordering::Less) => Some(Side::Sell),
                    _ => None,
                }
            });
        }
        previous_price = Some(trade.price);
    }
}

/// Check a trade history is in ascending time order and within bounds.
pub fn validate_trades(trades: &[Trade]) -> Result<(), DomainError> {
    if let Some(index) = trades.windows(2).position(|pair| pair[0].time > pair[1].time) {
        return Err(DomainError::UnorderedSeries {
            series: "trades",
            index: index + 1,
        });
    }
    if let Some(trade) = trades.iter().find(|t| !(t.amount.is_finite() && t.amount > 0.0)) {
        return Err(DomainError::NonPositiveAmount {
            amount: trade.amount,
        });
    }
    Ok(())
}
