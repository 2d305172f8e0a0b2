//! Order book types for market depth representation.
//!
//! This module provides:
//!
//! - [`Order`] - A single price level with its amount
//! - [`OrderBook`] - Bid/ask depth snapshot for one symbol
//!
//! # Order Book Structure
//!
//! - **Asks**: sell side, sorted by price ascending (best ask first)
//! - **Bids**: buy side, sorted by price descending (best bid first)
//!
//! Every ask is priced strictly above every bid. Adapters build books
//! through [`OrderBook::normalize`], which enforces all of this.
//!
//! # Examples
//!
//! ```
//! use tradeport::domain::book::{Order, OrderBook};
//!
//! let asks = vec![Order::new(25.2, 1.0), Order::new(25.1, 3.0)];
//! let bids = vec![Order::new(24.8, 2.0), Order::new(24.9, 5.0)];
//!
//! let book = OrderBook::normalize(asks, bids, 10).unwrap();
//!
//! assert_eq!(book.best_ask().unwrap().price, 25.1);
//! assert_eq!(book.best_bid().unwrap().price, 24.9);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A single price level in an order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Quantity resting at this price, in the base currency.
    pub amount: f64,
    /// Price in the quote currency.
    pub price: f64,
}

impl Order {
    /// Creates a level from `price` and `amount`.
    #[must_use]
    pub const fn new(price: f64, amount: f64) -> Self {
        Self { amount, price }
    }

    /// Creates a level, rejecting non-positive prices or amounts.
    pub fn try_new(price: f64, amount: f64) -> Result<Self, DomainError> {
        if !(price.is_finite() && price > 0.0) {
            return Err(DomainError::NonPositivePrice { price });
        }
        if !(amount.is_finite() && amount > 0.0) {
            return Err(DomainError::NonPositiveAmount { amount });
        }
        Ok(Self { amount, price })
    }

    fn is_usable(&self) -> bool {
        self.price.is_finite() && self.price > 0.0 && self.amount.is_finite() && self.amount > 0.0
    }
}

/// Bid/ask depth snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Sell levels, ascending by price.
    pub asks: Vec<Order>,
    /// Buy levels, descending by price.
    pub bids: Vec<Order>,
}

impl OrderBook {
    /// Build a contract-conforming book from raw exchange levels.
    ///
    /// Levels with a non-positive or non-finite price or amount are dropped,
    /// both sides are sorted, and each side is cut to `depth` levels.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CrossedBook`] if the best ask is not strictly
    /// above the best bid.
    pub fn normalize(
        asks: Vec<Order>,
        bids: Vec<Order>,
        depth: usize,
    ) -> Result<Self, DomainError> {
        let mut asks: Vec<Order> = asks.into_iter().filter(Order::is_usable).collect();
        let mut bids: Vec<Order> = bids.into_iter().filter(Order::is_usable).collect();

        asks.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
        bids.sort_by(|a, b| b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal));
        asks.truncate(depth);
        bids.truncate(depth);

        let book = Self { asks, bids };
        book.check_not_crossed()?;
        Ok(book)
    }

    /// Lowest ask.
    #[must_use]
    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.first()
    }

    /// Highest bid.
    #[must_use]
    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.first()
    }

    /// Best ask minus best bid, when both sides are present.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// Midpoint of best ask and best bid.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        Some((self.best_ask()?.price + self.best_bid()?.price) / 2.0)
    }

    /// True when both sides are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }

    /// Check every book invariant, including the optional depth bound.
    pub fn validate(&self, depth: Option<usize>) -> Result<(), DomainError> {
        if self
            .asks
            .windows(2)
            .any(|pair| pair[0].price > pair[1].price)
        {
            return Err(DomainError::UnsortedBook {
                side: "asks",
                expected: "ascending",
            });
        }
        if self
            .bids
            .windows(2)
            .any(|pair| pair[0].price < pair[1].price)
        {
            return Err(DomainError::UnsortedBook {
                side: "bids",
                expected: "descending",
            });
        }
        if let Some(level) = self.asks.iter().chain(&self.bids).find(|o| !o.is_usable()) {
            return Err(DomainError::NonPositiveAmount {
                amount: level.amount,
            });
        }
        if let Some(depth) = depth {
            for (side, levels) in [("asks", self.asks.len()), ("bids", self.bids.len())] {
                if levels > depth {
                    return Err(DomainError::DepthExceeded {
                        side,
                        levels,
                        depth,
                    });
                }
            }
        }
        self.check_not_crossed()
    }

    fn check_not_crossed(&self) -> Result<(), DomainError> {
        if let (Some(ask), Some(bid)) = (self.best_ask(), self.best_bid()) {
            if ask.price <= bid.price {
                return Err(DomainError::CrossedBook {
                    best_ask: ask.price,
                    best_bid: bid.price,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(prices: &[f64]) -> Vec<Order> {
        prices.iter().map(|&p| Order::new(p, 1.0)).collect()
    }

    fn prices(orders: &[Order]) -> Vec<f64> {
        orders.iter().map(|o| o.price).collect()
    }

    #[test]
    fn normalize_sorts_both_sides() {
        let book =
            OrderBook::normalize(levels(&[12.0, 10.5, 11.0]), levels(&[9.0, 10.0, 8.0]), 10)
                .unwrap();

        assert_eq!(prices(&book.asks), vec![10.5, 11.0, 12.0]);
        assert_eq!(prices(&book.bids), vec![10.0, 9.0, 8.0]);
        assert!(book.validate(Some(10)).is_ok());
    }

    #[test]
    fn normalize_truncates_to_depth_after_sorting() {
        let book = OrderBook::normalize(
            levels(&[14.0, 11.0, 13.0, 12.0]),
            levels(&[7.0, 10.0, 8.0, 9.0]),
            2,
        )
        .unwrap();

        assert_eq!(prices(&book.asks), vec![11.0, 12.0]);
        assert_eq!(prices(&book.bids), vec![10.0, 9.0]);
    }

    #[test]
    fn normalize_drops_empty_levels() {
        let asks = vec![Order::new(11.0, 0.0), Order::new(12.0, 2.0)];
        let bids = vec![Order::new(10.0, -1.0), Order::new(9.0, f64::NAN)];

        let book = OrderBook::normalize(asks, bids, 5).unwrap();

        assert_eq!(prices(&book.asks), vec![12.0]);
        assert!(book.bids.is_empty());
    }

    #[test]
    fn normalize_rejects_crossed_book() {
        let err = OrderBook::normalize(levels(&[10.0]), levels(&[10.0]), 5).unwrap_err();
        assert_eq!(
            err,
            DomainError::CrossedBook {
                best_ask: 10.0,
                best_bid: 10.0
            }
        );
    }

    #[test]
    fn one_sided_book_is_valid() {
        let book = OrderBook::normalize(levels(&[10.0]), vec![], 5).unwrap();
        assert!(book.spread().is_none());
        assert!(book.validate(None).is_ok());
    }

    #[test]
    fn validate_catches_unsorted_and_deep_sides() {
        let unsorted = OrderBook {
            asks: levels(&[11.0, 10.5]),
            bids: levels(&[9.0]),
        };
        assert!(matches!(
            unsorted.validate(None),
            Err(DomainError::UnsortedBook { side: "asks", .. })
        ));

        let deep = OrderBook {
            asks: levels(&[11.0, 12.0, 13.0]),
            bids: levels(&[9.0]),
        };
        assert!(matches!(
            deep.validate(Some(2)),
            Err(DomainError::DepthExceeded { levels: 3, .. })
        ));
    }

    #[test]
    fn spread_and_mid() {
        let book = OrderBook::normalize(levels(&[10.5]), levels(&[9.5]), 1).unwrap();
        assert_eq!(book.spread(), Some(1.0));
        assert_eq!(book.mid_price(), Some(10.0));
    }
}
