//! Builders for domain primitives used across tests.

use crate::domain::{Bar, Order, Side, Symbol, Trade};

/// Parse a canonical `QUOTE_BASE` symbol, panicking on bad input.
pub fn symbol(canonical: &str) -> Symbol {
    canonical
        .parse()
        .unwrap_or_else(|err| panic!("bad test symbol {canonical}: {err}"))
}

/// Book levels from `(price, amount)` pairs.
pub fn levels(pairs: &[(f64, f64)]) -> Vec<Order> {
    pairs
        .iter()
        .map(|&(price, amount)| Order::new(price, amount))
        .collect()
}

/// A one-minute bar whose high and low hug the open and close.
pub fn minute_bar(time: i64, open: f64, close: f64, volume: f64) -> Bar {
    Bar {
        time,
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume,
    }
}

/// A trade with no reported side.
pub fn unsided_trade(time: i64, price: f64, amount: f64) -> Trade {
    Trade::new(time, amount, price, None)
}

/// A trade with a reported side.
pub fn sided_trade(time: i64, price: f64, amount: f64, side: Side) -> Trade {
    Trade::new(time, amount, price, Some(side))
}
