//! Seeded market data for the paper exchange.
//!
//! A [`MarketSeed`] holds one pair's data in the loose shape exchanges tend
//! to return it: unsorted book levels, minute bars, trades newest first with
//! sides sometimes missing. The paper adapter normalizes it on every read,
//! exactly like a network adapter would.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::error::DomainError;
use crate::domain::{Bar, Order, Side, Trade};

/// Raw data for one listed pair.
#[derive(Debug, Clone, Default)]
pub struct MarketSeed {
    /// Price increment, e.g. `"0.000001"`.
    pub tick_size: String,
    /// Amount increment, e.g. `"0.001"`.
    pub step_size: String,
    pub asks: Vec<Order>,
    pub bids: Vec<Order>,
    /// One-minute OHLCV bars in any order.
    pub minute_bars: Vec<Bar>,
    /// Public trades, newest first.
    pub trades: Vec<Trade>,
    /// Ticker price.
    pub last_price: Option<f64>,
}

impl MarketSeed {
    #[must_use]
    pub fn new(tick_size: impl Into<String>, step_size: impl Into<String>) -> Self {
        Self {
            tick_size: tick_size.into(),
            step_size: step_size.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_asks(mut self, asks: Vec<Order>) -> Self {
        self.asks = asks;
        self
    }

    #[must_use]
    pub fn with_bids(mut self, bids: Vec<Order>) -> Self {
        self.bids = bids;
        self
    }

    #[must_use]
    pub fn with_minute_bars(mut self, bars: Vec<Bar>) -> Self {
        self.minute_bars = bars;
        self
    }

    #[must_use]
    pub fn with_trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades = trades;
        self
    }

    #[must_use]
    pub fn with_last_price(mut self, price: f64) -> Self {
        self.last_price = Some(price);
        self
    }

    /// Consume resting liquidity against an incoming limit order.
    ///
    /// Returns `(filled_amount, quote_cost)`. Consumed levels are removed
    /// from the book, each fill is appended to the public tape and the
    /// ticker moves to the last fill price.
    pub(crate) fn take_liquidity(
        &mut self,
        side: Side,
        limit: f64,
        amount: f64,
        now: i64,
    ) -> (f64, f64) {
        let levels = match side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };
        match side {
            Side::Buy => levels.sort_by(|a, b| by_price(a, b)),
            Side::Sell => levels.sort_by(|a, b| by_price(b, a)),
        }

        let crosses = |price: f64| match side {
            Side::Buy => price <= limit,
            Side::Sell => price >= limit,
        };

        let mut remaining = amount;
        let mut filled = 0.0;
        let mut cost = 0.0;
        let mut fills = Vec::new();

        for level in levels.iter_mut() {
            if remaining <= 0.0 || !crosses(level.price) {
                break;
            }
            let take = level.amount.min(remaining);
            level.amount -= take;
            remaining -= take;
            filled += take;
            cost += take * level.price;
            fills.push(Trade::new(now, take, level.price, Some(side)));
        }
        levels.retain(|level| level.amount > 0.0);

        if let Some(last) = fills.last() {
            self.last_price = Some(last.price);
        }
        fills.reverse();
        fills.append(&mut self.trades);
        self.trades = fills;

        (filled, cost)
    }
}

fn by_price(a: &Order, b: &Order) -> Ordering {
    a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
}

/// Merge one-minute bars into `period_minutes` buckets aligned to the epoch.
pub fn aggregate_bars(minute_bars: &[Bar], period_minutes: u32) -> Result<Vec<Bar>, DomainError> {
    if period_minutes == 0 {
        return Err(DomainError::UnsupportedCandlePeriod { minutes: 0 });
    }
    let span = i64::from(period_minutes) * 60;

    let mut sorted = minute_bars.to_vec();
    sorted.sort_by_key(|bar| bar.time);

    let mut buckets: BTreeMap<i64, Bar> = BTreeMap::new();
    for bar in sorted {
        let start = bar.time - bar.time.rem_euclid(span);
        buckets
            .entry(start)
            .and_modify(|bucket| {
                bucket.high = bucket.high.max(bar.high);
                bucket.low = bucket.low.min(bar.low);
                bucket.close = bar.close;
                bucket.volume += bar.volume;
            })
            .or_insert(Bar { time: start, ..bar });
    }

    Ok(buckets.into_values().collect())
}
