//! Binance REST response types.
//!
//! Binance sends prices and quantities as JSON strings. They are kept as
//! strings here and parsed through `rust_decimal` during conversion;
//! entries that fail to parse are dropped.
//!
//! Example depth response:
//! ```json
//! {"lastUpdateId":1027024,"bids":[["4.00000000","431.00000000"]],"asks":[["4.00000200","12.00000000"]]}
//! ```

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::domain::{Bar, Order, Side, Trade};

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct BinanceApiError {
    pub code: i64,
    pub msg: String,
}

/// `GET /api/v3/exchangeInfo`
#[derive(Debug, Deserialize)]
pub struct BinanceExchangeInfo {
    pub symbols: Vec<BinanceSymbolInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceSymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(default)]
    pub filters: Vec<BinanceSymbolFilter>,
}

impl BinanceSymbolInfo {
    /// True for pairs currently open for trading.
    #[must_use]
    pub fn is_trading(&self) -> bool {
        self.status == "TRADING"
    }

    /// Price increment from the `PRICE_FILTER`.
    #[must_use]
    pub fn tick_size(&self) -> Option<&str> {
        self.filters.iter().find_map(|filter| match filter {
            BinanceSymbolFilter::Price { tick_size } => Some(tick_size.as_str()),
            _ => None,
        })
    }

    /// Quantity increment from the `LOT_SIZE` filter.
    #[must_use]
    pub fn step_size(&self) -> Option<&str> {
        self.filters.iter().find_map(|filter| match filter {
            BinanceSymbolFilter::LotSize { step_size } => Some(step_size.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "filterType")]
pub enum BinanceSymbolFilter {
    #[serde(rename = "PRICE_FILTER")]
    Price {
        #[serde(rename = "tickSize")]
        tick_size: String,
    },
    #[serde(rename = "LOT_SIZE")]
    LotSize {
        #[serde(rename = "stepSize")]
        step_size: String,
    },
    #[serde(other)]
    Other,
}

/// `GET /api/v3/depth`
#[derive(Debug, Deserialize)]
pub struct BinanceDepth {
    pub bids: Vec<(String, String)>,
    pub asks: Vec<(String, String)>,
}

impl BinanceDepth {
    /// Book levels as `(asks, bids)`, unsorted and untruncated.
    #[must_use]
    pub fn to_levels(&self) -> (Vec<Order>, Vec<Order>) {
        (parse_levels(&self.asks), parse_levels(&self.bids))
    }
}

fn parse_levels(levels: &[(String, String)]) -> Vec<Order> {
    levels
        .iter()
        .filter_map(|(price, qty)| Some(Order::new(parse_f64(price)?, parse_f64(qty)?)))
        .collect()
}

/// `GET /api/v3/ticker/price`
#[derive(Debug, Deserialize)]
pub struct BinanceTickerPrice {
    pub symbol: String,
    pub price: String,
}

impl BinanceTickerPrice {
    #[must_use]
    pub fn to_price(&self) -> Option<f64> {
        parse_f64(&self.price).filter(|price| *price > 0.0)
    }
}

/// One `GET /api/v3/klines` row:
/// `[openTime, open, high, low, close, volume, closeTime, quoteVolume,
/// trades, takerBuyBase, takerBuyQuote, ignore]`.
#[derive(Debug, Deserialize)]
pub struct BinanceKline(
    pub i64,
    pub String,
    pub String,
    pub String,
    pub String,
    pub String,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
);

impl BinanceKline {
    /// Convert to a bar stamped in Unix seconds.
    #[must_use]
    pub fn to_bar(&self) -> Option<Bar> {
        Some(Bar {
            time: self.0 / 1000,
            open: parse_f64(&self.1)?,
            high: parse_f64(&self.2)?,
            low: parse_f64(&self.3)?,
            close: parse_f64(&self.4)?,
            volume: parse_f64(&self.5)?,
        })
    }
}

/// One `GET /api/v3/trades` entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTrade {
    pub id: u64,
    pub price: String,
    pub qty: String,
    pub time: i64,
    pub is_buyer_maker: bool,
}

impl BinanceTrade {
    /// A resting buyer means the aggressor sold.
    #[must_use]
    pub fn to_trade(&self) -> Option<Trade> {
        let side = if self.is_buyer_maker {
            Side::Sell
        } else {
            Side::Buy
        };
        Some(Trade::new(
            self.time / 1000,
            parse_f64(&self.qty)?,
            parse_f64(&self.price)?,
            Some(side),
        ))
    }
}

fn parse_f64(raw: &str) -> Option<f64> {
    Decimal::from_str(raw).ok()?.to_f64()
}
