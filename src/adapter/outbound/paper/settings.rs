//! Paper exchange configuration.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::{Bar, Order, Symbol, Trade};

/// Settings for the in-memory paper exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct PaperConfig {
    /// Fee charged on every fill, as a fraction of the received amount.
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
    /// Simulated round-trip latency per call.
    #[serde(default)]
    pub latency_ms: u64,
    /// Starting free balances per asset code.
    #[serde(default)]
    pub balances: HashMap<String, f64>,
    /// Pairs listed at startup.
    #[serde(default)]
    pub markets: Vec<PaperMarketConfig>,
}

/// One seeded pair.
///
/// Levels are `[price, amount]`, bars `[time, open, high, low, close,
/// volume]` and trades `[time, price, amount]`, with times in Unix seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct PaperMarketConfig {
    pub symbol: Symbol,
    #[serde(default = "default_tick_size")]
    pub tick_size: String,
    #[serde(default = "default_step_size")]
    pub step_size: String,
    #[serde(default)]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub asks: Vec<(f64, f64)>,
    #[serde(default)]
    pub bids: Vec<(f64, f64)>,
    #[serde(default)]
    pub minute_bars: Vec<(i64, f64, f64, f64, f64, f64)>,
    #[serde(default)]
    pub trades: Vec<(i64, f64, f64)>,
}

impl PaperMarketConfig {
    #[must_use]
    pub fn asks(&self) -> Vec<Order> {
        self.asks.iter().map(|&(price, amount)| Order::new(price, amount)).collect()
    }

    #[must_use]
    pub fn bids(&self) -> Vec<Order> {
        self.bids.iter().map(|&(price, amount)| Order::new(price, amount)).collect()
    }

    #[must_use]
    pub fn bars(&self) -> Vec<Bar> {
        self.minute_bars
            .iter()
            .map(|&(time, open, high, low, close, volume)| Bar {
                time,
                open,
                high,
                low,
                close,
                volume,
            })
            .collect()
    }

    /// Configured trades carry no side; newest first as on a public tape.
    #[must_use]
    pub fn trades(&self) -> Vec<Trade> {
        let mut trades: Vec<Trade> = self
            .trades
            .iter()
            .map(|&(time, price, amount)| Trade::new(time, amount, price, None))
            .collect();
        trades.sort_by_key(|trade| std::cmp::Reverse(trade.time));
        trades
    }
}

fn default_tick_size() -> String {
    "0.00000001".into()
}

fn default_step_size() -> String {
    "0.00000001".into()
}

const fn default_commission_rate() -> f64 {
    0.001
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
            latency_ms: 0,
            balances: HashMap::new(),
            markets: Vec::new(),
        }
    }
}
