//! Exchange capability port.
//!
//! Every concrete exchange integration implements these traits. The
//! surface is split in two so public market data never depends on
//! credentials:
//!
//! - [`MarketData`] - symbols, precision, order book, ticker, candles, trades
//! - [`Trading`] - balances, order placement and management, withdrawals
//!
//! [`ExchangeApi`] is the full contract, implemented automatically for
//! anything that provides both halves. Callers hold
//! `Arc<dyn ExchangeApi>` (or `Arc<dyn MarketData>`) and never a concrete
//! adapter type.
//!
//! Operations may be called concurrently through `&self`. None of them are
//! retried here; `buy`, `sell` and `withdraw` are not idempotent and must
//! not be retried blindly by wrappers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{Balance, Decimals, KLine, MakedOrder, OrderBook, Symbol, Trade};
use crate::error::{ConfigError, Error, ExecutionError};

use super::diagnostics::Diagnostics;

/// API access values handed to [`ExchangeAdapter::init`].
///
/// Any field may be empty; adapters that do not use a field ignore it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub account_id: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            account_id: account_id.into(),
        }
    }

    /// True when no key material was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.api_key.is_empty() && self.api_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("account_id", &self.account_id)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// Reject a zero order-book depth during `init`.
pub fn check_depth(depth: usize) -> Result<(), Error> {
    if depth == 0 {
        return Err(ConfigError::InvalidValue {
            field: "depth",
            reason: "order book depth must be at least 1".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Behaviour shared by every adapter.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// Set up the adapter. Idempotent.
    ///
    /// Must succeed with empty credentials so the public subset is usable.
    /// `depth` fixes how many levels per side [`MarketData::get_order_book`]
    /// returns for the adapter's lifetime.
    async fn init(&mut self, credentials: Credentials, depth: usize) -> Result<(), Error>;

    /// Get the exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;

    /// Last-call diagnostics of this adapter.
    fn diagnostics(&self) -> &Diagnostics;

    /// Render the last call for error reports.
    fn format_error(&self) -> String {
        self.diagnostics().format_error()
    }
}

/// Public market data. Works without credentials.
#[async_trait]
pub trait MarketData: ExchangeAdapter {
    /// Every listed symbol, USDT-quoted first, then BTC, then ETH, then the
    /// rest. Order within a tier is stable.
    async fn get_all_symbols(&self) -> Result<Vec<Symbol>, Error>;

    /// Decimal places to round prices and amounts to before placing orders.
    async fn get_decs(&self, symbol: &Symbol) -> Result<Decimals, Error>;

    /// Book with at most `depth` levels per side, asks ascending, bids
    /// descending, best ask above best bid. Called before every trade
    /// decision.
    async fn get_order_book(&self, symbol: &Symbol) -> Result<OrderBook, Error>;

    /// Last traded price from the ticker. Called often; must stay cheap.
    async fn get_last_price(&self, symbol: &Symbol) -> Result<f64, Error>;

    /// Up to the 100 most recent candles of `candle_period` minutes, oldest
    /// first, price and volume candles aligned 1:1.
    async fn get_kline(&self, symbol: &Symbol, candle_period: u32) -> Result<KLine, Error>;

    /// Up to the 100 most recent trades, oldest first, with missing sides
    /// inferred from price moves.
    async fn get_trade_history(&self, symbol: &Symbol) -> Result<Vec<Trade>, Error>;
}

/// Authenticated account operations.
#[async_trait]
pub trait Trading: ExchangeAdapter {
    /// Holdings per asset code.
    async fn get_balances(&self) -> Result<HashMap<String, Balance>, Error>;

    /// Place a limit buy of `amount` base currency at `price`.
    ///
    /// An order that did not fill synchronously comes back with its id and
    /// `NOT_FILLED`; executed fields are never guessed.
    async fn buy(&self, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder, Error>;

    /// Place a limit sell of `amount` base currency at `price`.
    async fn sell(&self, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder, Error>;

    /// Cancel one order. Fails if it does not exist or is already terminal.
    async fn cancel_order(&self, symbol: &Symbol, id: &str) -> Result<(), Error>;

    /// Cancel every open order on `symbol`.
    ///
    /// Any order that fails to cancel turns the whole call into
    /// [`ExecutionError::PartialCancel`], even if others succeeded.
    async fn cancel_all(&self, symbol: &Symbol) -> Result<(), Error> {
        let open = self.get_my_open_orders(symbol).await?;
        let total = open.len();
        let mut failures = Vec::new();

        for order in &open {
            if let Err(err) = self.cancel_order(symbol, &order.id).await {
                warn!(
                    exchange = self.exchange_name(),
                    symbol = %symbol,
                    order_id = %order.id,
                    error = %err,
                    "Cancel failed"
                );
                failures.push(format!("{}: {err}", order.id));
            }
        }

        if failures.is_empty() {
            return Ok(());
        }
        Err(ExecutionError::PartialCancel {
            symbol: symbol.to_string(),
            cancelled: total - failures.len(),
            total,
            failures,
        }
        .into())
    }

    /// Current authoritative state of one order.
    async fn get_order_status(&self, symbol: &Symbol, id: &str) -> Result<MakedOrder, Error>;

    /// All open orders of this account on `symbol`. Called often; no side
    /// effects.
    async fn get_my_open_orders(&self, symbol: &Symbol) -> Result<Vec<MakedOrder>, Error>;

    /// Request a withdrawal and return the exchange's tracking id.
    async fn withdraw(
        &self,
        asset: &str,
        address: &str,
        chain: &str,
        amount: f64,
    ) -> Result<String, Error>;
}

/// The complete capability set.
pub trait ExchangeApi: MarketData + Trading {}

impl<T: MarketData + Trading + ?Sized> ExchangeApi for T {}

/// Shared handle to a full adapter.
pub type SharedExchange = Arc<dyn ExchangeApi>;

/// Shared handle to a public-data adapter.
pub type SharedMarketData = Arc<dyn MarketData>;
