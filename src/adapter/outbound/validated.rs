//! Contract-checking wrapper for any exchange adapter.
//!
//! [`ValidatedExchange`] forwards every call to the wrapped adapter and
//! checks what comes back: book ordering, depth and crossing, k-line
//! alignment and colors, trade ordering, symbol tiering and order ids.
//! A violation is logged with the inner adapter's last-call diagnostics and
//! returned as an error instead of the bad value.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::error::DomainError;
use crate::domain::trade::validate_trades;
use crate::domain::{Balance, Decimals, KLine, MakedOrder, OrderBook, Symbol, Trade};
use crate::error::{Error, ExecutionError, Result};
use crate::port::outbound::diagnostics::Diagnostics;
use crate::port::outbound::exchange::{Credentials, ExchangeAdapter, MarketData, Trading};

/// Wrapper that rejects results breaking the exchange contract.
pub struct ValidatedExchange<E> {
    inner: E,
    depth: Option<usize>,
}

impl<E: ExchangeAdapter> ValidatedExchange<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, depth: None }
    }

    /// The wrapped adapter.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn check<T>(&self, operation: &'static str, value: T, result: std::result::Result<(), DomainError>) -> Result<T> {
        match result {
            Ok(()) => Ok(value),
            Err(err) => {
                warn!(
                    exchange = self.inner.exchange_name(),
                    operation,
                    error = %err,
                    context = %self.inner.format_error(),
                    "Contract violation"
                );
                Err(err.into())
            }
        }
    }

    fn check_order(&self, operation: &'static str, order: MakedOrder) -> Result<MakedOrder> {
        if order.id.is_empty() {
            warn!(
                exchange = self.inner.exchange_name(),
                operation,
                context = %self.inner.format_error(),
                "Order returned without id"
            );
            return Err(ExecutionError::OrderRejected(format!(
                "{operation} returned an order without id"
            ))
            .into());
        }
        Ok(order)
    }
}

/// Symbols must come grouped by quote tier, best tier first.
fn check_tiers(symbols: &[Symbol]) -> std::result::Result<(), DomainError> {
    match symbols
        .windows(2)
        .position(|pair| pair[0].tier() > pair[1].tier())
    {
        Some(index) => Err(DomainError::UnorderedSeries {
            series: "symbols",
            index: index + 1,
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl<E: ExchangeAdapter> ExchangeAdapter for ValidatedExchange<E> {
    async fn init(&mut self, credentials: Credentials, depth: usize) -> Result<()> {
        self.inner.init(credentials, depth).await?;
        self.depth = Some(depth);
        Ok(())
    }

    fn exchange_name(&self) -> &'static str {
        self.inner.exchange_name()
    }

    fn diagnostics(&self) -> &Diagnostics {
        self.inner.diagnostics()
    }
}

#[async_trait]
impl<E: MarketData> MarketData for ValidatedExchange<E> {
    async fn get_all_symbols(&self) -> Result<Vec<Symbol>> {
        let symbols = self.inner.get_all_symbols().await?;
        let result = check_tiers(&symbols);
        self.check("get_all_symbols", symbols, result)
    }

    async fn get_decs(&self, symbol: &Symbol) -> Result<Decimals> {
        self.inner.get_decs(symbol).await
    }

    async fn get_order_book(&self, symbol: &Symbol) -> Result<OrderBook> {
        let book = self.inner.get_order_book(symbol).await?;
        let result = book.validate(self.depth);
        self.check("get_order_book", book, result)
    }

    async fn get_last_price(&self, symbol: &Symbol) -> Result<f64> {
        let price = self.inner.get_last_price(symbol).await?;
        let result = if price.is_finite() && price > 0.0 {
            Ok(())
        } else {
            Err(DomainError::NonPositivePrice { price })
        };
        self.check("get_last_price", price, result)
    }

    async fn get_kline(&self, symbol: &Symbol, candle_period: u32) -> Result<KLine> {
        let kline = self.inner.get_kline(symbol, candle_period).await?;
        let result = kline.validate();
        self.check("get_kline", kline, result)
    }

    async fn get_trade_history(&self, symbol: &Symbol) -> Result<Vec<Trade>> {
        let trades = self.inner.get_trade_history(symbol).await?;
        let result = validate_trades(&trades);
        self.check("get_trade_history", trades, result)
    }
}

#[async_trait]
impl<E: Trading> Trading for ValidatedExchange<E> {
    async fn get_balances(&self) -> Result<HashMap<String, Balance>> {
        let balances = self.inner.get_balances().await?;
        let result = balances
            .values()
            .try_for_each(|b| Balance::try_new(b.free, b.locked).map(|_| ()));
        self.check("get_balances", balances, result)
    }

    async fn buy(&self, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder> {
        let order = self.inner.buy(symbol, amount, price).await?;
        self.check_order("buy", order)
    }

    async fn sell(&self, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder> {
        let order = self.inner.sell(symbol, amount, price).await?;
        self.check_order("sell", order)
    }

    async fn cancel_order(&self, symbol: &Symbol, id: &str) -> Result<()> {
        self.inner.cancel_order(symbol, id).await
    }

    async fn cancel_all(&self, symbol: &Symbol) -> Result<()> {
        self.inner.cancel_all(symbol).await
    }

    async fn get_order_status(&self, symbol: &Symbol, id: &str) -> Result<MakedOrder> {
        let order = self.inner.get_order_status(symbol, id).await?;
        self.check_order("get_order_status", order)
    }

    async fn get_my_open_orders(&self, symbol: &Symbol) -> Result<Vec<MakedOrder>> {
        self.inner
            .get_my_open_orders(symbol)
            .await?
            .into_iter()
            .map(|order| self.check_order("get_my_open_orders", order))
            .collect()
    }

    async fn withdraw(&self, asset: &str, address: &str, chain: &str, amount: f64) -> Result<String> {
        let id = self.inner.withdraw(asset, address, chain, amount).await?;
        if id.is_empty() {
            return Err(ExecutionError::WithdrawalRejected(
                "exchange returned no withdrawal id".to_string(),
            )
            .into());
        }
        Ok(id)
    }
}
