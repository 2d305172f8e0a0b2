//! In-memory exchange implementing the full capability contract.
//!
//! Orders match immediately against the seeded book when they cross it and
//! rest otherwise. Balances are tracked per asset with funds locked for
//! resting orders. Native pair notation is `BASE/QUOTE`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::market::{aggregate_bars, MarketSeed};
use super::settings::PaperConfig;
use crate::domain::symbol::prioritize;
use crate::domain::trade::normalize_trades;
use crate::domain::{
    Balance, Decimals, KLine, MakedOrder, OrderBook, Side, Symbol, Trade,
};
use crate::error::{Error, ExecutionError, Result};
use crate::port::outbound::diagnostics::{DebugRecord, Diagnostics};
use crate::port::outbound::exchange::{
    check_depth, Credentials, ExchangeAdapter, MarketData, Trading,
};
use crate::port::outbound::symbol::{PairCase, PairOrder, SeparatorMapper, SymbolMapper};

const DEFAULT_DEPTH: usize = 20;

/// Lifecycle of a paper order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderState {
    Open,
    Filled,
    Cancelled,
}

#[derive(Debug, Clone)]
struct PaperOrder {
    native: String,
    order: MakedOrder,
    state: OrderState,
}

/// A withdrawal accepted by the paper exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    pub asset: String,
    pub address: String,
    pub chain: String,
    pub amount: f64,
}

#[derive(Debug, Default)]
struct Ledger {
    markets: HashMap<String, MarketSeed>,
    listing: Vec<String>,
    balances: HashMap<String, Balance>,
    orders: HashMap<String, PaperOrder>,
    order_sequence: Vec<String>,
    withdrawals: HashMap<String, Withdrawal>,
}

impl Ledger {
    fn balance_mut(&mut self, asset: &str) -> &mut Balance {
        self.balances.entry(asset.to_string()).or_default()
    }

    fn free(&self, asset: &str) -> f64 {
        self.balances.get(asset).map_or(0.0, |b| b.free)
    }
}

/// Simulated exchange backed by seeded market data.
pub struct PaperExchange {
    config: PaperConfig,
    mapper: SeparatorMapper,
    credentials: Credentials,
    depth: usize,
    ledger: Mutex<Ledger>,
    diagnostics: Diagnostics,
}

impl PaperExchange {
    /// Create an exchange with the configured starting balances and
    /// markets.
    #[must_use]
    pub fn new(config: PaperConfig) -> Self {
        let mapper = SeparatorMapper::new('/', PairOrder::BaseFirst, PairCase::Upper);
        let mut ledger = Ledger::default();
        for (asset, amount) in &config.balances {
            ledger.balances.insert(
                asset.to_ascii_uppercase(),
                Balance::new(amount.max(0.0), 0.0),
            );
        }
        for market in &config.markets {
            let mut seed = MarketSeed::new(market.tick_size.clone(), market.step_size.clone())
                .with_asks(market.asks())
                .with_bids(market.bids())
                .with_minute_bars(market.bars())
                .with_trades(market.trades());
            if let Some(price) = market.last_price {
                seed = seed.with_last_price(price);
            }
            let native = mapper.to_native(&market.symbol);
            if !ledger.markets.contains_key(&native) {
                ledger.listing.push(native.clone());
            }
            ledger.markets.insert(native, seed);
        }

        Self {
            config,
            mapper,
            credentials: Credentials::default(),
            depth: DEFAULT_DEPTH,
            ledger: Mutex::new(ledger),
            diagnostics: Diagnostics::new(),
        }
    }

    /// List a pair under its native `BASE/QUOTE` name.
    #[must_use]
    pub fn with_market(self, native: &str, seed: MarketSeed) -> Self {
        self.list_market(native, seed);
        self
    }

    /// List or replace a pair at runtime.
    pub fn list_market(&self, native: &str, seed: MarketSeed) {
        let mut ledger = self.ledger.lock();
        if !ledger.markets.contains_key(native) {
            ledger.listing.push(native.to_string());
        }
        ledger.markets.insert(native.to_string(), seed);
    }

    /// Credit free balance, e.g. to simulate a deposit.
    pub fn deposit(&self, asset: &str, amount: f64) {
        let mut ledger = self.ledger.lock();
        ledger.balance_mut(&asset.to_ascii_uppercase()).free += amount.max(0.0);
    }

    /// Look up an accepted withdrawal by tracking id.
    #[must_use]
    pub fn withdrawal(&self, id: &str) -> Option<Withdrawal> {
        self.ledger.lock().withdrawals.get(id).cloned()
    }

    /// Depth fixed by the last `init`.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    /// Record a successful call and hand the value back.
    fn respond<T: Serialize>(&self, method: &str, request: serde_json::Value, value: T) -> T {
        let received = serde_json::to_vec(&value).unwrap_or_default();
        self.diagnostics
            .record(method, request.to_string(), received);
        value
    }

    /// Record a refused call and build the matching error.
    fn reject(&self, method: &str, request: serde_json::Value, status: u16, message: String) -> Error {
        let body = json!({ "code": status, "msg": message }).to_string();
        let record = DebugRecord::new(method, request.to_string(), body);
        let context = record.format();
        self.diagnostics.store(record);
        warn!(exchange = "paper", method, status, %message, "Request rejected");
        Error::Exchange {
            status,
            message,
            context,
        }
    }

    /// Record a failed trading call and pass the error through.
    fn fail(&self, method: &str, request: serde_json::Value, err: impl Into<Error>) -> Error {
        let err = err.into();
        let body = json!({ "error": err.to_string() }).to_string();
        self.diagnostics.record(method, request.to_string(), body);
        warn!(exchange = "paper", method, error = %err, "Request failed");
        err
    }

    fn require_credentials(&self, method: &str, request: &serde_json::Value) -> Result<()> {
        if self.credentials.is_empty() {
            return Err(self.reject(
                method,
                request.clone(),
                401,
                "API key required".to_string(),
            ));
        }
        Ok(())
    }

    fn read_market<T>(
        &self,
        method: &str,
        symbol: &Symbol,
        read: impl FnOnce(&MarketSeed) -> Result<T>,
    ) -> Result<T> {
        let native = self.mapper.to_native(symbol);
        let result = {
            let ledger = self.ledger.lock();
            ledger.markets.get(&native).map(read)
        };
        match result {
            Some(value) => value,
            None => Err(self.reject(
                method,
                json!({ "symbol": native }),
                400,
                format!("unknown symbol {native}"),
            )),
        }
    }

    fn place(&self, side: Side, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder> {
        let method = match side {
            Side::Buy => "buy",
            Side::Sell => "sell",
        };
        let native = self.mapper.to_native(symbol);
        let request = json!({
            "symbol": native,
            "side": side,
            "quantity": amount,
            "price": price,
        });
        self.require_credentials(method, &request)?;

        if !(amount.is_finite() && amount > 0.0) {
            return Err(self.reject(method, request, 400, format!("invalid quantity {amount}")));
        }
        if !(price.is_finite() && price > 0.0) {
            return Err(self.reject(method, request, 400, format!("invalid price {price}")));
        }

        let mut ledger = self.ledger.lock();
        let Some(seed) = ledger.markets.get(&native) else {
            drop(ledger);
            return Err(self.reject(method, request, 400, format!("unknown symbol {native}")));
        };

        let decimals = match Decimals::from_steps(&seed.tick_size, &seed.step_size) {
            Ok(decimals) => decimals,
            Err(err) => {
                drop(ledger);
                return Err(self.fail(method, request, err));
            }
        };
        if !decimals.fits_price(price) || !decimals.fits_amount(amount) {
            drop(ledger);
            return Err(self.fail(
                method,
                request,
                ExecutionError::OrderRejected(format!(
                    "precision exceeds {} price / {} amount decimals",
                    decimals.price_decimal, decimals.amount_decimal
                )),
            ));
        }

        let (spend_asset, spend_amount) = match side {
            Side::Buy => (symbol.quote(), amount * price),
            Side::Sell => (symbol.base(), amount),
        };
        let available = ledger.free(spend_asset);
        if available + f64::EPSILON < spend_amount {
            drop(ledger);
            return Err(self.fail(
                method,
                request,
                ExecutionError::InsufficientBalance {
                    asset: spend_asset.to_string(),
                    required: spend_amount,
                    available,
                },
            ));
        }

        let now = Utc::now().timestamp();
        let (filled, cost) = match ledger.markets.get_mut(&native) {
            Some(seed) => seed.take_liquidity(side, price, amount, now),
            None => (0.0, 0.0),
        };
        let remaining = amount - filled;
        let rate = self.config.commission_rate;

        let commission = match side {
            Side::Buy => {
                // Unfilled quantity locks at the limit price; fills cost book prices.
                let quote = ledger.balance_mut(symbol.quote());
                quote.free -= cost + remaining * price;
                quote.locked += remaining * price;
                let fee = filled * rate;
                ledger.balance_mut(symbol.base()).free += filled - fee;
                fee
            }
            Side::Sell => {
                let base = ledger.balance_mut(symbol.base());
                base.free -= amount;
                base.locked += remaining;
                let fee = cost * rate;
                ledger.balance_mut(symbol.quote()).free += cost - fee;
                fee
            }
        };

        let id = Uuid::new_v4().to_string();
        let mut order = MakedOrder::unfilled(id.clone(), side).with_request(amount, price);
        if filled > 0.0 {
            order = order.with_execution(filled, cost / filled, commission);
        }
        let state = if order.is_filled() {
            OrderState::Filled
        } else {
            OrderState::Open
        };

        ledger.orders.insert(
            id.clone(),
            PaperOrder {
                native: native.clone(),
                order: order.clone(),
                state,
            },
        );
        ledger.order_sequence.push(id);
        drop(ledger);

        info!(
            exchange = "paper",
            symbol = %symbol,
            side = %side,
            amount,
            price,
            filled,
            status = %order.status,
            "Order placed"
        );
        Ok(self.respond(method, request, order))
    }
}

#[async_trait]
impl ExchangeAdapter for PaperExchange {
    async fn init(&mut self, credentials: Credentials, depth: usize) -> Result<()> {
        check_depth(depth)?;
        debug!(
            exchange = "paper",
            depth,
            authenticated = !credentials.is_empty(),
            "Initialized"
        );
        self.credentials = credentials;
        self.depth = depth;
        Ok(())
    }

    fn exchange_name(&self) -> &'static str {
        "paper"
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[async_trait]
impl MarketData for PaperExchange {
    async fn get_all_symbols(&self) -> Result<Vec<Symbol>> {
        self.simulate_latency().await;
        let listing = self.ledger.lock().listing.clone();

        let mut symbols = Vec::with_capacity(listing.len());
        for native in &listing {
            match self.mapper.from_native(native) {
                Ok(symbol) => symbols.push(symbol),
                Err(err) => warn!(exchange = "paper", native, error = %err, "Skipping pair"),
            }
        }

        let symbols = prioritize(symbols);
        Ok(self.respond("getAllSymbols", json!({}), symbols))
    }

    async fn get_decs(&self, symbol: &Symbol) -> Result<Decimals> {
        self.simulate_latency().await;
        let decimals = self.read_market("getDecs", symbol, |seed| {
            Ok(Decimals::from_steps(&seed.tick_size, &seed.step_size)?)
        })?;
        let native = self.mapper.to_native(symbol);
        Ok(self.respond("getDecs", json!({ "symbol": native }), decimals))
    }

    async fn get_order_book(&self, symbol: &Symbol) -> Result<OrderBook> {
        self.simulate_latency().await;
        let depth = self.depth;
        let book = self.read_market("getOrderBook", symbol, |seed| {
            Ok(OrderBook::normalize(
                seed.asks.clone(),
                seed.bids.clone(),
                depth,
            )?)
        })?;
        let native = self.mapper.to_native(symbol);
        Ok(self.respond(
            "getOrderBook",
            json!({ "symbol": native, "limit": depth }),
            book,
        ))
    }

    async fn get_last_price(&self, symbol: &Symbol) -> Result<f64> {
        self.simulate_latency().await;
        let native = self.mapper.to_native(symbol);
        let price = self.read_market("getLastPrice", symbol, |seed| Ok(seed.last_price))?;
        match price {
            Some(price) => Ok(self.respond("getLastPrice", json!({ "symbol": native }), price)),
            None => Err(self.reject(
                "getLastPrice",
                json!({ "symbol": native }),
                404,
                format!("no ticker for {native}"),
            )),
        }
    }

    async fn get_kline(&self, symbol: &Symbol, candle_period: u32) -> Result<KLine> {
        self.simulate_latency().await;
        let kline = self.read_market("getKLine", symbol, |seed| {
            let bars = aggregate_bars(&seed.minute_bars, candle_period)?;
            Ok(KLine::from_bars(bars)?)
        })?;
        let native = self.mapper.to_native(symbol);
        Ok(self.respond(
            "getKLine",
            json!({ "symbol": native, "period": candle_period }),
            kline,
        ))
    }

    async fn get_trade_history(&self, symbol: &Symbol) -> Result<Vec<Trade>> {
        self.simulate_latency().await;
        let raw = self.read_market("getTradeHistory", symbol, |seed| Ok(seed.trades.clone()))?;
        let trades = normalize_trades(raw);
        let native = self.mapper.to_native(symbol);
        Ok(self.respond("getTradeHistory", json!({ "symbol": native }), trades))
    }
}

#[async_trait]
impl Trading for PaperExchange {
    /// Zero balances are omitted.
    async fn get_balances(&self) -> Result<HashMap<String, Balance>> {
        self.simulate_latency().await;
        let request = json!({});
        self.require_credentials("getBalances", &request)?;

        let balances: HashMap<String, Balance> = self
            .ledger
            .lock()
            .balances
            .iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(asset, balance)| (asset.clone(), *balance))
            .collect();
        Ok(self.respond("getBalances", request, balances))
    }

    async fn buy(&self, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder> {
        self.simulate_latency().await;
        self.place(Side::Buy, symbol, amount, price)
    }

    async fn sell(&self, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder> {
        self.simulate_latency().await;
        self.place(Side::Sell, symbol, amount, price)
    }

    async fn cancel_order(&self, symbol: &Symbol, id: &str) -> Result<()> {
        self.simulate_latency().await;
        let native = self.mapper.to_native(symbol);
        let request = json!({ "symbol": native, "orderId": id });
        self.require_credentials("cancelOrder", &request)?;

        let mut ledger = self.ledger.lock();
        let entry = ledger
            .orders
            .get(id)
            .filter(|entry| entry.native == native)
            .cloned();
        let Some(entry) = entry else {
            drop(ledger);
            return Err(self.fail(
                "cancelOrder",
                request,
                ExecutionError::OrderNotFound {
                    symbol: symbol.to_string(),
                    id: id.to_string(),
                },
            ));
        };
        if entry.state != OrderState::Open {
            drop(ledger);
            return Err(self.fail(
                "cancelOrder",
                request,
                ExecutionError::OrderNotOpen {
                    id: id.to_string(),
                    status: format!("{:?}", entry.state).to_ascii_uppercase(),
                },
            ));
        }

        let remaining = entry.order.remaining();
        let (asset, released) = match entry.order.side {
            Side::Buy => (symbol.quote(), remaining * entry.order.price),
            Side::Sell => (symbol.base(), remaining),
        };
        let balance = ledger.balance_mut(asset);
        balance.locked = (balance.locked - released).max(0.0);
        balance.free += released;
        if let Some(stored) = ledger.orders.get_mut(id) {
            stored.state = OrderState::Cancelled;
        }
        drop(ledger);

        debug!(exchange = "paper", symbol = %symbol, order_id = id, "Order cancelled");
        self.respond("cancelOrder", request, json!({ "orderId": id, "status": "CANCELED" }));
        Ok(())
    }

    async fn get_order_status(&self, symbol: &Symbol, id: &str) -> Result<MakedOrder> {
        self.simulate_latency().await;
        let native = self.mapper.to_native(symbol);
        let request = json!({ "symbol": native, "orderId": id });
        self.require_credentials("getOrderStatus", &request)?;

        let order = self
            .ledger
            .lock()
            .orders
            .get(id)
            .filter(|entry| entry.native == native)
            .map(|entry| entry.order.clone());
        match order {
            Some(order) => Ok(self.respond("getOrderStatus", request, order)),
            None => Err(self.fail(
                "getOrderStatus",
                request,
                ExecutionError::OrderNotFound {
                    symbol: symbol.to_string(),
                    id: id.to_string(),
                },
            )),
        }
    }

    async fn get_my_open_orders(&self, symbol: &Symbol) -> Result<Vec<MakedOrder>> {
        self.simulate_latency().await;
        let native = self.mapper.to_native(symbol);
        let request = json!({ "symbol": native });
        self.require_credentials("getMyOpenOrders", &request)?;

        let open: Vec<MakedOrder> = {
            let ledger = self.ledger.lock();
            ledger
                .order_sequence
                .iter()
                .filter_map(|id| ledger.orders.get(id))
                .filter(|entry| entry.native == native && entry.state == OrderState::Open)
                .map(|entry| entry.order.clone())
                .collect()
        };
        Ok(self.respond("getMyOpenOrders", request, open))
    }

    async fn withdraw(&self, asset: &str, address: &str, chain: &str, amount: f64) -> Result<String> {
        self.simulate_latency().await;
        let asset = asset.trim().to_ascii_uppercase();
        let request = json!({
            "asset": asset,
            "address": address,
            "chain": chain,
            "amount": amount,
        });
        self.require_credentials("withdraw", &request)?;

        if address.trim().is_empty() || chain.trim().is_empty() {
            return Err(self.fail(
                "withdraw",
                request,
                ExecutionError::WithdrawalRejected("address and chain are required".to_string()),
            ));
        }
        if !(amount.is_finite() && amount > 0.0) {
            return Err(self.fail(
                "withdraw",
                request,
                ExecutionError::WithdrawalRejected(format!("invalid amount {amount}")),
            ));
        }

        let mut ledger = self.ledger.lock();
        let available = ledger.free(&asset);
        if available + f64::EPSILON < amount {
            drop(ledger);
            return Err(self.fail(
                "withdraw",
                request,
                ExecutionError::InsufficientBalance {
                    asset,
                    required: amount,
                    available,
                },
            ));
        }
        ledger.balance_mut(&asset).free -= amount;

        let id = Uuid::new_v4().to_string();
        ledger.withdrawals.insert(
            id.clone(),
            Withdrawal {
                asset: asset.clone(),
                address: address.to_string(),
                chain: chain.to_string(),
                amount,
            },
        );
        drop(ledger);

        info!(exchange = "paper", %asset, chain, amount, withdrawal_id = %id, "Withdrawal requested");
        Ok(self.respond("withdraw", request, id))
    }
}
