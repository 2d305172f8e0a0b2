//! Exchange contract tests.
//!
//! Every adapter must satisfy the same observable behaviour. These tests run
//! the contract against the paper exchange, the validating decorator and the
//! factory, without touching the network.

mod support;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use support::assertions::{
    assert_book_invariants, assert_kline_aligned, assert_near, assert_trades_ordered,
};
use support::config::UNREACHABLE_BINANCE_TOML;
use tradeport::adapter::outbound::paper::{PaperConfig, PaperExchange};
use tradeport::adapter::outbound::validated::ValidatedExchange;
use tradeport::domain::{
    Balance, Color, DomainError, MakedOrder, Order, OrderBook, Side, Status, Symbol,
};
use tradeport::error::{Error, ExecutionError, Result};
use tradeport::infrastructure::config::settings::Config;
use tradeport::infrastructure::exchange::ExchangeFactory;
use tradeport::port::{
    Credentials, Diagnostics, ExchangeAdapter, MarketData, SharedExchange, Trading,
};
use tradeport::testkit::domain::symbol;
use tradeport::testkit::exchange::{authed_paper, seeded_paper, ScriptedMarket};

// =============================================================================
// Market data
// =============================================================================

#[tokio::test]
async fn symbols_are_grouped_by_quote_tier() {
    let exchange = authed_paper(10).await;

    let symbols = exchange.get_all_symbols().await.unwrap();

    assert_eq!(
        symbols,
        vec![symbol("USDT_BTC"), symbol("BTC_ETH"), symbol("ETH_LINK")]
    );
}

#[tokio::test]
async fn decs_come_from_step_sizes() {
    let exchange = authed_paper(10).await;

    let decs = exchange.get_decs(&symbol("BTC_ETH")).await.unwrap();

    assert_eq!((decs.price_decimal, decs.amount_decimal), (2, 3));
    assert_eq!(decs.round_amount(0.123_9), 0.123);
}

#[tokio::test]
async fn order_book_is_sorted_trimmed_and_depth_limited() {
    let exchange = authed_paper(2).await;

    let book = exchange.get_order_book(&symbol("BTC_ETH")).await.unwrap();

    assert_book_invariants(&book, 2);
    assert_eq!(book.asks, vec![Order::new(25.5, 1.0), Order::new(26.0, 2.0)]);
    assert_eq!(book.bids, vec![Order::new(24.5, 3.0), Order::new(24.0, 1.0)]);
}

#[tokio::test]
async fn order_book_keeps_every_usable_level_under_large_depth() {
    let exchange = authed_paper(50).await;

    let book = exchange.get_order_book(&symbol("BTC_ETH")).await.unwrap();

    assert_book_invariants(&book, 50);
    // The zero-amount ask at 27 is dropped.
    assert_eq!(book.asks.len(), 3);
    assert_eq!(book.bids.len(), 3);
    assert_near(book.spread().unwrap(), 1.0, 1e-9);
}

#[tokio::test]
async fn kline_is_aligned_and_colored() {
    let exchange = authed_paper(10).await;

    let kline = exchange.get_kline(&symbol("BTC_ETH"), 1).await.unwrap();

    assert_kline_aligned(&kline);
    let colors: Vec<Color> = kline.volume_candles.iter().map(|c| c.color).collect();
    // An unchanged close counts as green.
    assert_eq!(colors, vec![Color::Green, Color::Green, Color::Red]);
    let times: Vec<i64> = kline.price_candles.iter().map(|c| c.time).collect();
    assert_eq!(times, vec![0, 60, 120]);
}

#[tokio::test]
async fn kline_buckets_follow_the_candle_period() {
    let exchange = authed_paper(10).await;

    let kline = exchange.get_kline(&symbol("BTC_ETH"), 2).await.unwrap();

    assert_kline_aligned(&kline);
    assert_eq!(kline.len(), 2);
    let first = &kline.price_candles[0];
    assert_eq!((first.time, first.open, first.close), (0, 24.0, 25.0));
    assert_near(kline.volume_candles[0].value, 3.0, 1e-9);
    assert_eq!(kline.volume_candles[1].color, Color::Red);
}

#[tokio::test]
async fn trades_are_oldest_first_with_inferred_sides() {
    // 24.0, 24.5, 24.5, 24.2: the flat step says nothing about the aggressor.
    let exchange = authed_paper(10).await;

    let trades = exchange.get_trade_history(&symbol("BTC_ETH")).await.unwrap();

    assert_trades_ordered(&trades);
    let sides: Vec<Option<Side>> = trades.iter().map(|t| t.side).collect();
    assert_eq!(
        sides,
        vec![None, Some(Side::Buy), None, Some(Side::Sell)]
    );
}

#[tokio::test]
async fn unknown_symbol_fails_with_diagnostics() {
    let exchange = authed_paper(10).await;

    let err = exchange
        .get_last_price(&symbol("SHIB_DOGE"))
        .await
        .unwrap_err();

    match err {
        Error::Exchange {
            status, context, ..
        } => {
            assert_eq!(status, 400);
            assert!(context.contains("getLastPrice"), "context: {context}");
            assert!(context.contains("DOGE/SHIB"), "context: {context}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(exchange.format_error().starts_with("method: getLastPrice"));
}

#[tokio::test]
async fn concurrent_calls_never_mix_diagnostics() {
    let exchange = Arc::new(authed_paper(10).await);
    let sym = symbol("BTC_ETH");

    let mut handles = Vec::new();
    for i in 0..32 {
        let exchange = Arc::clone(&exchange);
        let sym = sym.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                exchange.get_last_price(&sym).await.map(|_| ())
            } else {
                exchange.get_order_book(&sym).await.map(|_| ())
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let record = exchange.diagnostics().snapshot();
    let received = String::from_utf8(record.received).unwrap();
    match record.method.as_str() {
        "getLastPrice" => assert_eq!(received.parse::<f64>().unwrap(), 25.0),
        "getOrderBook" => assert!(received.contains("asks"), "received: {received}"),
        other => panic!("unexpected method {other}"),
    }
}

// =============================================================================
// Trading
// =============================================================================

#[tokio::test]
async fn resting_buy_reports_not_filled_without_guessing() {
    let exchange = authed_paper(10).await;

    let order = exchange.buy(&symbol("BTC_ETH"), 0.01, 25.0).await.unwrap();

    assert!(!order.id.is_empty());
    assert_eq!(order.status, Status::NotFilled);
    assert_eq!(order.side, Side::Buy);
    assert!(!order.has_execution());
    assert_near(order.right_amount, 0.01, 1e-12);
    assert_near(order.left_amount, 0.25, 1e-12);

    let open = exchange.get_my_open_orders(&symbol("BTC_ETH")).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, order.id);
}

#[tokio::test]
async fn order_status_reflects_a_fill() {
    let exchange = authed_paper(10).await;
    let sym = symbol("BTC_ETH");

    let order = exchange.sell(&sym, 1.0, 24.5).await.unwrap();
    let status = exchange.get_order_status(&sym, &order.id).await.unwrap();

    assert_eq!(status.status, Status::Filled);
    assert_near(status.price_executed, 24.5, 1e-9);
    assert_near(status.right_amount_executed, 1.0, 1e-12);
    assert!(exchange.get_my_open_orders(&sym).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_account_has_no_balances() {
    let mut exchange = PaperExchange::new(PaperConfig::default());
    exchange
        .init(Credentials::new("key", "secret", ""), 10)
        .await
        .unwrap();

    let balances = exchange.get_balances().await.unwrap();

    assert!(balances.is_empty());
}

#[tokio::test]
async fn trading_without_credentials_is_unauthorized() {
    let mut exchange = seeded_paper();
    exchange.init(Credentials::default(), 10).await.unwrap();

    assert!(exchange.get_order_book(&symbol("BTC_ETH")).await.is_ok());
    for result in [
        exchange.get_balances().await.map(|_| ()),
        exchange.buy(&symbol("BTC_ETH"), 0.01, 25.0).await.map(|_| ()),
        exchange.get_my_open_orders(&symbol("BTC_ETH")).await.map(|_| ()),
    ] {
        assert!(
            matches!(result, Err(Error::Exchange { status: 401, .. })),
            "expected 401, got {result:?}"
        );
    }
}

#[tokio::test]
async fn cancelling_an_unknown_order_fails() {
    let exchange = authed_paper(10).await;

    let err = exchange
        .cancel_order(&symbol("BTC_ETH"), "no-such-order")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Execution(ExecutionError::OrderNotFound { .. })
    ));
}

#[tokio::test]
async fn cancel_all_clears_open_orders() {
    let exchange = authed_paper(10).await;
    let sym = symbol("BTC_ETH");
    exchange.buy(&sym, 0.01, 20.0).await.unwrap();
    exchange.buy(&sym, 0.02, 21.0).await.unwrap();

    exchange.cancel_all(&sym).await.unwrap();

    assert!(exchange.get_my_open_orders(&sym).await.unwrap().is_empty());
    let btc = exchange.get_balances().await.unwrap()["BTC"];
    assert_near(btc.locked, 0.0, 1e-12);
    assert_near(btc.free, 100.0, 1e-9);
}

/// Trading adapter that refuses to cancel one particular order.
struct StubbornCancel {
    inner: PaperExchange,
    refused: parking_lot::Mutex<Option<String>>,
}

#[async_trait]
impl ExchangeAdapter for StubbornCancel {
    async fn init(&mut self, credentials: Credentials, depth: usize) -> Result<()> {
        self.inner.init(credentials, depth).await
    }

    fn exchange_name(&self) -> &'static str {
        "stubborn"
    }

    fn diagnostics(&self) -> &Diagnostics {
        self.inner.diagnostics()
    }
}

#[async_trait]
impl Trading for StubbornCancel {
    async fn get_balances(&self) -> Result<HashMap<String, Balance>> {
        self.inner.get_balances().await
    }

    async fn buy(&self, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder> {
        self.inner.buy(symbol, amount, price).await
    }

    async fn sell(&self, symbol: &Symbol, amount: f64, price: f64) -> Result<MakedOrder> {
        self.inner.sell(symbol, amount, price).await
    }

    async fn cancel_order(&self, symbol: &Symbol, id: &str) -> Result<()> {
        if self.refused.lock().as_deref() == Some(id) {
            return Err(Error::Exchange {
                status: 503,
                message: "cancel temporarily unavailable".to_string(),
                context: String::new(),
            });
        }
        self.inner.cancel_order(symbol, id).await
    }

    async fn get_order_status(&self, symbol: &Symbol, id: &str) -> Result<MakedOrder> {
        self.inner.get_order_status(symbol, id).await
    }

    async fn get_my_open_orders(&self, symbol: &Symbol) -> Result<Vec<MakedOrder>> {
        self.inner.get_my_open_orders(symbol).await
    }

    async fn withdraw(&self, asset: &str, address: &str, chain: &str, amount: f64) -> Result<String> {
        self.inner.withdraw(asset, address, chain, amount).await
    }
}

#[tokio::test]
async fn cancel_all_reports_partial_failure() {
    let exchange = StubbornCancel {
        inner: authed_paper(10).await,
        refused: parking_lot::Mutex::new(None),
    };
    let sym = symbol("BTC_ETH");
    exchange.buy(&sym, 0.01, 20.0).await.unwrap();
    let stuck = exchange.buy(&sym, 0.01, 21.0).await.unwrap();
    exchange.buy(&sym, 0.01, 22.0).await.unwrap();
    *exchange.refused.lock() = Some(stuck.id.clone());

    let err = exchange.cancel_all(&sym).await.unwrap_err();

    match err {
        Error::Execution(ExecutionError::PartialCancel {
            cancelled,
            total,
            failures,
            ..
        }) => {
            assert_eq!((cancelled, total), (2, 3));
            assert_eq!(failures.len(), 1);
            assert!(failures[0].starts_with(&stuck.id));
        }
        other => panic!("unexpected error {other:?}"),
    }
    let open = exchange.get_my_open_orders(&sym).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, stuck.id);
}

// =============================================================================
// Validation decorator
// =============================================================================

#[tokio::test]
async fn validated_market_rejects_raw_contract_violations() {
    let scripted = ScriptedMarket {
        symbols: vec![symbol("ETH_LINK"), symbol("USDT_BTC")],
        book: OrderBook {
            asks: vec![Order::new(26.0, 1.0), Order::new(25.0, 1.0)],
            bids: vec![Order::new(24.0, 1.0)],
        },
        last_price: -1.0,
        ..ScriptedMarket::default()
    };
    let exchange = ValidatedExchange::new(scripted);
    let sym = symbol("BTC_ETH");

    assert!(matches!(
        exchange.get_all_symbols().await,
        Err(Error::Domain(DomainError::UnorderedSeries { .. }))
    ));
    assert!(matches!(
        exchange.get_order_book(&sym).await,
        Err(Error::Domain(DomainError::UnsortedBook { .. }))
    ));
    assert!(exchange.get_last_price(&sym).await.is_err());
    assert!(exchange.get_kline(&sym, 1).await.unwrap().is_empty());
    assert!(exchange.get_trade_history(&sym).await.unwrap().is_empty());
    // The inner adapter's last call is still visible through the wrapper.
    assert!(exchange.format_error().contains("getOrderBook"));
}

#[tokio::test]
async fn validated_paper_passes_the_contract() {
    let mut exchange = ValidatedExchange::new(seeded_paper());
    exchange
        .init(Credentials::new("key", "secret", ""), 2)
        .await
        .unwrap();
    let sym = symbol("BTC_ETH");

    assert_book_invariants(&exchange.get_order_book(&sym).await.unwrap(), 2);
    assert_kline_aligned(&exchange.get_kline(&sym, 1).await.unwrap());
    assert_trades_ordered(&exchange.get_trade_history(&sym).await.unwrap());
    let order = exchange.buy(&sym, 0.01, 25.0).await.unwrap();
    assert_eq!(exchange.inner().depth(), 2);
    assert_eq!(
        exchange.get_order_status(&sym, &order.id).await.unwrap().id,
        order.id
    );
}

// =============================================================================
// Factory
// =============================================================================

#[tokio::test]
async fn factory_builds_paper_trading_surface() {
    let config = Config::parse_toml(support::config::PAPER_TOML).unwrap();

    let exchange: SharedExchange = ExchangeFactory::exchange(&config).await.unwrap();

    assert_eq!(exchange.exchange_name(), "paper");
    let book = exchange.get_order_book(&symbol("BTC_ETH")).await.unwrap();
    assert_book_invariants(&book, 2);
}

#[tokio::test]
async fn factory_refuses_binance_trading() {
    let config = Config::parse_toml(UNREACHABLE_BINANCE_TOML).unwrap();

    let market = ExchangeFactory::market_data(&config).await.unwrap();
    assert_eq!(market.exchange_name(), "binance");

    let err = ExchangeFactory::exchange(&config).await.err().unwrap();
    assert!(matches!(
        err,
        Error::Unsupported {
            exchange: "binance",
            operation: "trading"
        }
    ));
}
