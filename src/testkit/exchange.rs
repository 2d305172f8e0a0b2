//! Ready-made exchanges for contract tests.

use async_trait::async_trait;

use crate::adapter::outbound::paper::{MarketSeed, PaperConfig, PaperExchange};
use crate::domain::{Decimals, KLine, OrderBook, Symbol, Trade};
use crate::error::Result;
use crate::port::outbound::diagnostics::Diagnostics;
use crate::port::outbound::exchange::{Credentials, ExchangeAdapter, MarketData};

use super::domain::{levels, minute_bar, unsided_trade};

/// Paper exchange listing `BTC_ETH`, `USDT_BTC` and `ETH_LINK`, funded
/// with 100 BTC, 50 ETH and 10 000 USDT.
///
/// The `BTC_ETH` book arrives unsorted and with one empty level; its trades
/// carry no sides and arrive newest first.
pub fn seeded_paper() -> PaperExchange {
    let mut config = PaperConfig::default();
    config.balances.insert("BTC".into(), 100.0);
    config.balances.insert("ETH".into(), 50.0);
    config.balances.insert("USDT".into(), 10_000.0);

    PaperExchange::new(config)
        .with_market(
            "LINK/ETH",
            MarketSeed::new("0.000001", "0.1")
                .with_asks(levels(&[(0.0051, 100.0)]))
                .with_bids(levels(&[(0.0049, 100.0)]))
                .with_last_price(0.005),
        )
        .with_market(
            "ETH/BTC",
            MarketSeed::new("0.01", "0.001")
                .with_asks(levels(&[(26.0, 2.0), (25.5, 1.0), (27.0, 0.0), (28.0, 4.0)]))
                .with_bids(levels(&[(24.0, 1.0), (24.5, 3.0), (23.0, 5.0)]))
                .with_minute_bars(vec![
                    minute_bar(120, 25.0, 24.0, 1.5),
                    minute_bar(0, 24.0, 25.0, 1.0),
                    minute_bar(60, 25.0, 25.0, 2.0),
                ])
                .with_trades(vec![
                    unsided_trade(40, 24.2, 1.0),
                    unsided_trade(30, 24.5, 0.2),
                    unsided_trade(20, 24.5, 0.1),
                    unsided_trade(10, 24.0, 0.5),
                ])
                .with_last_price(25.0),
        )
        .with_market(
            "BTC/USDT",
            MarketSeed::new("0.01", "0.00001")
                .with_asks(levels(&[(60_001.0, 0.5)]))
                .with_bids(levels(&[(59_999.0, 0.5)]))
                .with_last_price(60_000.0),
        )
}

/// [`seeded_paper`] initialized with test credentials and `depth`.
pub async fn authed_paper(depth: usize) -> PaperExchange {
    let mut exchange = seeded_paper();
    exchange
        .init(Credentials::new("test-key", "test-secret", ""), depth)
        .await
        .unwrap_or_else(|err| panic!("paper init failed: {err}"));
    exchange
}

/// Market data adapter returning whatever it was scripted with,
/// bypassing every normalization.
#[derive(Default)]
pub struct ScriptedMarket {
    pub symbols: Vec<Symbol>,
    pub decimals: Decimals,
    pub book: OrderBook,
    pub last_price: f64,
    pub kline: KLine,
    pub trades: Vec<Trade>,
    pub diagnostics: Diagnostics,
}

#[async_trait]
impl ExchangeAdapter for ScriptedMarket {
    async fn init(&mut self, _credentials: Credentials, _depth: usize) -> Result<()> {
        Ok(())
    }

    fn exchange_name(&self) -> &'static str {
        "scripted"
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[async_trait]
impl MarketData for ScriptedMarket {
    async fn get_all_symbols(&self) -> Result<Vec<Symbol>> {
        self.diagnostics.record("getAllSymbols", "", "");
        Ok(self.symbols.clone())
    }

    async fn get_decs(&self, _symbol: &Symbol) -> Result<Decimals> {
        Ok(self.decimals)
    }

    async fn get_order_book(&self, _symbol: &Symbol) -> Result<OrderBook> {
        self.diagnostics.record("getOrderBook", "", "");
        Ok(self.book.clone())
    }

    async fn get_last_price(&self, _symbol: &Symbol) -> Result<f64> {
        Ok(self.last_price)
    }

    async fn get_kline(&self, _symbol: &Symbol, _candle_period: u32) -> Result<KLine> {
        Ok(self.kline.clone())
    }

    async fn get_trade_history(&self, _symbol: &Symbol) -> Result<Vec<Trade>> {
        Ok(self.trades.clone())
    }
}
