//! Market data command handlers.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::Commands;
use crate::adapter::inbound::cli::output::Report;
use crate::domain::{Symbol, Trade};
use crate::error::Result;
use crate::port::outbound::exchange::MarketData;

#[derive(Tabled)]
struct SymbolRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Quote")]
    quote: String,
    #[tabled(rename = "Base")]
    base: String,
}

#[derive(Tabled)]
struct DecimalsRow {
    #[tabled(rename = "Price Decimals")]
    price: u32,
    #[tabled(rename = "Amount Decimals")]
    amount: u32,
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "Price")]
    price: f64,
    #[tabled(rename = "Amount")]
    amount: f64,
}

#[derive(Tabled)]
struct CandleRow {
    #[tabled(rename = "Time")]
    time: i64,
    #[tabled(rename = "Open")]
    open: f64,
    #[tabled(rename = "High")]
    high: f64,
    #[tabled(rename = "Low")]
    low: f64,
    #[tabled(rename = "Close")]
    close: f64,
    #[tabled(rename = "Volume")]
    volume: f64,
}

#[derive(Tabled)]
struct TradeRow {
    #[tabled(rename = "Time")]
    time: i64,
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "Price")]
    price: f64,
    #[tabled(rename = "Amount")]
    amount: f64,
}

/// Run one command against a market data adapter.
pub async fn execute(command: &Commands, market: &dyn MarketData) -> Result<Report> {
    match command {
        Commands::Symbols => symbols(market).await,
        Commands::Decs(args) => decs(market, &args.symbol).await,
        Commands::Book(args) => book(market, &args.symbol).await,
        Commands::Price(args) => price(market, &args.symbol).await,
        Commands::Kline(args) => kline(market, &args.symbol, args.period).await,
        Commands::Trades(args) => trades(market, &args.symbol).await,
    }
}

async fn symbols(market: &dyn MarketData) -> Result<Report> {
    let symbols = market.get_all_symbols().await?;
    let rows = symbols
        .iter()
        .map(|symbol| SymbolRow {
            symbol: symbol.to_string(),
            quote: symbol.quote().to_string(),
            base: symbol.base().to_string(),
        })
        .collect();
    Ok(Report::table(&symbols, rows))
}

async fn decs(market: &dyn MarketData, symbol: &Symbol) -> Result<Report> {
    let decimals = market.get_decs(symbol).await?;
    let rows = vec![DecimalsRow {
        price: decimals.price_decimal,
        amount: decimals.amount_decimal,
    }];
    Ok(Report::table(&decimals, rows))
}

/// Asks are listed best last so the spread sits in the middle.
async fn book(market: &dyn MarketData, symbol: &Symbol) -> Result<Report> {
    let book = market.get_order_book(symbol).await?;
    let asks = book.asks.iter().rev().map(|level| LevelRow {
        side: "ask",
        price: level.price,
        amount: level.amount,
    });
    let bids = book.bids.iter().map(|level| LevelRow {
        side: "bid",
        price: level.price,
        amount: level.amount,
    });
    Ok(Report::table(&book, asks.chain(bids).collect()))
}

async fn price(market: &dyn MarketData, symbol: &Symbol) -> Result<Report> {
    let price = market.get_last_price(symbol).await?;
    Ok(Report::line(
        &json!({ "symbol": symbol, "price": price }),
        price.to_string(),
    ))
}

async fn kline(market: &dyn MarketData, symbol: &Symbol, period: u32) -> Result<Report> {
    let kline = market.get_kline(symbol, period).await?;
    let rows = kline
        .price_candles
        .iter()
        .zip(&kline.volume_candles)
        .map(|(candle, volume)| CandleRow {
            time: candle.time,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: volume.value,
        })
        .collect();
    Ok(Report::table(&kline, rows))
}

async fn trades(market: &dyn MarketData, symbol: &Symbol) -> Result<Report> {
    let trades = market.get_trade_history(symbol).await?;
    let rows = trades.iter().map(trade_row).collect();
    Ok(Report::table(&trades, rows))
}

fn trade_row(trade: &Trade) -> TradeRow {
    TradeRow {
        time: trade.time,
        side: trade.side.map_or("-", |side| side.as_str()),
        price: trade.price,
        amount: trade.amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::inbound::cli::command::{KlineArgs, SymbolArg};
    use crate::adapter::outbound::paper::{MarketSeed, PaperConfig, PaperExchange};
    use crate::domain::{Bar, Order};

    fn market() -> PaperExchange {
        PaperExchange::new(PaperConfig::default())
            .with_market(
                "ETH/BTC",
                MarketSeed::new("0.01", "0.001")
                    .with_asks(vec![Order::new(25.5, 1.0)])
                    .with_bids(vec![Order::new(24.5, 2.0)])
                    .with_minute_bars(vec![Bar {
                        time: 60,
                        open: 24.0,
                        high: 25.0,
                        low: 23.0,
                        close: 25.0,
                        volume: 3.0,
                    }])
                    .with_trades(vec![
                        Trade::new(20, 1.0, 25.0, None),
                        Trade::new(10, 1.0, 24.0, None),
                    ])
                    .with_last_price(25.0),
            )
            .with_market("LINK/USDT", MarketSeed::new("0.001", "0.1"))
    }

    fn arg(symbol: &str) -> SymbolArg {
        SymbolArg {
            symbol: symbol.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn symbols_list_usdt_first() {
        let report = execute(&Commands::Symbols, &market()).await.unwrap();
        assert_eq!(report.json, json!(["USDT_LINK", "BTC_ETH"]));
        assert!(report.text.contains("USDT_LINK"));
    }

    #[tokio::test]
    async fn book_renders_both_sides() {
        let report = execute(&Commands::Book(arg("BTC_ETH")), &market()).await.unwrap();
        assert_eq!(report.json["asks"][0]["price"], json!(25.5));
        assert!(report.text.contains("ask"));
        assert!(report.text.contains("bid"));
    }

    #[tokio::test]
    async fn trades_show_inferred_sides() {
        let report = execute(&Commands::Trades(arg("BTC_ETH")), &market()).await.unwrap();
        assert_eq!(report.json[0]["side"], serde_json::Value::Null);
        assert_eq!(report.json[1]["side"], json!("BUY"));
        assert!(report.text.contains("BUY"));
    }

    #[tokio::test]
    async fn kline_and_price_render() {
        let exchange = market();
        let kline = execute(
            &Commands::Kline(KlineArgs {
                symbol: "BTC_ETH".parse().unwrap(),
                period: 1,
            }),
            &exchange,
        )
        .await
        .unwrap();
        assert_eq!(kline.json["volumeCandles"][0]["value"], json!(3.0));

        let price = execute(&Commands::Price(arg("BTC_ETH")), &exchange).await.unwrap();
        assert_eq!(price.text, "25");
        assert_eq!(price.json["price"], json!(25.0));
    }

    #[tokio::test]
    async fn unknown_symbol_is_an_error() {
        assert!(execute(&Commands::Decs(arg("USDT_XRP")), &market()).await.is_err());
    }
}
