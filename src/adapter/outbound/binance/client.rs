//! Binance public REST client.
//!
//! Implements the [`MarketData`] half of the exchange contract over the
//! unauthenticated `/api/v3` endpoints. Trading needs signed requests and is
//! not provided, so this adapter is only handed out as
//! [`SharedMarketData`](crate::port::SharedMarketData).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::dto::{
    BinanceApiError, BinanceDepth, BinanceExchangeInfo, BinanceKline, BinanceTickerPrice,
    BinanceTrade,
};
use super::settings::BinanceConfig;
use crate::domain::error::DomainError;
use crate::domain::symbol::prioritize;
use crate::domain::trade::{normalize_trades, MAX_TRADES};
use crate::domain::candle::MAX_CANDLES;
use crate::domain::{Bar, Decimals, KLine, OrderBook, Symbol, Trade};
use crate::error::{Error, Result};
use crate::port::outbound::diagnostics::{DebugRecord, Diagnostics};
use crate::port::outbound::exchange::{check_depth, Credentials, ExchangeAdapter, MarketData};
use crate::port::outbound::symbol::{ConcatMapper, SymbolMapper};

/// Book sizes the depth endpoint accepts.
const DEPTH_LIMITS: [usize; 8] = [5, 10, 20, 50, 100, 500, 1000, 5000];

const DEFAULT_DEPTH: usize = 20;

/// Smallest accepted depth limit covering `depth` levels.
#[must_use]
pub fn depth_limit(depth: usize) -> usize {
    DEPTH_LIMITS
        .iter()
        .copied()
        .find(|limit| *limit >= depth)
        .unwrap_or(DEPTH_LIMITS[DEPTH_LIMITS.len() - 1])
}

/// Binance interval code for a candle period in minutes.
pub fn interval(minutes: u32) -> std::result::Result<&'static str, DomainError> {
    let code = match minutes {
        1 => "1m",
        3 => "3m",
        5 => "5m",
        15 => "15m",
        30 => "30m",
        60 => "1h",
        120 => "2h",
        240 => "4h",
        360 => "6h",
        480 => "8h",
        720 => "12h",
        1440 => "1d",
        4320 => "3d",
        10080 => "1w",
        _ => return Err(DomainError::UnsupportedCandlePeriod { minutes }),
    };
    Ok(code)
}

/// Trading pairs of an `exchangeInfo` listing, parsed from their native
/// names and kept only when they agree with the declared assets.
///
/// Native names carry no separator, so they are split on the quote assets
/// the listing itself declares.
fn listed_symbols(info: &BinanceExchangeInfo) -> Vec<Symbol> {
    let listing = ConcatMapper::new(info.symbols.iter().map(|entry| &entry.quote_asset));
    let mut symbols = Vec::with_capacity(info.symbols.len());
    for entry in info.symbols.iter().filter(|entry| entry.is_trading()) {
        let declared = Symbol::new(&entry.quote_asset, &entry.base_asset);
        match (listing.from_native(&entry.symbol), declared) {
            (Ok(parsed), Ok(declared)) if parsed == declared => symbols.push(parsed),
            (parsed, declared) => {
                debug!(
                    exchange = "binance",
                    native = %entry.symbol,
                    parsed = ?parsed,
                    declared = ?declared,
                    "Skipping pair"
                );
            }
        }
    }
    symbols
}

/// Every row as a bar, or a description of the first row that does not
/// parse. A k-line with holes is refused like one with inconsistent OHLC.
fn parse_klines(rows: &[BinanceKline]) -> std::result::Result<Vec<Bar>, String> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            row.to_bar()
                .ok_or_else(|| format!("unparseable kline at index {index} (open time {})", row.0))
        })
        .collect()
}

/// HTTP adapter for Binance market data.
pub struct BinanceExchange {
    http: HttpClient,
    base_url: String,
    mapper: ConcatMapper,
    depth: usize,
    diagnostics: Diagnostics,
}

impl BinanceExchange {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into(),
            mapper: ConcatMapper::default(),
            depth: DEFAULT_DEPTH,
            diagnostics: Diagnostics::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &BinanceConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            ..Self::new(config.api_url.clone())
        }
    }

    fn native(&self, symbol: &Symbol) -> String {
        self.mapper.to_native(symbol)
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = Url::parse_with_params(
            &format!("{}{path}", self.base_url.trim_end_matches('/')),
            query,
        )?;
        let method = format!("GET {path}");
        let sent = url.query().unwrap_or_default().to_string();
        debug!(exchange = "binance", url = %url, "Request");

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                self.diagnostics.record(method, sent, err.to_string());
                return Err(err.into());
            }
        };
        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                self.diagnostics.record(method, sent, err.to_string());
                return Err(err.into());
            }
        };

        let record = DebugRecord::new(method, sent, body.to_vec());
        if !status.is_success() {
            let message = serde_json::from_slice::<BinanceApiError>(&body)
                .map(|err| err.msg)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            let context = record.format();
            self.diagnostics.store(record);
            warn!(exchange = "binance", path, status = status.as_u16(), %message, "Request rejected");
            return Err(Error::Exchange {
                status: status.as_u16(),
                message,
                context,
            });
        }
        self.diagnostics.store(record);

        Ok(serde_json::from_slice(&body)?)
    }

    /// The exchange answered 2xx with data we cannot use.
    fn malformed(&self, message: String) -> Error {
        warn!(exchange = "binance", %message, "Unusable response");
        Error::Exchange {
            status: 502,
            message,
            context: self.diagnostics.format_error(),
        }
    }
}

#[async_trait]
impl ExchangeAdapter for BinanceExchange {
    async fn init(&mut self, credentials: Credentials, depth: usize) -> Result<()> {
        check_depth(depth)?;
        if !credentials.is_empty() {
            info!(exchange = "binance", "Credentials ignored, public market data only");
        }
        self.depth = depth;
        debug!(exchange = "binance", depth, base_url = %self.base_url, "Initialized");
        Ok(())
    }

    fn exchange_name(&self) -> &'static str {
        "binance"
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[async_trait]
impl MarketData for BinanceExchange {
    async fn get_all_symbols(&self) -> Result<Vec<Symbol>> {
        let info: BinanceExchangeInfo = self.get("/api/v3/exchangeInfo", &[]).await?;

        let symbols = listed_symbols(&info);
        debug!(exchange = "binance", count = symbols.len(), "Fetched symbols");
        Ok(prioritize(symbols))
    }

    async fn get_decs(&self, symbol: &Symbol) -> Result<Decimals> {
        let native = self.native(symbol);
        let info: BinanceExchangeInfo = self
            .get("/api/v3/exchangeInfo", &[("symbol", native.clone())])
            .await?;

        let entry = info
            .symbols
            .iter()
            .find(|entry| entry.symbol == native)
            .ok_or_else(|| self.malformed(format!("{native} missing from exchangeInfo")))?;
        let (Some(tick), Some(step)) = (entry.tick_size(), entry.step_size()) else {
            return Err(self.malformed(format!("{native} has no price or lot filter")));
        };

        Ok(Decimals::from_steps(tick, step)?)
    }

    async fn get_order_book(&self, symbol: &Symbol) -> Result<OrderBook> {
        let native = self.native(symbol);
        let limit = depth_limit(self.depth);
        let depth: BinanceDepth = self
            .get(
                "/api/v3/depth",
                &[("symbol", native), ("limit", limit.to_string())],
            )
            .await?;

        let (asks, bids) = depth.to_levels();
        Ok(OrderBook::normalize(asks, bids, self.depth)?)
    }

    async fn get_last_price(&self, symbol: &Symbol) -> Result<f64> {
        let native = self.native(symbol);
        let ticker: BinanceTickerPrice = self
            .get("/api/v3/ticker/price", &[("symbol", native)])
            .await?;

        ticker
            .to_price()
            .ok_or_else(|| self.malformed(format!("unusable price {} for {}", ticker.price, ticker.symbol)))
    }

    async fn get_kline(&self, symbol: &Symbol, candle_period: u32) -> Result<KLine> {
        let interval = interval(candle_period)?;
        let native = self.native(symbol);
        let rows: Vec<BinanceKline> = self
            .get(
                "/api/v3/klines",
                &[
                    ("symbol", native),
                    ("interval", interval.to_string()),
                    ("limit", MAX_CANDLES.to_string()),
                ],
            )
            .await?;

        let bars = parse_klines(&rows).map_err(|message| self.malformed(message))?;
        Ok(KLine::from_bars(bars)?)
    }

    async fn get_trade_history(&self, symbol: &Symbol) -> Result<Vec<Trade>> {
        let native = self.native(symbol);
        let raw: Vec<BinanceTrade> = self
            .get(
                "/api/v3/trades",
                &[("symbol", native), ("limit", MAX_TRADES.to_string())],
            )
            .await?;

        let trades = raw.iter().filter_map(BinanceTrade::to_trade).collect();
        Ok(normalize_trades(trades))
    }
}
