//! Tradeport - a uniform capability contract over cryptocurrency exchanges.
//!
//! Every exchange integration exposes the same operations with the same
//! canonical types, so trading logic written against the contract runs
//! unchanged on any venue.
//!
//! # Architecture
//!
//! - **`domain`** - Canonical value types: symbols, balances, order books,
//!   orders, candles, trades and precision. Normalizers that turn raw
//!   exchange data into contract-conforming values live next to the types.
//! - **`port`** - The capability traits ([`port::MarketData`],
//!   [`port::Trading`], [`port::ExchangeApi`]), per-adapter diagnostics and
//!   symbol mapping.
//! - **`adapter`** - Implementations: an in-memory paper exchange, a Binance
//!   public-data client, a contract-checking decorator and the CLI.
//! - **`infrastructure`** - Configuration, logging and the adapter factory.
//!
//! # Example
//!
//! ```
//! use tradeport::adapter::outbound::paper::{MarketSeed, PaperConfig, PaperExchange};
//! use tradeport::domain::Order;
//! use tradeport::port::{Credentials, ExchangeAdapter, MarketData};
//!
//! # tokio_test::block_on(async {
//! let mut exchange = PaperExchange::new(PaperConfig::default()).with_market(
//!     "ETH/BTC",
//!     MarketSeed::new("0.01", "0.001")
//!         .with_asks(vec![Order::new(25.5, 1.0)])
//!         .with_bids(vec![Order::new(24.5, 2.0)]),
//! );
//! exchange.init(Credentials::default(), 10).await.unwrap();
//!
//! let book = exchange.get_order_book(&"BTC_ETH".parse().unwrap()).await.unwrap();
//! assert_eq!(book.best_ask().unwrap().price, 25.5);
//! # });
//! ```

pub mod adapter;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
