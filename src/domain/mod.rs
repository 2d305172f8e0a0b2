//! Canonical, exchange-agnostic data model.
//!
//! Every adapter returns these types, whatever shape its exchange uses on
//! the wire. The pure normalizers living next to the types
//! ([`OrderBook::normalize`], [`KLine::from_bars`],
//! [`trade::normalize_trades`], [`symbol::prioritize`]) are what keeps that
//! promise uniform across adapters.

pub mod balance;
pub mod book;
pub mod candle;
pub mod decimals;
pub mod error;
pub mod order;
pub mod symbol;
pub mod trade;

pub use balance::Balance;
pub use book::{Order, OrderBook};
pub use candle::{Bar, Color, KLine, PriceCandle, VolumeCandle};
pub use decimals::Decimals;
pub use error::DomainError;
pub use order::{MakedOrder, Side, Status};
pub use symbol::{QuoteTier, Symbol};
pub use trade::Trade;
