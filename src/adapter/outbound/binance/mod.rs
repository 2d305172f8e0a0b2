//! Binance exchange integration (public market data).

pub mod client;
pub mod dto;
pub mod settings;

pub use client::BinanceExchange;
pub use settings::BinanceConfig;
