//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for symbols, levels, bars and trades.
//! - [`exchange`] - A seeded [`PaperExchange`](crate::adapter::outbound::paper::PaperExchange)
//!   and a scripted [`MarketData`](crate::port::MarketData) returning raw values.
//! - [`config`] - Canonical TOML configurations.

pub mod config;
pub mod domain;
pub mod exchange;
