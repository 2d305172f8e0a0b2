//! Outbound adapters (driven side).

pub mod binance;
pub mod paper;
pub mod validated;
