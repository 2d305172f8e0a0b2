//! In-memory paper exchange.

pub mod exchange;
pub mod market;
pub mod settings;

pub use exchange::{PaperExchange, Withdrawal};
pub use market::MarketSeed;
pub use settings::PaperConfig;
