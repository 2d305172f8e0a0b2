//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture. Each
//! exchange integration is an adapter implementing the outbound exchange
//! port; callers depend on the port alone.
//!
//! ```text
//!     ┌─────────────────────────┐
//!     │   Caller / strategy     │
//!     └───────────┬─────────────┘
//!                 │ Arc<dyn ExchangeApi>
//!     ┌───────────▼─────────────┐
//!     │  Domain + Exchange port │
//!     └───────────┬─────────────┘
//!        ┌────────┼──────────┐
//!        ▼        ▼          ▼
//!    ┌───────┐ ┌───────┐ ┌─────────┐
//!    │ Paper │ │Binance│ │Validated│
//!    └───────┘ └───────┘ └─────────┘
//! ```

pub mod outbound;

pub use outbound::diagnostics::{DebugRecord, Diagnostics};
pub use outbound::exchange::{
    Credentials, ExchangeAdapter, ExchangeApi, MarketData, SharedExchange, SharedMarketData,
    Trading,
};
pub use outbound::symbol::{ConcatMapper, PairCase, PairOrder, SeparatorMapper, SymbolMapper};
