//! Outbound ports (driven side): interfaces implemented by exchange adapters.

pub mod diagnostics;
pub mod exchange;
pub mod symbol;
