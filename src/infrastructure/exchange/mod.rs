//! Exchange adapter construction.

pub mod factory;

pub use factory::ExchangeFactory;
