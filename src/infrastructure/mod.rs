//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without
//! containing exchange logic: configuration loading, logging setup and
//! adapter construction.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`exchange`] - Exchange adapter factory

pub mod config;
pub mod exchange;
