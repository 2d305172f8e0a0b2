//! Account holdings.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Holding of a single asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Available for new orders.
    pub free: f64,
    /// Held by open orders or pending withdrawals.
    pub locked: f64,
}

impl Balance {
    /// Creates a balance without validation.
    #[must_use]
    pub const fn new(free: f64, locked: f64) -> Self {
        Self { free, locked }
    }

    /// Creates a balance, rejecting negative or non-finite parts.
    pub fn try_new(free: f64, locked: f64) -> Result<Self, DomainError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(free) || !valid(locked) {
            return Err(DomainError::NegativeBalance { free, locked });
        }
        Ok(Self { free, locked })
    }

    /// Free plus locked.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.free + self.locked
    }

    /// True when nothing is held.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.free == 0.0 && self.locked == 0.0
    }
}
