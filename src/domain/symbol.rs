//! Canonical trading-pair identifiers.
//!
//! A [`Symbol`] is written `QUOTE_BASE`: the currency prices are quoted in
//! comes first, the currency amounts are measured in comes second. So
//! `BTC_ETH` is ETH priced in BTC. Exchange-native notations are handled by
//! [`SymbolMapper`](crate::port::outbound::symbol::SymbolMapper)
//! implementations and never leak to callers.
//!
//! ```
//! use tradeport::domain::symbol::Symbol;
//!
//! let symbol: Symbol = "USDT_BTC".parse().unwrap();
//! assert_eq!(symbol.quote(), "USDT");
//! assert_eq!(symbol.base(), "BTC");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::DomainError;

const SEPARATOR: char = '_';

/// Canonical `QUOTE_BASE` pair identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    quote: String,
    base: String,
}

impl Symbol {
    /// Build a symbol from its two currencies. Both are upper-cased.
    ///
    /// # Errors
    ///
    /// Fails when either currency is empty or contains the separator.
    pub fn new(quote: impl AsRef<str>, base: impl AsRef<str>) -> Result<Self, DomainError> {
        let quote = quote.as_ref().trim().to_ascii_uppercase();
        let base = base.as_ref().trim().to_ascii_uppercase();
        let display = format!("{quote}{SEPARATOR}{base}");

        if quote.is_empty() || base.is_empty() {
            return Err(DomainError::InvalidSymbol {
                symbol: display,
                reason: "currency codes must be non-empty",
            });
        }
        if quote.contains(SEPARATOR) || base.contains(SEPARATOR) {
            return Err(DomainError::InvalidSymbol {
                symbol: display,
                reason: "currency codes must not contain '_'",
            });
        }
        if quote == base {
            return Err(DomainError::InvalidSymbol {
                symbol: display,
                reason: "quote and base must differ",
            });
        }

        Ok(Self { quote, base })
    }

    /// Currency prices are denominated in.
    #[must_use]
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Currency amounts are denominated in.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Priority tier used by [`prioritize`].
    #[must_use]
    pub fn tier(&self) -> QuoteTier {
        QuoteTier::of(&self.quote)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.quote, self.base)
    }
}

impl FromStr for Symbol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(quote), Some(base), None) => Self::new(quote, base),
            _ => Err(DomainError::InvalidSymbol {
                symbol: s.to_string(),
                reason: "expected QUOTE_BASE",
            }),
        }
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Listing priority of a symbol, decided by its quote currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QuoteTier {
    Usdt,
    Btc,
    Eth,
    Other,
}

impl QuoteTier {
    /// Tier for a quote currency code.
    #[must_use]
    pub fn of(quote: &str) -> Self {
        match quote {
            "USDT" => Self::Usdt,
            "BTC" => Self::Btc,
            "ETH" => Self::Eth,
            _ => Self::Other,
        }
    }
}

/// Order symbols USDT-quoted first, then BTC, then ETH, then the rest.
///
/// The sort is stable, so the exchange's own order survives within a tier.
#[must_use]
pub fn prioritize(mut symbols: Vec<Symbol>) -> Vec<Symbol> {
    symbols.sort_by_key(Symbol::tier);
    symbols
}
