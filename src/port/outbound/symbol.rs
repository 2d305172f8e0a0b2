//! Translation between canonical symbols and exchange-native pair notation.
//!
//! Each adapter owns one [`SymbolMapper`]; callers only ever see
//! [`Symbol`]s. A mapper must be bijective over the pairs its exchange
//! lists: `from_native(to_native(s)) == s`.

use crate::domain::error::DomainError;
use crate::domain::symbol::Symbol;

/// Converts canonical symbols to and from one exchange's notation.
pub trait SymbolMapper: Send + Sync {
    /// Exchange-native pair string for `symbol`.
    fn to_native(&self, symbol: &Symbol) -> String;

    /// Canonical symbol for an exchange-native pair string.
    fn from_native(&self, native: &str) -> Result<Symbol, DomainError>;
}

/// `BASEQUOTE` notation with no separator (e.g. `ETHBTC`).
///
/// Reverse translation matches the longest known quote currency suffix.
#[derive(Debug, Clone, Default)]
pub struct ConcatMapper {
    quotes: Vec<String>,
}

impl ConcatMapper {
    /// Create a mapper recognising the given quote currencies.
    pub fn new<I, S>(quotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut quotes: Vec<String> = quotes
            .into_iter()
            .map(|q| q.as_ref().to_ascii_uppercase())
            .filter(|q| !q.is_empty())
            .collect();
        quotes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        quotes.dedup();
        Self { quotes }
    }
}

impl SymbolMapper for ConcatMapper {
    fn to_native(&self, symbol: &Symbol) -> String {
        format!("{}{}", symbol.base(), symbol.quote())
    }

    fn from_native(&self, native: &str) -> Result<Symbol, DomainError> {
        let upper = native.trim().to_ascii_uppercase();
        self.quotes
            .iter()
            .find_map(|quote| {
                upper
                    .strip_suffix(quote.as_str())
                    .filter(|base| !base.is_empty())
                    .and_then(|base| Symbol::new(quote, base).ok())
            })
            .ok_or_else(|| DomainError::UnknownNativeSymbol {
                native: native.to_string(),
            })
    }
}

/// Which currency an exchange writes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrder {
    BaseFirst,
    QuoteFirst,
}

/// Letter case an exchange uses for pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairCase {
    Upper,
    Lower,
}

/// Notation with an explicit separator (e.g. `ETH/BTC`, `eth_btc`, `BTC-ETH`).
#[derive(Debug, Clone, Copy)]
pub struct SeparatorMapper {
    separator: char,
    order: PairOrder,
    case: PairCase,
}

impl SeparatorMapper {
    #[must_use]
    pub const fn new(separator: char, order: PairOrder, case: PairCase) -> Self {
        Self {
            separator,
            order,
            case,
        }
    }

    fn apply_case(&self, code: &str) -> String {
        match self.case {
            PairCase::Upper => code.to_ascii_uppercase(),
            PairCase::Lower => code.to_ascii_lowercase(),
        }
    }
}

impl SymbolMapper for SeparatorMapper {
    fn to_native(&self, symbol: &Symbol) -> String {
        let (first, second) = match self.order {
            PairOrder::BaseFirst => (symbol.base(), symbol.quote()),
            PairOrder::QuoteFirst => (symbol.quote(), symbol.base()),
        };
        format!(
            "{}{}{}",
            self.apply_case(first),
            self.separator,
            self.apply_case(second)
        )
    }

    fn from_native(&self, native: &str) -> Result<Symbol, DomainError> {
        let unknown = || DomainError::UnknownNativeSymbol {
            native: native.to_string(),
        };
        let (first, second) = native.split_once(self.separator).ok_or_else(unknown)?;
        if second.contains(self.separator) {
            return Err(unknown());
        }
        let symbol = match self.order {
            PairOrder::BaseFirst => Symbol::new(second, first),
            PairOrder::QuoteFirst => Symbol::new(first, second),
        };
        symbol.map_err(|_| unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    #[test]
    fn concat_round_trips() {
        let mapper = ConcatMapper::new(["BTC", "ETH", "USDT", "USD"]);
        for canonical in ["USDT_BTC", "BTC_ETH", "ETH_LINK", "USD_BTC"] {
            let native = mapper.to_native(&sym(canonical));
            assert_eq!(mapper.from_native(&native).unwrap(), sym(canonical));
        }
        assert_eq!(mapper.to_native(&sym("BTC_ETH")), "ETHBTC");
    }

    #[test]
    fn concat_prefers_longest_quote() {
        let mapper = ConcatMapper::new(["USD", "USDT"]);
        assert_eq!(mapper.from_native("BTCUSDT").unwrap(), sym("USDT_BTC"));
    }

    #[test]
    fn concat_rejects_unknown_quote() {
        let mapper = ConcatMapper::new(["BTC"]);
        assert!(matches!(
            mapper.from_native("ETHEUR"),
            Err(DomainError::UnknownNativeSymbol { .. })
        ));
        assert!(mapper.from_native("BTC").is_err());
    }

    #[test]
    fn concat_without_quotes_still_renders_native() {
        let mapper = ConcatMapper::default();
        assert_eq!(mapper.to_native(&sym("FDUSD_ADA")), "ADAFDUSD");
        assert!(mapper.from_native("ADAFDUSD").is_err());
    }

    #[test]
    fn separator_round_trips() {
        let slash = SeparatorMapper::new('/', PairOrder::BaseFirst, PairCase::Upper);
        assert_eq!(slash.to_native(&sym("BTC_ETH")), "ETH/BTC");
        assert_eq!(slash.from_native("ETH/BTC").unwrap(), sym("BTC_ETH"));

        let lower = SeparatorMapper::new('_', PairOrder::QuoteFirst, PairCase::Lower);
        assert_eq!(lower.to_native(&sym("USDT_BTC")), "usdt_btc");
        assert_eq!(lower.from_native("usdt_btc").unwrap(), sym("USDT_BTC"));
    }

    #[test]
    fn separator_rejects_malformed() {
        let mapper = SeparatorMapper::new('-', PairOrder::BaseFirst, PairCase::Upper);
        assert!(mapper.from_native("ETHBTC").is_err());
        assert!(mapper.from_native("A-B-C").is_err());
        assert!(mapper.from_native("-BTC").is_err());
    }
}
