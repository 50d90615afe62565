use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest ticker accepted, with room for exchange suffixes such as `.NS`.
const MAX_SYMBOL_LEN: usize = 20;

/// Yahoo ticker such as `RELIANCE.NS`, `^NSEI` or `EURUSD=X`.
///
/// Upstream calls use the upper-cased ticker; responses echo the caller's
/// trimmed spelling. Equality and hashing look at the ticker only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    ticker: String,
    requested: String,
}

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let requested = input.trim();
        let normalized = requested.to_ascii_uppercase();

        let len = normalized.chars().count();
        if len == 0 {
            return Err(ValidationError::EmptySymbol);
        }
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some((index, ch)) = normalized
            .chars()
            .enumerate()
            .find(|&(index, ch)| !admits(index, ch))
        {
            return Err(if index == 0 {
                ValidationError::SymbolInvalidStart { ch }
            } else {
                ValidationError::SymbolInvalidChar { ch, index }
            });
        }

        Ok(Self {
            ticker: normalized,
            requested: requested.to_owned(),
        })
    }

    /// Upper-cased ticker sent to the provider.
    pub fn as_str(&self) -> &str {
        &self.ticker
    }

    /// The symbol as the caller spelled it, minus surrounding whitespace.
    pub fn requested(&self) -> &str {
        &self.requested
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.ticker == other.ticker
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ticker.hash(state);
    }
}

/// `^` only opens index tickers; `.`, `-`, `=` and `&` only follow the root.
fn admits(index: usize, ch: char) -> bool {
    match ch {
        'A'..='Z' | '0'..='9' => true,
        '^' => index == 0,
        '.' | '-' | '=' | '&' => index > 0,
        _ => false,
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.ticker)
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.ticker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_upper_cases() {
        let parsed: Symbol = " reliance.ns ".parse().expect("symbol should parse");
        assert_eq!(parsed.as_str(), "RELIANCE.NS");
        assert_eq!(parsed.requested(), "reliance.ns");
    }

    #[test]
    fn spelling_does_not_affect_equality() {
        let lower = Symbol::parse("aapl").expect("valid");
        let upper = Symbol::parse("AAPL").expect("valid");
        assert_eq!(lower, upper);
        assert_ne!(lower.requested(), upper.requested());
    }

    #[test]
    fn accepts_index_currency_and_numeric_tickers() {
        let cases = [
            ("^nsei", "^NSEI"),
            ("EURUSD=X", "EURUSD=X"),
            ("0700.HK", "0700.HK"),
            ("M&M.NS", "M&M.NS"),
        ];
        for (input, expected) in cases {
            assert_eq!(Symbol::parse(input).expect(input).as_str(), expected);
        }
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(Symbol::parse("   "), Err(ValidationError::EmptySymbol));
    }

    #[test]
    fn suffix_characters_cannot_lead() {
        let err = Symbol::parse(".NS").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolInvalidStart { ch: '.' });
    }

    #[test]
    fn caret_only_leads() {
        let err = Symbol::parse("NSE^I").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolInvalidChar { ch: '^', index: 3 });
    }

    #[test]
    fn path_characters_are_rejected() {
        let err = Symbol::parse("AA/PL").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolInvalidChar { ch: '/', index: 2 });
    }

    #[test]
    fn rejects_overlong_symbol() {
        let err = Symbol::parse(&"A".repeat(21)).expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolTooLong { len: 21, max: 20 });
    }

    #[test]
    fn deserializes_through_validation() {
        let symbol: Symbol = serde_json::from_str("\"aapl\"").expect("valid");
        assert_eq!(symbol.as_str(), "AAPL");
        assert!(serde_json::from_str::<Symbol>("\"$$\"").is_err());
    }
}
