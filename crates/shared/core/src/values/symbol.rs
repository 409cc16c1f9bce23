use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValueError;

/// Maximum length of a ticker symbol, in characters
pub const MAX_SYMBOL_LEN: usize = 10;

/// Ticker symbol of a cryptocurrency (e.g. "BTC")
///
/// Always held in its canonical uppercase form, so two symbols compare equal
/// exactly when they differ only by case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValueError> {
        let canonical = value.as_ref().trim().to_uppercase();
        if canonical.is_empty() {
            return Err(ValueError::Empty { field: "symbol" });
        }
        let len = canonical.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValueError::TooLong {
                field: "symbol",
                max: MAX_SYMBOL_LEN,
                actual: len,
            });
        }
        Ok(Symbol(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw provider symbol
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().to_uppercase() == self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValueError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Symbol::new(value)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValueError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}
