use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Symbol, ValueError};

/// Maximum length of a cryptocurrency display name, in characters
pub const MAX_NAME_LEN: usize = 100;

/// Display name of a cryptocurrency (e.g. "Bitcoin")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoinName(String);

impl CoinName {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValueError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty { field: "name" });
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ValueError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
                actual: len,
            });
        }
        Ok(CoinName(trimmed.to_string()))
    }

    /// Fallback name for assets submitted without one
    pub fn from_symbol(symbol: &Symbol) -> Self {
        CoinName(symbol.as_str().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoinName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CoinName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CoinName {
    type Error = ValueError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        CoinName::new(value)
    }
}

impl From<CoinName> for String {
    fn from(name: CoinName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_keeps_case() {
        let name = CoinName::new("Bitcoin").unwrap();
        assert_eq!(name.as_str(), "Bitcoin");
        assert_ne!(name, CoinName::new("bitcoin").unwrap());
    }

    #[test]
    fn test_name_bounds() {
        assert!(CoinName::new("").is_err());
        assert!(CoinName::new("x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(matches!(
            CoinName::new("x".repeat(MAX_NAME_LEN + 1)),
            Err(ValueError::TooLong { field: "name", .. })
        ));
    }

    #[test]
    fn test_name_from_symbol() {
        let symbol = Symbol::new("acme").unwrap();
        assert_eq!(CoinName::from_symbol(&symbol).as_str(), "ACME");
    }
}
