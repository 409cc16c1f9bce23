//! Market data as reported by an external price provider
//!
//! These are raw provider views: numbers may be missing or zero and symbols
//! arrive in whatever case the provider uses. Conversion into validated
//! record fields happens in the registry's validator.

use serde::{Deserialize, Serialize};

use crate::values::{Symbol, Timestamp};

/// Search hit for a symbol lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSummary {
    /// Provider's stable identifier (e.g. "bitcoin")
    pub id: String,
    pub name: String,
    pub symbol: String,
}

impl CoinSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    pub fn matches_symbol(&self, symbol: &Symbol) -> bool {
        symbol.matches(&self.symbol)
    }
}

/// Detailed market data for a single coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetails {
    pub id: String,
    pub name: Option<String>,
    pub current_price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub last_updated: Option<Timestamp>,
}

/// Entry of a market-cap ranked listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketListing {
    pub external_id: String,
    pub name: String,
    /// Uppercased provider symbol
    pub symbol: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_symbol_match_ignores_case() {
        let summary = CoinSummary::new("bitcoin", "Bitcoin", "btc");
        assert!(summary.matches_symbol(&Symbol::new("BTC").unwrap()));
        assert!(!summary.matches_symbol(&Symbol::new("BTCB").unwrap()));
    }
}
