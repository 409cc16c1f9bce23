use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::{CoinName, Symbol, Timestamp, UsdAmount};

/// Store-assigned identifier of a cryptocurrency record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A persisted cryptocurrency reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptocurrencyRecord {
    pub id: RecordId,
    pub name: CoinName,
    pub symbol: Symbol,
    /// Price provider identifier; `None` for custom assets
    pub external_id: Option<String>,
    pub current_price: UsdAmount,
    pub market_cap: UsdAmount,
    /// Set by market data reconciliation only
    pub last_updated: Option<Timestamp>,
}

impl CryptocurrencyRecord {
    /// Whether the record is kept in sync with the price provider
    pub fn is_externally_sourced(&self) -> bool {
        self.external_id.is_some()
    }

    /// Apply the fields present in `patch`, leaving the others untouched
    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(symbol) = &patch.symbol {
            self.symbol = symbol.clone();
        }
        if let Some(price) = patch.current_price {
            self.current_price = price;
        }
        if let Some(market_cap) = patch.market_cap {
            self.market_cap = market_cap;
        }
        if let Some(ts) = patch.last_updated {
            self.last_updated = Some(ts);
        }
    }
}

/// A validated record awaiting its store-assigned id
#[derive(Debug, Clone, PartialEq)]
pub struct NewCryptocurrency {
    pub name: CoinName,
    pub symbol: Symbol,
    pub external_id: Option<String>,
    pub current_price: UsdAmount,
    pub market_cap: UsdAmount,
}

impl NewCryptocurrency {
    /// A custom asset: caller-asserted market data, no provider link
    pub fn custom(
        name: CoinName,
        symbol: Symbol,
        current_price: UsdAmount,
        market_cap: UsdAmount,
    ) -> Self {
        Self {
            name,
            symbol,
            external_id: None,
            current_price,
            market_cap,
        }
    }

    pub fn into_record(self, id: RecordId) -> CryptocurrencyRecord {
        CryptocurrencyRecord {
            id,
            name: self.name,
            symbol: self.symbol,
            external_id: self.external_id,
            current_price: self.current_price,
            market_cap: self.market_cap,
            last_updated: None,
        }
    }
}

/// Partial update of a record; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<CoinName>,
    pub symbol: Option<Symbol>,
    pub current_price: Option<UsdAmount>,
    pub market_cap: Option<UsdAmount>,
    pub last_updated: Option<Timestamp>,
}

impl RecordPatch {
    /// Patch produced by a market data refresh
    pub fn market_refresh(
        current_price: UsdAmount,
        market_cap: UsdAmount,
        last_updated: Timestamp,
    ) -> Self {
        Self {
            current_price: Some(current_price),
            market_cap: Some(market_cap),
            last_updated: Some(last_updated),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.symbol.is_none()
            && self.current_price.is_none()
            && self.market_cap.is_none()
            && self.last_updated.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bitcoin() -> CryptocurrencyRecord {
        NewCryptocurrency::custom(
            CoinName::new("Bitcoin").unwrap(),
            Symbol::new("btc").unwrap(),
            UsdAmount::new(50_000.0).unwrap(),
            UsdAmount::new(1e9).unwrap(),
        )
        .into_record(RecordId::new(1))
    }

    #[test]
    fn test_new_record_has_no_last_updated() {
        let record = bitcoin();
        assert_eq!(record.symbol.as_str(), "BTC");
        assert!(record.last_updated.is_none());
        assert!(!record.is_externally_sourced());
    }

    #[test]
    fn test_apply_partial_patch() {
        let mut record = bitcoin();
        let patch = RecordPatch {
            current_price: Some(UsdAmount::new(60_000.0).unwrap()),
            ..Default::default()
        };

        record.apply(&patch);

        assert_eq!(record.current_price.value(), 60_000.0);
        assert_eq!(record.market_cap.value(), 1e9);
        assert_eq!(record.name.as_str(), "Bitcoin");
    }

    #[test]
    fn test_market_refresh_patch() {
        let mut record = bitcoin();
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let patch = RecordPatch::market_refresh(
            UsdAmount::new(42_000.0).unwrap(),
            UsdAmount::new(8e11).unwrap(),
            ts,
        );

        assert!(!patch.is_empty());
        assert!(patch.name.is_none() && patch.symbol.is_none());

        record.apply(&patch);
        assert_eq!(record.last_updated, Some(ts));
        assert_eq!(record.market_cap.value(), 8e11);
    }

    #[test]
    fn test_default_patch_is_empty() {
        assert!(RecordPatch::default().is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(bitcoin()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["symbol"], "BTC");
        assert_eq!(json["current_price"], 50_000.0);
        assert!(json["external_id"].is_null());
    }
}
