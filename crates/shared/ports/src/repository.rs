//! Port for cryptocurrency record storage
//!
//! Follows Interface Segregation Principle with focused traits.

use async_trait::async_trait;
use coinvault_core::{
    CoinName, CryptocurrencyRecord, NewCryptocurrency, RecordId, RecordPatch, Symbol,
};

use crate::error::StoreResult;

/// Read operations for records
#[async_trait]
pub trait CryptocurrencyReader: Send + Sync {
    /// Get a record by ID
    async fn get(&self, id: RecordId) -> StoreResult<Option<CryptocurrencyRecord>>;

    /// Page through records in ascending id order
    async fn list(&self, offset: usize, limit: usize) -> StoreResult<Vec<CryptocurrencyRecord>>;

    /// Records whose name equals `name` or whose symbol equals `symbol`
    async fn find_by_name_or_symbol(
        &self,
        name: &CoinName,
        symbol: &Symbol,
    ) -> StoreResult<Vec<CryptocurrencyRecord>>;

    /// Records linked to the price provider, in ascending id order
    async fn list_externally_sourced(&self) -> StoreResult<Vec<CryptocurrencyRecord>>;
}

/// Write operations for records
///
/// Implementations must enforce uniqueness of name, symbol and external id,
/// reporting violations as `StoreError::UniqueViolation`.
#[async_trait]
pub trait CryptocurrencyWriter: Send + Sync {
    /// Insert a record, assigning its id
    async fn insert(&self, record: NewCryptocurrency) -> StoreResult<CryptocurrencyRecord>;

    /// Apply a partial update; `Ok(None)` if the record does not exist
    async fn update(
        &self,
        id: RecordId,
        patch: RecordPatch,
    ) -> StoreResult<Option<CryptocurrencyRecord>>;

    /// Remove a record, returning it; `Ok(None)` if it did not exist
    async fn delete(&self, id: RecordId) -> StoreResult<Option<CryptocurrencyRecord>>;
}

/// Combined repository trait
#[async_trait]
pub trait CryptocurrencyRepository: CryptocurrencyReader + CryptocurrencyWriter {}

// Blanket implementation
impl<T: CryptocurrencyReader + CryptocurrencyWriter> CryptocurrencyRepository for T {}
