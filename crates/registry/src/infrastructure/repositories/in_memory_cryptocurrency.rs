//! In-memory cryptocurrency repository implementation

use async_trait::async_trait;
use coinvault_core::{
    CoinName, CryptocurrencyRecord, NewCryptocurrency, RecordId, RecordPatch, Symbol,
};
use coinvault_ports::{
    CryptocurrencyReader, CryptocurrencyWriter, StoreError, StoreResult, UniqueField,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug)]
struct StoreState {
    records: BTreeMap<RecordId, CryptocurrencyRecord>,
    next_id: i64,
}

impl StoreState {
    /// First unique field of `candidate` already held by another record
    fn conflict(
        &self,
        exclude: Option<RecordId>,
        name: &CoinName,
        symbol: &Symbol,
        external_id: Option<&str>,
    ) -> Option<UniqueField> {
        let others = self
            .records
            .values()
            .filter(|r| Some(r.id) != exclude);

        for other in others {
            if &other.symbol == symbol {
                return Some(UniqueField::Symbol);
            }
            if &other.name == name {
                return Some(UniqueField::Name);
            }
            if external_id.is_some() && other.external_id.as_deref() == external_id {
                return Some(UniqueField::ExternalId);
            }
        }
        None
    }
}

/// In-memory record store
///
/// Uniqueness checks and writes happen under one write lock, so concurrent
/// inserts of the same symbol cannot both succeed.
pub struct InMemoryCryptocurrencyRepository {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryCryptocurrencyRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                records: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCryptocurrencyRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryCryptocurrencyRepository {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[async_trait]
impl CryptocurrencyReader for InMemoryCryptocurrencyRepository {
    async fn get(&self, id: RecordId) -> StoreResult<Option<CryptocurrencyRecord>> {
        Ok(self.state.read().records.get(&id).cloned())
    }

    async fn list(&self, offset: usize, limit: usize) -> StoreResult<Vec<CryptocurrencyRecord>> {
        Ok(self
            .state
            .read()
            .records
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_name_or_symbol(
        &self,
        name: &CoinName,
        symbol: &Symbol,
    ) -> StoreResult<Vec<CryptocurrencyRecord>> {
        Ok(self
            .state
            .read()
            .records
            .values()
            .filter(|r| &r.name == name || &r.symbol == symbol)
            .cloned()
            .collect())
    }

    async fn list_externally_sourced(&self) -> StoreResult<Vec<CryptocurrencyRecord>> {
        Ok(self
            .state
            .read()
            .records
            .values()
            .filter(|r| r.is_externally_sourced())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CryptocurrencyWriter for InMemoryCryptocurrencyRepository {
    async fn insert(&self, record: NewCryptocurrency) -> StoreResult<CryptocurrencyRecord> {
        let mut state = self.state.write();

        if let Some(field) = state.conflict(
            None,
            &record.name,
            &record.symbol,
            record.external_id.as_deref(),
        ) {
            return Err(StoreError::UniqueViolation(field));
        }

        let id = RecordId::new(state.next_id);
        state.next_id += 1;

        let record = record.into_record(id);
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: RecordId,
        patch: RecordPatch,
    ) -> StoreResult<Option<CryptocurrencyRecord>> {
        let mut state = self.state.write();

        let Some(mut updated) = state.records.get(&id).cloned() else {
            return Ok(None);
        };
        updated.apply(&patch);

        if let Some(field) = state.conflict(
            Some(id),
            &updated.name,
            &updated.symbol,
            updated.external_id.as_deref(),
        ) {
            return Err(StoreError::UniqueViolation(field));
        }

        state.records.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: RecordId) -> StoreResult<Option<CryptocurrencyRecord>> {
        Ok(self.state.write().records.remove(&id))
    }
}
