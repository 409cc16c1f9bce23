use crate::application::error::{RegistryError, RegistryResult};
use coinvault_core::{CryptocurrencyRecord, RecordId};
use coinvault_ports::CryptocurrencyRepository;
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct ListCryptocurrenciesQuery {
    pub skip: usize,
    pub limit: usize,
}

impl Default for ListCryptocurrenciesQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Read-side use cases over stored records
pub struct QueryCryptocurrenciesUseCase<R>
where
    R: CryptocurrencyRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> QueryCryptocurrenciesUseCase<R>
where
    R: CryptocurrencyRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: RecordId) -> RegistryResult<CryptocurrencyRecord> {
        self.repository
            .get(id)
            .await?
            .ok_or(RegistryError::NotFound(id))
    }

    /// Page through records in id order; `limit` is capped at `MAX_PAGE_SIZE`
    pub async fn list(
        &self,
        query: ListCryptocurrenciesQuery,
    ) -> RegistryResult<Vec<CryptocurrencyRecord>> {
        let limit = query.limit.min(MAX_PAGE_SIZE);
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.repository.list(query.skip, limit).await?)
    }
}
