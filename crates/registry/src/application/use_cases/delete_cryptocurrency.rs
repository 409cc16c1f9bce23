use crate::application::error::{RegistryError, RegistryResult};
use coinvault_core::{CryptocurrencyRecord, RecordId};
use coinvault_ports::CryptocurrencyRepository;
use std::sync::Arc;
use tracing::info;

pub struct DeleteCryptocurrencyUseCase<R>
where
    R: CryptocurrencyRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> DeleteCryptocurrencyUseCase<R>
where
    R: CryptocurrencyRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Remove the record, returning its last state
    pub async fn execute(&self, id: RecordId) -> RegistryResult<CryptocurrencyRecord> {
        let record = self
            .repository
            .delete(id)
            .await?
            .ok_or(RegistryError::NotFound(id))?;
        info!(id = %record.id, symbol = %record.symbol, "Cryptocurrency deleted");
        Ok(record)
    }
}
