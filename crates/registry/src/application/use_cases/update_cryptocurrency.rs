use crate::application::error::{RegistryError, RegistryResult};
use coinvault_core::{CoinName, CryptocurrencyRecord, RecordId, RecordPatch, Symbol, UsdAmount};
use coinvault_ports::CryptocurrencyRepository;
use std::sync::Arc;
use tracing::info;

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateCryptocurrencyCommand {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
}

impl UpdateCryptocurrencyCommand {
    fn into_patch(self) -> RegistryResult<RecordPatch> {
        Ok(RecordPatch {
            name: self.name.map(CoinName::new).transpose()?,
            symbol: self.symbol.map(Symbol::new).transpose()?,
            current_price: self
                .current_price
                .map(|v| UsdAmount::for_field("current_price", v))
                .transpose()?,
            market_cap: self
                .market_cap
                .map(|v| UsdAmount::for_field("market_cap", v))
                .transpose()?,
            last_updated: None,
        })
    }
}

pub struct UpdateCryptocurrencyUseCase<R>
where
    R: CryptocurrencyRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> UpdateCryptocurrencyUseCase<R>
where
    R: CryptocurrencyRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        id: RecordId,
        command: UpdateCryptocurrencyCommand,
    ) -> RegistryResult<CryptocurrencyRecord> {
        let patch = command.into_patch()?;

        let current = self
            .repository
            .get(id)
            .await?
            .ok_or(RegistryError::NotFound(id))?;

        if patch.is_empty() {
            return Ok(current);
        }

        // Uniqueness against every other record
        let name = patch.name.as_ref().unwrap_or(&current.name);
        let symbol = patch.symbol.as_ref().unwrap_or(&current.symbol);
        let others = self.repository.find_by_name_or_symbol(name, symbol).await?;
        for other in others.iter().filter(|r| r.id != id) {
            if patch.symbol.as_ref() == Some(&other.symbol) {
                return Err(RegistryError::Conflict(format!(
                    "Cryptocurrency with symbol {} already exists",
                    other.symbol
                )));
            }
            if patch.name.as_ref() == Some(&other.name) {
                return Err(RegistryError::Conflict(format!(
                    "Cryptocurrency with name {} already exists",
                    other.name
                )));
            }
        }

        let record = self
            .repository
            .update(id, patch)
            .await?
            .ok_or(RegistryError::NotFound(id))?;
        info!(id = %record.id, symbol = %record.symbol, "Cryptocurrency updated");
        Ok(record)
    }
}
