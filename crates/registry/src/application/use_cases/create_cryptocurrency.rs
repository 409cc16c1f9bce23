use crate::application::error::{RegistryError, RegistryResult};
use crate::application::validator::{Candidate, CryptocurrencyValidator, Validation};
use coinvault_core::CryptocurrencyRecord;
use coinvault_ports::{CryptocurrencyRepository, PriceSource};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct CreateCryptocurrencyCommand {
    pub name: Option<String>,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
}

pub struct CreateCryptocurrencyUseCase<R, P>
where
    R: CryptocurrencyRepository + ?Sized,
    P: PriceSource + ?Sized,
{
    repository: Arc<R>,
    validator: CryptocurrencyValidator<P>,
}

impl<R, P> CreateCryptocurrencyUseCase<R, P>
where
    R: CryptocurrencyRepository + ?Sized,
    P: PriceSource + ?Sized,
{
    pub fn new(repository: Arc<R>, price_source: Arc<P>) -> Self {
        Self {
            repository,
            validator: CryptocurrencyValidator::new(price_source),
        }
    }

    pub async fn execute(
        &self,
        command: CreateCryptocurrencyCommand,
    ) -> RegistryResult<CryptocurrencyRecord> {
        // Parse fields
        let candidate = Candidate::new(
            command.name.as_deref(),
            &command.symbol,
            command.current_price,
            command.market_cap,
        )?;

        // Validate and enrich
        let new = match self.validator.validate(&candidate).await {
            Validation::Accepted(new) => new,
            Validation::Rejected(reason) => return Err(RegistryError::Rejected(reason)),
        };

        // Uniqueness pre-check; the store enforces it again on insert
        let existing = self
            .repository
            .find_by_name_or_symbol(&new.name, &new.symbol)
            .await?;
        if let Some(hit) = existing.first() {
            let reason = if hit.symbol == new.symbol {
                format!("Cryptocurrency with symbol {} already exists", new.symbol)
            } else {
                format!("Cryptocurrency with name {} already exists", new.name)
            };
            return Err(RegistryError::Conflict(reason));
        }

        let record = self.repository.insert(new).await?;
        info!(
            id = %record.id,
            symbol = %record.symbol,
            external_id = record.external_id.as_deref().unwrap_or("-"),
            "Cryptocurrency created"
        );
        Ok(record)
    }
}
