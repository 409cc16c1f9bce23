use crate::application::error::{RegistryError, RegistryResult};
use coinvault_core::MarketListing;
use coinvault_ports::PriceSource;
use std::sync::Arc;
use tracing::warn;

pub const DEFAULT_TOP_LIMIT: usize = 10;
pub const MAX_TOP_LIMIT: usize = 250;

/// Market-cap ranked listing straight from the price provider
pub struct TopCryptocurrenciesUseCase<P>
where
    P: PriceSource + ?Sized,
{
    price_source: Arc<P>,
}

impl<P> TopCryptocurrenciesUseCase<P>
where
    P: PriceSource + ?Sized,
{
    pub fn new(price_source: Arc<P>) -> Self {
        Self { price_source }
    }

    pub async fn execute(&self, limit: usize) -> RegistryResult<Vec<MarketListing>> {
        if limit == 0 || limit > MAX_TOP_LIMIT {
            return Err(RegistryError::Rejected(format!(
                "limit must be between 1 and {}, got {}",
                MAX_TOP_LIMIT, limit
            )));
        }

        self.price_source
            .top_by_market_cap(limit)
            .await
            .map_err(|e| {
                warn!(provider = self.price_source.name(), "Top listing failed: {}", e);
                RegistryError::ProviderUnavailable(e.to_string())
            })
    }
}
