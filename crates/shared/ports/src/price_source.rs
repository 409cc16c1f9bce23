use async_trait::async_trait;
use coinvault_core::{CoinDetails, CoinSummary, MarketListing};

use crate::error::ProviderResult;

/// Port for an external cryptocurrency price provider
///
/// All operations are read-only. Callers decide how to degrade when the
/// provider is unavailable.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Search coins by symbol; results are in provider relevance order
    async fn search_by_symbol(&self, symbol: &str) -> ProviderResult<Vec<CoinSummary>>;

    /// Fetch market data for a coin by provider id
    ///
    /// Returns `ProviderError::NotFound` for unknown ids.
    async fn coin_details(&self, id: &str) -> ProviderResult<CoinDetails>;

    /// Top coins ordered by market capitalization, descending
    async fn top_by_market_cap(&self, limit: usize) -> ProviderResult<Vec<MarketListing>>;

    /// Get the provider's name for logging
    fn name(&self) -> &str {
        "PriceSource"
    }
}
