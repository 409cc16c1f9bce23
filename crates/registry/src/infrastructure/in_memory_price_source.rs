//! In-memory price source
//!
//! Stands in for CoinGecko in tests. Coins can be added,
//! repriced or made to fail individually, and the whole source can be
//! switched off to simulate an outage.

use async_trait::async_trait;
use coinvault_core::{CoinDetails, CoinSummary, MarketListing, Timestamp};
use coinvault_ports::{PriceSource, ProviderError, ProviderResult};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct ListedCoin {
    id: String,
    name: String,
    symbol: String,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    last_updated: Option<Timestamp>,
}

#[derive(Clone, Default)]
pub struct InMemoryPriceSource {
    coins: Arc<RwLock<Vec<ListedCoin>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    unavailable: Arc<AtomicBool>,
    details_calls: Arc<AtomicUsize>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// List a coin; search results follow listing order
    pub fn add_coin(
        &self,
        id: &str,
        name: &str,
        symbol: &str,
        current_price: Option<f64>,
        market_cap: Option<f64>,
    ) {
        self.coins.write().push(ListedCoin {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_lowercase(),
            current_price,
            market_cap,
            last_updated: None,
        });
    }

    /// Reprice a listed coin
    pub fn set_market_data(
        &self,
        id: &str,
        current_price: Option<f64>,
        market_cap: Option<f64>,
        last_updated: Option<Timestamp>,
    ) {
        if let Some(coin) = self.coins.write().iter_mut().find(|c| c.id == id) {
            coin.current_price = current_price;
            coin.market_cap = market_cap;
            coin.last_updated = last_updated;
        }
    }

    /// Make detail requests for `id` fail with a network error
    pub fn fail_coin(&self, id: &str) {
        self.failing.write().insert(id.to_string());
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of `coin_details` calls served so far
    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> ProviderResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(ProviderError::Network("price source unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PriceSource for InMemoryPriceSource {
    async fn search_by_symbol(&self, symbol: &str) -> ProviderResult<Vec<CoinSummary>> {
        self.check_available()?;
        let query = symbol.to_lowercase();

        // Fuzzy like the real search: partial symbol and name hits included
        Ok(self
            .coins
            .read()
            .iter()
            .filter(|c| c.symbol.contains(&query) || c.name.to_lowercase().contains(&query))
            .map(|c| CoinSummary::new(c.id.clone(), c.name.clone(), c.symbol.clone()))
            .collect())
    }

    async fn coin_details(&self, id: &str) -> ProviderResult<CoinDetails> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        if self.failing.read().contains(id) {
            return Err(ProviderError::Network(format!("request for {} timed out", id)));
        }

        self.coins
            .read()
            .iter()
            .find(|c| c.id == id)
            .map(|c| CoinDetails {
                id: c.id.clone(),
                name: Some(c.name.clone()),
                current_price_usd: c.current_price,
                market_cap_usd: c.market_cap,
                last_updated: c.last_updated,
            })
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    async fn top_by_market_cap(&self, limit: usize) -> ProviderResult<Vec<MarketListing>> {
        self.check_available()?;

        let mut coins = self.coins.read().clone();
        coins.sort_by(|a, b| {
            b.market_cap
                .unwrap_or(0.0)
                .total_cmp(&a.market_cap.unwrap_or(0.0))
        });

        Ok(coins
            .into_iter()
            .take(limit)
            .map(|c| MarketListing {
                external_id: c.id,
                name: c.name,
                symbol: c.symbol.to_uppercase(),
                current_price: c.current_price,
                market_cap: c.market_cap,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "InMemoryPriceSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> InMemoryPriceSource {
        let source = InMemoryPriceSource::new();
        source.add_coin("bitcoin", "Bitcoin", "BTC", Some(64_000.0), Some(1.2e12));
        source.add_coin("wrapped-bitcoin", "Wrapped Bitcoin", "WBTC", Some(63_900.0), Some(9e9));
        source.add_coin("ethereum", "Ethereum", "ETH", Some(3_000.0), Some(3.6e11));
        source
    }

    #[tokio::test]
    async fn test_search_is_fuzzy() {
        let hits = source().search_by_symbol("BTC").await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "wrapped-bitcoin"]);
    }

    #[tokio::test]
    async fn test_unknown_coin_is_not_found() {
        let result = source().coin_details("dogecoin").await;
        assert_eq!(result, Err(ProviderError::NotFound("dogecoin".into())));
    }

    #[tokio::test]
    async fn test_top_by_market_cap_orders_descending() {
        let top = source().top_by_market_cap(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].symbol, "BTC");
        assert_eq!(top[1].symbol, "ETH");
    }

    #[tokio::test]
    async fn test_outage_and_failing_coin() {
        let source = source();
        source.fail_coin("ethereum");
        assert!(matches!(
            source.coin_details("ethereum").await,
            Err(ProviderError::Network(_))
        ));
        assert!(source.coin_details("bitcoin").await.is_ok());

        source.set_available(false);
        assert!(source.search_by_symbol("ETH").await.is_err());
        assert_eq!(source.details_calls(), 2);
    }
}
