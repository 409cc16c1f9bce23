//! Market data reconciliation tests
//!
//! Covers the single-flight guard, per-record failure isolation and the
//! guarantee that custom records are never touched.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use coinvault_clock::ManualClock;
use coinvault_core::{
    CoinDetails, CoinName, CoinSummary, CryptocurrencyRecord, MarketListing, NewCryptocurrency,
    Symbol, UsdAmount,
};
use coinvault_ports::{
    Clock, CryptocurrencyReader, CryptocurrencyWriter, PriceSource, ProviderResult, StoreError,
    StoreResult,
};
use coinvault_registry::{
    InMemoryCryptocurrencyRepository, InMemoryPriceSource, JobState, RegistryError, TickOutcome,
    application::ReconcileMarketDataUseCase,
};
use std::sync::Arc;
use tokio::sync::Notify;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Price source whose detail requests block until released
struct GatedPriceSource {
    inner: InMemoryPriceSource,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl PriceSource for GatedPriceSource {
    async fn search_by_symbol(&self, symbol: &str) -> ProviderResult<Vec<CoinSummary>> {
        self.inner.search_by_symbol(symbol).await
    }

    async fn coin_details(&self, id: &str) -> ProviderResult<CoinDetails> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.coin_details(id).await
    }

    async fn top_by_market_cap(&self, limit: usize) -> ProviderResult<Vec<MarketListing>> {
        self.inner.top_by_market_cap(limit).await
    }
}

/// Store whose listing always fails
struct BrokenStore;

#[async_trait]
impl CryptocurrencyReader for BrokenStore {
    async fn get(
        &self,
        _id: coinvault_core::RecordId,
    ) -> StoreResult<Option<CryptocurrencyRecord>> {
        Err(StoreError::Backend("connection lost".into()))
    }

    async fn list(&self, _offset: usize, _limit: usize) -> StoreResult<Vec<CryptocurrencyRecord>> {
        Err(StoreError::Backend("connection lost".into()))
    }

    async fn find_by_name_or_symbol(
        &self,
        _name: &CoinName,
        _symbol: &Symbol,
    ) -> StoreResult<Vec<CryptocurrencyRecord>> {
        Err(StoreError::Backend("connection lost".into()))
    }

    async fn list_externally_sourced(&self) -> StoreResult<Vec<CryptocurrencyRecord>> {
        Err(StoreError::Backend("connection lost".into()))
    }
}

#[async_trait]
impl CryptocurrencyWriter for BrokenStore {
    async fn insert(&self, _record: NewCryptocurrency) -> StoreResult<CryptocurrencyRecord> {
        Err(StoreError::Backend("connection lost".into()))
    }

    async fn update(
        &self,
        _id: coinvault_core::RecordId,
        _patch: coinvault_core::RecordPatch,
    ) -> StoreResult<Option<CryptocurrencyRecord>> {
        Err(StoreError::Backend("connection lost".into()))
    }

    async fn delete(
        &self,
        _id: coinvault_core::RecordId,
    ) -> StoreResult<Option<CryptocurrencyRecord>> {
        Err(StoreError::Backend("connection lost".into()))
    }
}

fn listed_prices() -> InMemoryPriceSource {
    let prices = InMemoryPriceSource::new();
    prices.add_coin("bitcoin", "Bitcoin", "BTC", Some(64_000.0), Some(1.26e12));
    prices.add_coin("ethereum", "Ethereum", "ETH", Some(3_100.0), Some(3.7e11));
    prices.add_coin("solana", "Solana", "SOL", Some(150.0), Some(7e10));
    prices
}

fn coin(name: &str, symbol: &str, external_id: Option<&str>, price: f64) -> NewCryptocurrency {
    NewCryptocurrency {
        name: CoinName::new(name).unwrap(),
        symbol: Symbol::new(symbol).unwrap(),
        external_id: external_id.map(String::from),
        current_price: UsdAmount::new(price).unwrap(),
        market_cap: UsdAmount::new(price * 1_000.0).unwrap(),
    }
}

fn clock() -> ManualClock {
    ManualClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
}

fn completed(outcome: TickOutcome) -> coinvault_registry::ReconciliationReport {
    match outcome {
        TickOutcome::Completed(report) => report,
        TickOutcome::Skipped => panic!("expected a completed run"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_overlapping_tick_is_skipped() {
    let repository = Arc::new(InMemoryCryptocurrencyRepository::new());
    repository
        .insert(coin("Bitcoin", "BTC", Some("bitcoin"), 50_000.0))
        .await
        .unwrap();

    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let source = Arc::new(GatedPriceSource {
        inner: listed_prices(),
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    });
    let job = Arc::new(ReconcileMarketDataUseCase::new(
        Arc::clone(&repository),
        source,
        Arc::new(clock()),
    ));
    assert_eq!(job.state(), JobState::Idle);

    let first = tokio::spawn({
        let job = Arc::clone(&job);
        async move { job.run_tick().await }
    });

    // First run is now parked inside the provider call
    entered.notified().await;
    assert_eq!(job.state(), JobState::Running);

    let second = job.run_tick().await.unwrap();
    assert_eq!(second, TickOutcome::Skipped);

    release.notify_one();
    let report = completed(first.await.unwrap().unwrap());
    assert_eq!(report.examined, 1);
    assert_eq!(report.refreshed, 1);
    assert_eq!(job.state(), JobState::Idle);

    // Guard released: the next tick runs again
    let job_again = Arc::clone(&job);
    let third = tokio::spawn(async move { job_again.run_tick().await });
    entered.notified().await;
    release.notify_one();
    assert!(matches!(
        third.await.unwrap().unwrap(),
        TickOutcome::Completed(_)
    ));
}

#[tokio::test]
async fn test_custom_records_are_never_touched() {
    let repository = Arc::new(InMemoryCryptocurrencyRepository::new());
    let custom = repository
        .insert(coin("Acme", "ACME", None, 2.0))
        .await
        .unwrap();
    repository
        .insert(coin("Bitcoin", "BTC", Some("bitcoin"), 50_000.0))
        .await
        .unwrap();

    let prices = listed_prices();
    let job = ReconcileMarketDataUseCase::new(
        Arc::clone(&repository),
        Arc::new(prices.clone()),
        Arc::new(clock()),
    );

    let report = completed(job.run_tick().await.unwrap());

    assert_eq!(report.examined, 1);
    assert_eq!(prices.details_calls(), 1);
    assert_eq!(repository.get(custom.id).await.unwrap(), Some(custom));
}

#[tokio::test]
async fn test_one_failure_does_not_abort_the_run() {
    let repository = Arc::new(InMemoryCryptocurrencyRepository::new());
    let btc = repository
        .insert(coin("Bitcoin", "BTC", Some("bitcoin"), 50_000.0))
        .await
        .unwrap();
    let eth = repository
        .insert(coin("Ethereum", "ETH", Some("ethereum"), 2_000.0))
        .await
        .unwrap();
    let sol = repository
        .insert(coin("Solana", "SOL", Some("solana"), 100.0))
        .await
        .unwrap();

    let prices = listed_prices();
    prices.fail_coin("ethereum");
    let job = ReconcileMarketDataUseCase::new(
        Arc::clone(&repository),
        Arc::new(prices.clone()),
        Arc::new(clock()),
    );

    let report = completed(job.run_tick().await.unwrap());

    assert_eq!(report.examined, 3);
    assert_eq!(report.refreshed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(prices.details_calls(), 3);

    let btc = repository.get(btc.id).await.unwrap().unwrap();
    assert_eq!(btc.current_price.value(), 64_000.0);
    assert_eq!(btc.last_updated, Some(clock().now()));

    let eth_after = repository.get(eth.id).await.unwrap().unwrap();
    assert_eq!(eth_after, eth);

    let sol = repository.get(sol.id).await.unwrap().unwrap();
    assert_eq!(sol.current_price.value(), 150.0);
}

#[tokio::test]
async fn test_non_positive_provider_values_count_as_failures() {
    let repository = Arc::new(InMemoryCryptocurrencyRepository::new());
    let btc = repository
        .insert(coin("Bitcoin", "BTC", Some("bitcoin"), 50_000.0))
        .await
        .unwrap();

    let prices = listed_prices();
    prices.set_market_data("bitcoin", Some(0.0), Some(1e12), None);
    let job = ReconcileMarketDataUseCase::new(
        Arc::clone(&repository),
        Arc::new(prices),
        Arc::new(clock()),
    );

    let report = completed(job.run_tick().await.unwrap());

    assert_eq!(report.failed, 1);
    assert_eq!(repository.get(btc.id).await.unwrap(), Some(btc));
}

#[tokio::test]
async fn test_delisted_coin_counts_as_failure() {
    let repository = Arc::new(InMemoryCryptocurrencyRepository::new());
    repository
        .insert(coin("Old Coin", "OLD", Some("old-coin"), 1.0))
        .await
        .unwrap();

    let job = ReconcileMarketDataUseCase::new(
        Arc::clone(&repository),
        Arc::new(listed_prices()),
        Arc::new(clock()),
    );

    let report = completed(job.run_tick().await.unwrap());

    assert_eq!(report.examined, 1);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn test_store_failure_aborts_run_and_releases_guard() {
    let job = ReconcileMarketDataUseCase::new(
        Arc::new(BrokenStore),
        Arc::new(listed_prices()),
        Arc::new(clock()),
    );

    let result = job.run_tick().await;

    assert!(matches!(result, Err(RegistryError::Store(_))));
    assert_eq!(job.state(), JobState::Idle);
}

#[tokio::test]
async fn test_report_timestamps_come_from_clock() {
    let repository = Arc::new(InMemoryCryptocurrencyRepository::new());
    let job = ReconcileMarketDataUseCase::new(
        repository,
        Arc::new(listed_prices()),
        Arc::new(clock()),
    );

    let report = completed(job.run_tick().await.unwrap());

    assert_eq!(report.examined, 0);
    assert_eq!(report.started_at, report.finished_at);
    assert_eq!(
        report.started_at,
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    );
}
