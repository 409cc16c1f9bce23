//! Periodic market data reconciliation
//!
//! Refreshes price, market cap and timestamp of every externally sourced
//! record. At most one run is in flight per use case instance; a tick that
//! arrives while a run is active is skipped, never queued.

use crate::application::error::RegistryResult;
use coinvault_core::{CryptocurrencyRecord, RecordPatch, Timestamp, UsdAmount};
use coinvault_ports::{Clock, CryptocurrencyRepository, PriceSource};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Running,
}

/// Summary of one completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    /// Externally sourced records considered
    pub examined: usize,
    pub refreshed: usize,
    pub failed: usize,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Completed(ReconciliationReport),
    /// Another run held the guard
    Skipped,
}

pub struct ReconcileMarketDataUseCase<R, P, C>
where
    R: CryptocurrencyRepository + ?Sized,
    P: PriceSource + ?Sized,
    C: Clock + ?Sized,
{
    repository: Arc<R>,
    price_source: Arc<P>,
    clock: Arc<C>,
    guard: Semaphore,
}

impl<R, P, C> ReconcileMarketDataUseCase<R, P, C>
where
    R: CryptocurrencyRepository + ?Sized,
    P: PriceSource + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(repository: Arc<R>, price_source: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            price_source,
            clock,
            guard: Semaphore::new(1),
        }
    }

    pub fn state(&self) -> JobState {
        if self.guard.available_permits() == 0 {
            JobState::Running
        } else {
            JobState::Idle
        }
    }

    /// Run one reconciliation pass unless one is already running
    ///
    /// Per-record failures are counted and logged; only a failure to list
    /// the records aborts the run.
    pub async fn run_tick(&self) -> RegistryResult<TickOutcome> {
        let Ok(_permit) = self.guard.try_acquire() else {
            debug!("Reconciliation already running, skipping tick");
            return Ok(TickOutcome::Skipped);
        };

        let started_at = self.clock.now();
        let records = self.repository.list_externally_sourced().await?;
        info!(count = records.len(), "Reconciliation started");

        let mut refreshed = 0;
        let mut failed = 0;
        for record in &records {
            match self.refresh(record).await {
                Ok(()) => refreshed += 1,
                Err(reason) => {
                    warn!(
                        id = %record.id,
                        symbol = %record.symbol,
                        "Failed to refresh market data: {}",
                        reason
                    );
                    failed += 1;
                }
            }
        }

        let report = ReconciliationReport {
            examined: records.len(),
            refreshed,
            failed,
            started_at,
            finished_at: self.clock.now(),
        };
        info!(
            examined = report.examined,
            refreshed = report.refreshed,
            failed = report.failed,
            "Reconciliation finished"
        );
        Ok(TickOutcome::Completed(report))
    }

    async fn refresh(&self, record: &CryptocurrencyRecord) -> Result<(), String> {
        let Some(external_id) = record.external_id.as_deref() else {
            return Err("record has no external id".to_string());
        };

        let details = self
            .price_source
            .coin_details(external_id)
            .await
            .map_err(|e| e.to_string())?;

        let current_price = details
            .current_price_usd
            .ok_or_else(|| "provider reported no current price".to_string())
            .and_then(|v| {
                UsdAmount::for_field("current_price", v).map_err(|e| e.to_string())
            })?;
        let market_cap = details
            .market_cap_usd
            .ok_or_else(|| "provider reported no market cap".to_string())
            .and_then(|v| UsdAmount::for_field("market_cap", v).map_err(|e| e.to_string()))?;
        let last_updated = details.last_updated.unwrap_or_else(|| self.clock.now());

        let patch = RecordPatch::market_refresh(current_price, market_cap, last_updated);
        match self.repository.update(record.id, patch).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err("record deleted during reconciliation".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}
