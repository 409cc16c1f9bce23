//! Fixed-interval driver for market data reconciliation
//!
//! Each tick is spawned rather than awaited, so a slow run does not delay
//! the timer; overlapping ticks are turned away by the reconciler's own
//! guard.

use crate::application::{ReconcileMarketDataUseCase, TickOutcome};
use crate::infrastructure::config::MAX_RECONCILIATION_INTERVAL_SECS;
use coinvault_ports::{Clock, CryptocurrencyRepository, PriceSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Periods outside one second to this bound are clamped
const MAX_PERIOD: Duration = Duration::from_secs(MAX_RECONCILIATION_INTERVAL_SECS);

pub struct ReconciliationScheduler {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ReconciliationScheduler {
    /// Start ticking every `period`; the first tick fires immediately only
    /// when `run_on_startup` is set
    pub fn start<R, P, C>(
        job: Arc<ReconcileMarketDataUseCase<R, P, C>>,
        period: Duration,
        run_on_startup: bool,
        cancel: CancellationToken,
    ) -> Self
    where
        R: CryptocurrencyRepository + ?Sized + 'static,
        P: PriceSource + ?Sized + 'static,
        C: Clock + ?Sized + 'static,
    {
        let period = period.clamp(Duration::from_secs(1), MAX_PERIOD);
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let now = Instant::now();
            let start = if run_on_startup {
                now
            } else {
                match now.checked_add(period) {
                    Some(start) => start,
                    None => {
                        error!(
                            period_secs = period.as_secs(),
                            "Reconciliation period out of range"
                        );
                        return;
                    }
                }
            };
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut in_flight = JoinSet::new();

            info!(period_secs = period.as_secs(), "Reconciliation scheduler started");
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        while in_flight.try_join_next().is_some() {}
                        let job = Arc::clone(&job);
                        in_flight.spawn(async move { log_outcome(job.run_tick().await) });
                    }
                }
            }

            // Let a run already in progress finish its records
            while in_flight.join_next().await.is_some() {}
            info!("Reconciliation scheduler stopped");
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop ticking and wait for the loop to exit
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Reconciliation scheduler task failed: {}", e);
            }
        }
    }
}

fn log_outcome(outcome: crate::application::RegistryResult<TickOutcome>) {
    match outcome {
        Ok(TickOutcome::Completed(report)) => info!(
            examined = report.examined,
            refreshed = report.refreshed,
            failed = report.failed,
            "Scheduled reconciliation completed"
        ),
        Ok(TickOutcome::Skipped) => {
            info!("Scheduled reconciliation skipped, previous run still in progress")
        }
        Err(e) => error!("Scheduled reconciliation failed: {}", e),
    }
}
