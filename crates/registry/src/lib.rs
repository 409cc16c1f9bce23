//! Coinvault Registry
//!
//! A CRUD registry of cryptocurrency reference records, validated and
//! enriched against CoinGecko and kept fresh by a background job.
//!
//! # Architecture
//!
//! - **Application**: Validator and use cases (create, update, delete, query,
//!   top listings, market data reconciliation)
//! - **Infrastructure**: CoinGecko client, in-memory and PostgreSQL stores,
//!   configuration, reconciliation scheduler
//! - **Presentation**: REST API
//!
//! Domain types live in `coinvault-core`, ports in `coinvault-ports`.
//!
//! # Example
//!
//! ```ignore
//! use coinvault_registry::{Registry, RegistryConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = Registry::from_config(RegistryConfig::default()).await?;
//!     registry.run().await
//! }
//! ```

pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use application::{
    CreateCryptocurrencyCommand, JobState, MarketDataReconciler, RegistryError, RegistryResult,
    ReconciliationReport, TickOutcome, UpdateCryptocurrencyCommand,
};
pub use infrastructure::{
    CoinGeckoClient, InMemoryCryptocurrencyRepository, InMemoryPriceSource,
    PostgresCryptocurrencyRepository, ReconciliationScheduler, RegistryConfig, StorageBackend,
};
pub use presentation::{AppState, create_router};

use anyhow::Context;
use axum::Router;
use coinvault_clock::SystemClock;
use coinvault_ports::{Clock, CryptocurrencyRepository, PriceSource};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The registry service: wired ports plus its configuration
pub struct Registry {
    pub config: RegistryConfig,
    state: Arc<AppState>,
    shutdown: CancellationToken,
}

impl Registry {
    /// Wire the service from explicit components
    pub fn with_components(
        config: RegistryConfig,
        repository: Arc<dyn CryptocurrencyRepository>,
        price_source: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            provider = price_source.name(),
            clock = clock.name(),
            "Registry components wired"
        );
        Registry {
            config,
            state: Arc::new(AppState::new(repository, price_source, clock)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Build the configured store and the CoinGecko client
    pub async fn from_config(config: RegistryConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let repository: Arc<dyn CryptocurrencyRepository> = match config.storage.backend {
            StorageBackend::InMemory => {
                info!("Using in-memory storage");
                Arc::new(InMemoryCryptocurrencyRepository::new())
            }
            StorageBackend::Postgres => {
                let url = config
                    .storage
                    .database_url
                    .as_deref()
                    .context("storage.database_url is not set")?;
                let repo = PostgresCryptocurrencyRepository::connect(
                    url,
                    config.storage.max_connections,
                )
                .await?;
                repo.ensure_schema().await?;
                info!("Using PostgreSQL storage");
                Arc::new(repo)
            }
        };

        let price_source = Arc::new(CoinGeckoClient::new(&config.provider)?);
        info!(base_url = price_source.base_url(), "CoinGecko client ready");

        Ok(Self::with_components(
            config,
            repository,
            price_source,
            Arc::new(SystemClock::new()),
        ))
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Create the REST API router
    pub fn router(&self) -> Router {
        create_router(self.state())
    }

    /// Token that stops the server and scheduler when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serve HTTP and run the scheduler until a shutdown signal arrives
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.bind_address();

        let scheduler = if self.config.reconciliation.enabled {
            Some(ReconciliationScheduler::start(
                Arc::clone(&self.state.reconciler),
                self.config.reconciliation.interval(),
                self.config.reconciliation.run_on_startup,
                self.shutdown.child_token(),
            ))
        } else {
            info!("Reconciliation scheduler disabled");
            None
        };

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!("Coinvault registry listening on {}", addr);

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal(self.shutdown.clone()))
            .await;

        if let Some(scheduler) = scheduler {
            scheduler.shutdown().await;
        }
        served?;

        info!("Coinvault registry stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, SIGTERM or token cancellation, then cancels the token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
        _ = token.cancelled() => info!("Shutdown requested"),
    }
    token.cancel();
}
