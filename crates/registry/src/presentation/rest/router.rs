use axum::{
    Router,
    routing::{get, post},
};
use coinvault_ports::{Clock, CryptocurrencyRepository, PriceSource};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{admin_handlers, handlers};
use crate::application::{MarketDataReconciler, ReconcileMarketDataUseCase};

/// Application state shared across handlers
///
/// Backends are chosen at startup, so ports are held as trait objects.
pub struct AppState {
    pub repository: Arc<dyn CryptocurrencyRepository>,
    pub price_source: Arc<dyn PriceSource>,
    /// Shared so the scheduler and the admin trigger contend on one guard
    pub reconciler: Arc<MarketDataReconciler>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn CryptocurrencyRepository>,
        price_source: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let reconciler = Arc::new(ReconcileMarketDataUseCase::new(
            Arc::clone(&repository),
            Arc::clone(&price_source),
            clock,
        ));
        AppState {
            repository,
            price_source,
            reconciler,
        }
    }
}

/// Create the REST API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Record management
        .route(
            "/cryptocurrencies",
            post(handlers::create_cryptocurrency).get(handlers::list_cryptocurrencies),
        )
        .route(
            "/cryptocurrencies/{id}",
            get(handlers::get_cryptocurrency)
                .put(handlers::update_cryptocurrency)
                .delete(handlers::delete_cryptocurrency),
        )
        // Market data passthrough
        .route("/market/top", get(handlers::top_cryptocurrencies))
        // Operations
        .route(
            "/admin/reconcile",
            post(admin_handlers::trigger_reconciliation)
                .get(admin_handlers::reconciliation_status),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
