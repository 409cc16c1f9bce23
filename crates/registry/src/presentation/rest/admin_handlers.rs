//! Operational endpoints for the reconciliation job

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::application::TickOutcome;
use crate::presentation::rest::{
    ApiError,
    dto::{JobStatusResponse, ReconcileResponse},
    router::AppState,
};

/// POST /admin/reconcile
///
/// Runs one tick inline; answers `skipped` if a run is already in flight.
pub async fn trigger_reconciliation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReconcileResponse>, ApiError> {
    let response = match state.reconciler.run_tick().await? {
        TickOutcome::Completed(report) => ReconcileResponse::Completed(report),
        TickOutcome::Skipped => ReconcileResponse::Skipped,
    };
    Ok(Json(response))
}

/// GET /admin/reconcile
pub async fn reconciliation_status(State(state): State<Arc<AppState>>) -> Json<JobStatusResponse> {
    Json(JobStatusResponse {
        state: state.reconciler.state(),
    })
}
