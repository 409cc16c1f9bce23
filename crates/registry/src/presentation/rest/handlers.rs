use axum::{Json, extract::State, http::StatusCode};
use coinvault_core::RecordId;
use std::sync::Arc;

use crate::application::{
    CreateCryptocurrencyUseCase, DeleteCryptocurrencyUseCase, ListCryptocurrenciesQuery,
    QueryCryptocurrenciesUseCase, TopCryptocurrenciesUseCase, UpdateCryptocurrencyUseCase,
};
use crate::presentation::rest::{
    ApiError,
    dto::*,
    extract::{AppJson, AppPath, AppQuery},
};

use super::AppState;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// POST /cryptocurrencies
pub async fn create_cryptocurrency(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateCryptocurrencyRequest>,
) -> Result<(StatusCode, Json<CryptocurrencyResponse>), ApiError> {
    let use_case = CreateCryptocurrencyUseCase::new(
        Arc::clone(&state.repository),
        Arc::clone(&state.price_source),
    );

    let record = use_case.execute(req.into()).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /cryptocurrencies
pub async fn list_cryptocurrencies(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Vec<CryptocurrencyResponse>>, ApiError> {
    let use_case = QueryCryptocurrenciesUseCase::new(Arc::clone(&state.repository));

    let records = use_case
        .list(ListCryptocurrenciesQuery {
            skip: query.skip,
            limit: query.limit,
        })
        .await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// GET /cryptocurrencies/{id}
pub async fn get_cryptocurrency(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CryptocurrencyResponse>, ApiError> {
    let use_case = QueryCryptocurrenciesUseCase::new(Arc::clone(&state.repository));

    let record = use_case.get(RecordId::new(id)).await?;
    Ok(Json(record.into()))
}

/// PUT /cryptocurrencies/{id}
pub async fn update_cryptocurrency(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateCryptocurrencyRequest>,
) -> Result<Json<CryptocurrencyResponse>, ApiError> {
    let use_case = UpdateCryptocurrencyUseCase::new(Arc::clone(&state.repository));

    let record = use_case.execute(RecordId::new(id), req.into()).await?;
    Ok(Json(record.into()))
}

/// DELETE /cryptocurrencies/{id}
pub async fn delete_cryptocurrency(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CryptocurrencyResponse>, ApiError> {
    let use_case = DeleteCryptocurrencyUseCase::new(Arc::clone(&state.repository));

    let record = use_case.execute(RecordId::new(id)).await?;
    Ok(Json(record.into()))
}

/// GET /market/top
pub async fn top_cryptocurrencies(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<TopQuery>,
) -> Result<Json<Vec<MarketListingResponse>>, ApiError> {
    let use_case = TopCryptocurrenciesUseCase::new(Arc::clone(&state.price_source));

    let listings = use_case.execute(query.limit).await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}
