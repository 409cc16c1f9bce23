use coinvault_core::{CryptocurrencyRecord, MarketListing, Timestamp};
use serde::{Deserialize, Serialize};

use crate::application::{
    CreateCryptocurrencyCommand, DEFAULT_PAGE_SIZE, DEFAULT_TOP_LIMIT, JobState,
    ReconciliationReport, UpdateCryptocurrencyCommand,
};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCryptocurrencyRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl From<CreateCryptocurrencyRequest> for CreateCryptocurrencyCommand {
    fn from(req: CreateCryptocurrencyRequest) -> Self {
        CreateCryptocurrencyCommand {
            name: req.name,
            symbol: req.symbol,
            current_price: req.current_price,
            market_cap: req.market_cap,
        }
    }
}

/// Unknown fields are ignored; absent or null fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCryptocurrencyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl From<UpdateCryptocurrencyRequest> for UpdateCryptocurrencyCommand {
    fn from(req: UpdateCryptocurrencyRequest) -> Self {
        UpdateCryptocurrencyCommand {
            name: req.name,
            symbol: req.symbol,
            current_price: req.current_price,
            market_cap: req.market_cap,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

fn default_list_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_top_limit")]
    pub limit: usize,
}

fn default_top_limit() -> usize {
    DEFAULT_TOP_LIMIT
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CryptocurrencyResponse {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub external_id: Option<String>,
    pub current_price: f64,
    pub market_cap: f64,
    pub last_updated: Option<Timestamp>,
}

impl From<CryptocurrencyRecord> for CryptocurrencyResponse {
    fn from(record: CryptocurrencyRecord) -> Self {
        CryptocurrencyResponse {
            id: record.id.value(),
            name: record.name.into(),
            symbol: record.symbol.into(),
            external_id: record.external_id,
            current_price: record.current_price.value(),
            market_cap: record.market_cap.value(),
            last_updated: record.last_updated,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarketListingResponse {
    pub name: String,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub external_id: String,
}

impl From<MarketListing> for MarketListingResponse {
    fn from(listing: MarketListing) -> Self {
        MarketListingResponse {
            name: listing.name,
            symbol: listing.symbol,
            current_price: listing.current_price,
            market_cap: listing.market_cap,
            external_id: listing.external_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Body of `POST /admin/reconcile`
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconcileResponse {
    Completed(ReconciliationReport),
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub state: JobState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            detail: detail.into(),
        }
    }
}
