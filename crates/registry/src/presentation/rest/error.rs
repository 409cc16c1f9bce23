use crate::application::RegistryError;
use crate::presentation::rest::dto::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub error: &'static str,
    pub detail: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError {
            error: "bad_request",
            detail: detail.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        ApiError {
            error: "conflict",
            detail: detail.into(),
            status: StatusCode::CONFLICT,
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        ApiError {
            error: "not_found",
            detail: detail.into(),
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn bad_gateway(detail: impl Into<String>) -> Self {
        ApiError {
            error: "bad_gateway",
            detail: detail.into(),
            status: StatusCode::BAD_GATEWAY,
        }
    }

    /// Request the extractors could not decode; keeps their status code
    pub fn invalid_request(status: StatusCode, detail: impl Into<String>) -> Self {
        ApiError {
            error: "invalid_request",
            detail: detail.into(),
            status,
        }
    }

    pub fn internal() -> Self {
        ApiError {
            error: "internal_error",
            detail: "Internal server error".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Rejected(reason) => ApiError::bad_request(reason),
            RegistryError::Conflict(reason) => ApiError::conflict(reason),
            RegistryError::NotFound(_) => ApiError::not_found(err.to_string()),
            RegistryError::ProviderUnavailable(_) => ApiError::bad_gateway(err.to_string()),
            RegistryError::Store(msg) => {
                error!("Storage failure: {}", msg);
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.error, self.detail));
        (self.status, body).into_response()
    }
}
