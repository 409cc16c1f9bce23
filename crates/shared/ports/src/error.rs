use std::fmt;
use thiserror::Error;

/// Column protected by a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Name,
    Symbol,
    ExternalId,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Name => write!(f, "name"),
            UniqueField::Symbol => write!(f, "symbol"),
            UniqueField::ExternalId => write!(f, "external_id"),
        }
    }
}

/// Errors raised by record storage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unique constraint violated on {0}")]
    UniqueViolation(UniqueField),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by an external price provider
///
/// Infrastructure adapters convert their transport errors into this type so
/// the application layer never sees HTTP client details.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Coin not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
