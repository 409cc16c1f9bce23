use coinvault_core::{RecordId, ValueError};
use coinvault_ports::StoreError;
use thiserror::Error;

/// Outcome taxonomy of registry operations
///
/// `Rejected`, `Conflict` and `NotFound` are user-correctable. `Store` is an
/// unexpected persistence failure and is never retried here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Cryptocurrency {0} not found")]
    NotFound(RecordId),

    #[error("Price provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Storage failure: {0}")]
    Store(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

impl From<ValueError> for RegistryError {
    fn from(err: ValueError) -> Self {
        RegistryError::Rejected(err.to_string())
    }
}

/// Unique constraint violations surface as `Conflict`, whichever layer caught them
impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(field) => {
                RegistryError::Conflict(format!("Cryptocurrency {} already exists", field))
            }
            StoreError::Backend(msg) => RegistryError::Store(msg),
        }
    }
}
