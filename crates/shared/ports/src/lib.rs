//! Coinvault Ports
//!
//! Port definitions (traits) for the Coinvault registry.
//! These define the boundaries between domain logic and infrastructure.

mod clock;
mod error;
mod price_source;
mod repository;

pub use clock::Clock;
pub use error::{ProviderError, ProviderResult, StoreError, StoreResult, UniqueField};
pub use price_source::PriceSource;
pub use repository::{CryptocurrencyReader, CryptocurrencyRepository, CryptocurrencyWriter};
