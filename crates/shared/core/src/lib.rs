//! Coinvault Core Domain
//!
//! Pure domain types for the Coinvault cryptocurrency registry.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod market;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{CryptocurrencyRecord, NewCryptocurrency, RecordId, RecordPatch};
pub use market::{CoinDetails, CoinSummary, MarketListing};
pub use values::{CoinName, Symbol, Timestamp, UsdAmount, ValueError};
