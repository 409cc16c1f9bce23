pub mod error;
pub mod use_cases;
pub mod validator;

use coinvault_ports::{Clock, CryptocurrencyRepository, PriceSource};

pub use error::{RegistryError, RegistryResult};
pub use use_cases::{
    // Record management
    CreateCryptocurrencyCommand,
    CreateCryptocurrencyUseCase,
    DEFAULT_PAGE_SIZE,
    DEFAULT_TOP_LIMIT,
    DeleteCryptocurrencyUseCase,
    // Reconciliation
    JobState,
    ListCryptocurrenciesQuery,
    MAX_PAGE_SIZE,
    MAX_TOP_LIMIT,
    QueryCryptocurrenciesUseCase,
    ReconcileMarketDataUseCase,
    ReconciliationReport,
    TickOutcome,
    // Market
    TopCryptocurrenciesUseCase,
    UpdateCryptocurrencyCommand,
    UpdateCryptocurrencyUseCase,
};
pub use validator::{Candidate, CryptocurrencyValidator, ProviderLookup, Validation, resolve_candidate};

/// Reconciler wired against trait objects, as held by the running service
pub type MarketDataReconciler =
    ReconcileMarketDataUseCase<dyn CryptocurrencyRepository, dyn PriceSource, dyn Clock>;
