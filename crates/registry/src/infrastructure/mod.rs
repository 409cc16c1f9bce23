pub mod coingecko;
pub mod config;
pub mod in_memory_price_source;
pub mod repositories;
pub mod scheduler;

pub use coingecko::CoinGeckoClient;
pub use config::{
    ConfigError, ProviderConfig, ReconciliationConfig, RegistryConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
pub use in_memory_price_source::InMemoryPriceSource;
pub use repositories::{InMemoryCryptocurrencyRepository, PostgresCryptocurrencyRepository};
pub use scheduler::ReconciliationScheduler;
