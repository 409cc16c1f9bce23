mod create_cryptocurrency;
mod delete_cryptocurrency;
mod query_cryptocurrencies;
mod reconcile_market_data;
mod top_cryptocurrencies;
mod update_cryptocurrency;

pub use create_cryptocurrency::{CreateCryptocurrencyCommand, CreateCryptocurrencyUseCase};
pub use delete_cryptocurrency::DeleteCryptocurrencyUseCase;
pub use query_cryptocurrencies::{
    DEFAULT_PAGE_SIZE, ListCryptocurrenciesQuery, MAX_PAGE_SIZE, QueryCryptocurrenciesUseCase,
};
pub use reconcile_market_data::{
    JobState, ReconcileMarketDataUseCase, ReconciliationReport, TickOutcome,
};
pub use top_cryptocurrencies::{DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT, TopCryptocurrenciesUseCase};
pub use update_cryptocurrency::{UpdateCryptocurrencyCommand, UpdateCryptocurrencyUseCase};
