mod in_memory_cryptocurrency;
mod postgres_cryptocurrency;

pub use in_memory_cryptocurrency::InMemoryCryptocurrencyRepository;
pub use postgres_cryptocurrency::PostgresCryptocurrencyRepository;
