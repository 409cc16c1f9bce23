mod record;

pub use record::{CryptocurrencyRecord, NewCryptocurrency, RecordId, RecordPatch};
