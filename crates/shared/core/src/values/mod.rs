use chrono::{DateTime, Utc};
use thiserror::Error;

mod amount;
mod coin_name;
mod symbol;

pub use amount::UsdAmount;
pub use coin_name::{CoinName, MAX_NAME_LEN};
pub use symbol::{MAX_SYMBOL_LEN, Symbol};

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Rejection reasons for value object construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} too long (max {max} chars, got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}
