//! CoinGecko price provider adapter

mod client;
pub mod dto;

pub use client::{CoinGeckoClient, RestError};
