//! CoinGecko wire formats
//!
//! Only the fields the registry reads are modelled; serde ignores the rest.

use coinvault_core::{CoinDetails, CoinSummary, MarketListing, Timestamp};
use serde::Deserialize;

/// `GET /search?query=`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
}

impl From<SearchCoin> for CoinSummary {
    fn from(coin: SearchCoin) -> Self {
        CoinSummary::new(coin.id, coin.name, coin.symbol)
    }
}

/// `GET /coins/{id}`
#[derive(Debug, Deserialize)]
pub struct CoinResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: CurrencyValues,
    #[serde(default)]
    pub market_cap: CurrencyValues,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

/// Per-currency values; only USD is used
#[derive(Debug, Default, Deserialize)]
pub struct CurrencyValues {
    #[serde(default)]
    pub usd: Option<f64>,
}

impl From<CoinResponse> for CoinDetails {
    fn from(coin: CoinResponse) -> Self {
        let market = coin.market_data.unwrap_or_default();
        CoinDetails {
            id: coin.id,
            name: coin.name,
            current_price_usd: market.current_price.usd,
            market_cap_usd: market.market_cap.usd,
            last_updated: market.last_updated.or(coin.last_updated),
        }
    }
}

/// Element of `GET /coins/markets`
#[derive(Debug, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl From<MarketCoin> for MarketListing {
    fn from(coin: MarketCoin) -> Self {
        MarketListing {
            external_id: coin.id,
            name: coin.name,
            symbol: coin.symbol.to_uppercase(),
            current_price: coin.current_price,
            market_cap: coin.market_cap,
        }
    }
}

/// Error body returned alongside non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "error_message")]
    pub error: String,
}
