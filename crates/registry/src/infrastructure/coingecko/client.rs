use async_trait::async_trait;
use coinvault_core::{CoinDetails, CoinSummary, MarketListing};
use coinvault_ports::{PriceSource, ProviderError, ProviderResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::dto::{CoinResponse, ErrorBody, MarketCoin, SearchResponse};
use crate::infrastructure::config::ProviderConfig;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Error, Debug)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {msg}")]
    Api { status: StatusCode, msg: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convert infrastructure RestError to port-level ProviderError
impl From<RestError> for ProviderError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Http(e) => ProviderError::Network(e.to_string()),
            RestError::Api { status, msg } => ProviderError::Api {
                status: status.as_u16(),
                message: msg,
            },
            RestError::Parse(msg) => ProviderError::Parse(msg),
        }
    }
}

/// CoinGecko public API client
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, RestError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("coinvault/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(CoinGeckoClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Client against an arbitrary base URL with default settings
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RestError> {
        Self::new(&ProviderConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RestError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "CoinGecko request");

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        let resp = request.send().await?;

        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, RestError> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let msg = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(RestError::Api { status, msg });
        }

        serde_json::from_str(&text).map_err(|e| RestError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn search_by_symbol(&self, symbol: &str) -> ProviderResult<Vec<CoinSummary>> {
        let resp: SearchResponse = self.get("/search", &[("query", symbol.to_string())]).await?;
        Ok(resp.coins.into_iter().map(Into::into).collect())
    }

    async fn coin_details(&self, id: &str) -> ProviderResult<CoinDetails> {
        let query = [
            ("localization", "false".to_string()),
            ("tickers", "false".to_string()),
            ("community_data", "false".to_string()),
            ("developer_data", "false".to_string()),
        ];
        match self.get::<CoinResponse>(&format!("/coins/{}", id), &query).await {
            Ok(coin) => Ok(coin.into()),
            Err(RestError::Api { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(ProviderError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn top_by_market_cap(&self, limit: usize) -> ProviderResult<Vec<MarketListing>> {
        let query = [
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", limit.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
        ];
        let coins: Vec<MarketCoin> = self.get("/coins/markets", &query).await?;
        Ok(coins.into_iter().map(Into::into).collect())
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CoinGeckoClient::with_base_url("http://localhost:9999/api/v3/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/api/v3");
    }

    #[test]
    fn test_rest_error_conversion() {
        let err: ProviderError = RestError::Api {
            status: StatusCode::TOO_MANY_REQUESTS,
            msg: "rate limited".into(),
        }
        .into();
        assert_eq!(
            err,
            ProviderError::Api {
                status: 429,
                message: "rate limited".into()
            }
        );

        let err: ProviderError = RestError::Parse("bad json".into()).into();
        assert_eq!(err, ProviderError::Parse("bad json".into()));
    }
}
