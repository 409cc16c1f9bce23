//! Candidate validation and enrichment against the price provider
//!
//! A candidate whose symbol the provider knows is enriched with the
//! provider's id, name and market data. Anything else must carry positive
//! caller-supplied market data to be stored as a custom asset. Provider
//! failures degrade to the custom-asset path instead of failing creation.

use coinvault_core::{
    CoinDetails, CoinName, CoinSummary, NewCryptocurrency, Symbol, UsdAmount, ValueError,
};
use coinvault_ports::{PriceSource, ProviderError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Field-validated creation candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: Option<CoinName>,
    pub symbol: Symbol,
    pub current_price: Option<UsdAmount>,
    pub market_cap: Option<UsdAmount>,
}

impl Candidate {
    /// Parse raw caller input; any malformed field fails the whole candidate
    pub fn new(
        name: Option<&str>,
        symbol: &str,
        current_price: Option<f64>,
        market_cap: Option<f64>,
    ) -> Result<Self, ValueError> {
        Ok(Self {
            name: name.map(CoinName::new).transpose()?,
            symbol: Symbol::new(symbol)?,
            current_price: current_price
                .map(|v| UsdAmount::for_field("current_price", v))
                .transpose()?,
            market_cap: market_cap
                .map(|v| UsdAmount::for_field("market_cap", v))
                .transpose()?,
        })
    }
}

/// What the provider said about a symbol
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderLookup {
    Matched {
        summary: CoinSummary,
        details: CoinDetails,
    },
    NoMatch,
    Unavailable(ProviderError),
}

/// Validation verdict
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Accepted(NewCryptocurrency),
    Rejected(String),
}

/// Decide the stored fields for `candidate` given the provider's answer
///
/// Caller-supplied market data takes precedence over provider data. A
/// provider match always links the record via `external_id`.
pub fn resolve_candidate(candidate: &Candidate, lookup: ProviderLookup) -> Validation {
    match lookup {
        ProviderLookup::Matched { summary, details } => {
            let provider_name = details.name.as_deref().unwrap_or(&summary.name);
            let name = match CoinName::new(provider_name) {
                Ok(name) => name,
                Err(_) => match &candidate.name {
                    Some(name) => name.clone(),
                    None => return Validation::Rejected(format!(
                        "Provider returned an unusable name for {}",
                        candidate.symbol
                    )),
                },
            };

            let current_price = candidate.current_price.or_else(|| {
                details
                    .current_price_usd
                    .and_then(|v| UsdAmount::for_field("current_price", v).ok())
            });
            let market_cap = candidate.market_cap.or_else(|| {
                details
                    .market_cap_usd
                    .and_then(|v| UsdAmount::for_field("market_cap", v).ok())
            });

            match (current_price, market_cap) {
                (Some(current_price), Some(market_cap)) => {
                    Validation::Accepted(NewCryptocurrency {
                        name,
                        symbol: candidate.symbol.clone(),
                        external_id: Some(summary.id),
                        current_price,
                        market_cap,
                    })
                }
                _ => Validation::Rejected(format!(
                    "No positive market data available for {}; provide current_price and market_cap",
                    candidate.symbol
                )),
            }
        }
        ProviderLookup::NoMatch | ProviderLookup::Unavailable(_) => {
            match (candidate.current_price, candidate.market_cap) {
                (Some(current_price), Some(market_cap)) => {
                    let name = candidate.name.clone().unwrap_or_else(|| {
                        CoinName::from_symbol(&candidate.symbol)
                    });
                    Validation::Accepted(NewCryptocurrency::custom(
                        name,
                        candidate.symbol.clone(),
                        current_price,
                        market_cap,
                    ))
                }
                _ => Validation::Rejected(format!(
                    "Cryptocurrency {} not found; custom cryptocurrencies require positive current_price and market_cap",
                    candidate.symbol
                )),
            }
        }
    }
}

/// Validates candidates against a price source
pub struct CryptocurrencyValidator<P>
where
    P: PriceSource + ?Sized,
{
    price_source: Arc<P>,
}

impl<P> CryptocurrencyValidator<P>
where
    P: PriceSource + ?Sized,
{
    pub fn new(price_source: Arc<P>) -> Self {
        Self { price_source }
    }

    /// Find the provider coin whose symbol matches exactly, ignoring case
    pub async fn lookup(&self, symbol: &Symbol) -> ProviderLookup {
        let hits = match self.price_source.search_by_symbol(symbol.as_str()).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(
                    provider = self.price_source.name(),
                    symbol = %symbol,
                    "Symbol search failed: {}",
                    e
                );
                return ProviderLookup::Unavailable(e);
            }
        };

        let Some(summary) = hits.into_iter().find(|c| c.matches_symbol(symbol)) else {
            debug!(symbol = %symbol, "No provider coin matches symbol");
            return ProviderLookup::NoMatch;
        };

        match self.price_source.coin_details(&summary.id).await {
            Ok(details) => ProviderLookup::Matched { summary, details },
            Err(ProviderError::NotFound(id)) => {
                debug!(symbol = %symbol, coin = %id, "Search hit has no details");
                ProviderLookup::NoMatch
            }
            Err(e) => {
                warn!(
                    provider = self.price_source.name(),
                    coin = %summary.id,
                    "Coin details request failed: {}",
                    e
                );
                ProviderLookup::Unavailable(e)
            }
        }
    }

    pub async fn validate(&self, candidate: &Candidate) -> Validation {
        let lookup = self.lookup(&candidate.symbol).await;
        resolve_candidate(candidate, lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: &str, price: Option<f64>, cap: Option<f64>) -> CoinDetails {
        CoinDetails {
            id: id.to_string(),
            name: Some("Bitcoin".to_string()),
            current_price_usd: price,
            market_cap_usd: cap,
            last_updated: None,
        }
    }

    fn matched(price: Option<f64>, cap: Option<f64>) -> ProviderLookup {
        ProviderLookup::Matched {
            summary: CoinSummary::new("bitcoin", "Bitcoin", "btc"),
            details: details("bitcoin", price, cap),
        }
    }

    fn accepted(validation: Validation) -> NewCryptocurrency {
        match validation {
            Validation::Accepted(new) => new,
            Validation::Rejected(reason) => panic!("unexpected rejection: {reason}"),
        }
    }

    #[test]
    fn test_candidate_rejects_malformed_fields() {
        assert!(Candidate::new(None, "", None, None).is_err());
        assert!(Candidate::new(None, "nonexistent_crypto", None, None).is_err());
        assert!(Candidate::new(None, "BTC", Some(0.0), None).is_err());
        assert!(Candidate::new(Some("  "), "BTC", None, None).is_err());
    }

    #[test]
    fn test_match_enriches_from_provider() {
        let candidate = Candidate::new(Some("My Bitcoin"), "btc", None, None).unwrap();

        let new = accepted(resolve_candidate(&candidate, matched(Some(50_000.0), Some(1e12))));

        assert_eq!(new.name.as_str(), "Bitcoin");
        assert_eq!(new.symbol.as_str(), "BTC");
        assert_eq!(new.external_id.as_deref(), Some("bitcoin"));
        assert_eq!(new.current_price.value(), 50_000.0);
        assert_eq!(new.market_cap.value(), 1e12);
    }

    #[test]
    fn test_caller_market_data_overrides_provider() {
        let candidate = Candidate::new(None, "BTC", Some(1.0), Some(2.0)).unwrap();

        let new = accepted(resolve_candidate(&candidate, matched(Some(50_000.0), Some(1e12))));

        assert_eq!(new.current_price.value(), 1.0);
        assert_eq!(new.market_cap.value(), 2.0);
        assert_eq!(new.external_id.as_deref(), Some("bitcoin"));
    }

    #[test]
    fn test_match_without_usable_market_data_is_rejected() {
        let candidate = Candidate::new(None, "BTC", None, None).unwrap();

        let verdict = resolve_candidate(&candidate, matched(Some(0.0), None));

        assert!(matches!(verdict, Validation::Rejected(_)));
    }

    #[test]
    fn test_no_match_with_market_data_is_custom() {
        let candidate = Candidate::new(Some("Acme"), "acme", Some(1.0), Some(1e6)).unwrap();

        let new = accepted(resolve_candidate(&candidate, ProviderLookup::NoMatch));

        assert_eq!(new.name.as_str(), "Acme");
        assert!(new.external_id.is_none());
    }

    #[test]
    fn test_custom_without_name_uses_symbol() {
        let candidate = Candidate::new(None, "acme", Some(1.0), Some(1e6)).unwrap();

        let new = accepted(resolve_candidate(&candidate, ProviderLookup::NoMatch));

        assert_eq!(new.name.as_str(), "ACME");
    }

    #[test]
    fn test_no_match_without_market_data_is_rejected() {
        let candidate = Candidate::new(None, "ACME", Some(1.0), None).unwrap();

        let verdict = resolve_candidate(&candidate, ProviderLookup::NoMatch);

        match verdict {
            Validation::Rejected(reason) => assert!(reason.contains("ACME")),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_provider_degrades_to_custom() {
        let candidate = Candidate::new(None, "BTC", Some(50_000.0), Some(1e9)).unwrap();
        let lookup = ProviderLookup::Unavailable(ProviderError::Network("timeout".into()));

        let new = accepted(resolve_candidate(&candidate, lookup));

        assert!(new.external_id.is_none());
        assert_eq!(new.name.as_str(), "BTC");
    }
}
