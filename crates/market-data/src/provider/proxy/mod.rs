//! Price proxy provider.
//!
//! The proxy is an external process that scrapes a price for an identifier.
//!
//! # API Endpoint
//!
//! - Latest price: `{base_url}/price?symbol={symbol}`
//!
//! # Response Format
//!
//! ```json
//! { "price": 101.25, "currency": "EUR", "asOf": "2026-03-02T16:30:00Z" }
//! ```
//!
//! `price` may be a JSON number or a numeric string. A body carrying an
//! `error` field, or a 404 status, is reported as symbol-not-found.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::LatestPrice;
use crate::provider::PriceProvider;

const PROVIDER_ID: &str = "PRICE_PROXY";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Currency assumed when the proxy omits one.
const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponse {
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    error: Option<String>,
}

/// Provider backed by the external price proxy.
///
/// # Example
///
/// ```ignore
/// let provider = ProxyPriceProvider::new("http://localhost:3001");
/// let price = provider.latest_price("IE00BK5BQT80").await?;
/// ```
pub struct ProxyPriceProvider {
    client: Client,
    base_url: String,
}

impl ProxyPriceProvider {
    /// Create a provider pointing at the proxy's base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn price_url(&self, symbol: &str) -> String {
        format!(
            "{}/price?symbol={}",
            self.base_url,
            urlencoding::encode(symbol)
        )
    }
}

/// Turn a proxy response body into a price.
pub(crate) fn parse_price_response(symbol: &str, body: &str) -> Result<LatestPrice, MarketDataError> {
    let response: PriceResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::InvalidResponse {
            symbol: symbol.to_string(),
            message: e.to_string(),
        })?;

    if let Some(error) = response.error {
        debug!("Price proxy reported '{}' for {}", error, symbol);
        return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
    }

    let price = match response.price {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
    .ok_or_else(|| MarketDataError::InvalidResponse {
        symbol: symbol.to_string(),
        message: "missing or non-numeric price".to_string(),
    })?;

    if price.is_sign_negative() {
        return Err(MarketDataError::InvalidResponse {
            symbol: symbol.to_string(),
            message: "price is negative".to_string(),
        });
    }

    Ok(LatestPrice {
        symbol: symbol.to_string(),
        price,
        currency: response
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        as_of: response.as_of.unwrap_or_else(Utc::now),
    })
}

#[async_trait]
impl PriceProvider for ProxyPriceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_price(&self, symbol: &str) -> Result<LatestPrice, MarketDataError> {
        let url = self.price_url(symbol);
        debug!("Fetching price for {} from {}", symbol, url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        if !response.status().is_success() {
            warn!("Price proxy returned {} for {}", response.status(), symbol);
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", response.status()),
            });
        }

        let body = response.text().await?;
        parse_price_response(symbol, &body)
    }
}
