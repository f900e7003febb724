use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest price for a single identifier as returned by a price provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPrice {
    /// Identifier the price was requested for
    pub symbol: String,

    /// Last traded / scraped price
    pub price: Decimal,

    /// Quote currency as reported by the provider
    pub currency: String,

    /// Timestamp of the quote
    pub as_of: DateTime<Utc>,
}

impl LatestPrice {
    pub fn new(symbol: impl Into<String>, price: Decimal, currency: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            currency: currency.into(),
            as_of: Utc::now(),
        }
    }
}
