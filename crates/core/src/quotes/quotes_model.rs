use std::collections::HashMap;

use chrono::{DateTime, Utc};
use planfolio_market_data::LatestPrice;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::normalize_asset_id;

/// Latest known price per asset id.
pub type PriceMap = HashMap<String, Decimal>;

/// A price observation for one asset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub asset_id: String,
    pub price: Decimal,
    pub currency: String,
    pub as_of: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(asset_id: &str, price: Decimal) -> Self {
        Self {
            asset_id: normalize_asset_id(asset_id),
            price,
            currency: "EUR".to_string(),
            as_of: Utc::now(),
        }
    }
}

impl From<LatestPrice> for PriceQuote {
    fn from(latest: LatestPrice) -> Self {
        Self {
            asset_id: normalize_asset_id(&latest.symbol),
            price: latest.price,
            currency: latest.currency,
            as_of: latest.as_of,
        }
    }
}

/// Builds a price map from quotes. When an asset appears more than once the
/// most recent quote wins.
pub fn price_map(quotes: &[PriceQuote]) -> PriceMap {
    let mut latest: HashMap<String, &PriceQuote> = HashMap::new();
    for quote in quotes {
        let id = normalize_asset_id(&quote.asset_id);
        match latest.get(&id) {
            Some(existing) if existing.as_of > quote.as_of => {}
            _ => {
                latest.insert(id, quote);
            }
        }
    }
    latest
        .into_iter()
        .map(|(id, quote)| (id, quote.price))
        .collect()
}
