//! Refreshes the latest price of a set of assets through a provider.

use std::collections::HashSet;

use futures::future::join_all;
use log::{debug, error, info};
use planfolio_market_data::{MarketDataError, PriceProvider};
use serde::{Deserialize, Serialize};

use crate::assets::normalize_asset_id;
use crate::quotes::PriceMap;

/// Number of lookups in flight at once.
const REFRESH_BATCH_SIZE: usize = 10;

/// A lookup that did not produce a price.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFailure {
    pub asset_id: String,
    pub message: String,
    pub not_found: bool,
}

/// Result of a refresh. Failures never abort the other lookups.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRefresh {
    /// Fresh price per normalised asset id.
    pub quotes: PriceMap,
    pub failures: Vec<QuoteFailure>,
}

impl QuoteRefresh {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Looks up the latest price of every distinct asset id.
///
/// Ids are compared after normalisation, so `vwce` and `VWCE` trigger a
/// single lookup. Blank ids are skipped.
pub async fn refresh_quotes(provider: &dyn PriceProvider, asset_ids: &[String]) -> QuoteRefresh {
    let mut seen = HashSet::new();
    let unique: Vec<String> = asset_ids
        .iter()
        .map(|id| normalize_asset_id(id))
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect();

    debug!(
        "Refreshing {} quotes through {} ({} requested)",
        unique.len(),
        provider.id(),
        asset_ids.len()
    );

    let mut refresh = QuoteRefresh::default();
    for chunk in unique.chunks(REFRESH_BATCH_SIZE) {
        let lookups = chunk.iter().map(|asset_id| async move {
            let result = provider.latest_price(asset_id).await;
            (asset_id.clone(), result)
        });

        for (asset_id, result) in join_all(lookups).await {
            match result {
                Ok(latest) => {
                    debug!("{} priced at {} {}", asset_id, latest.price, latest.currency);
                    refresh.quotes.insert(asset_id, latest.price);
                }
                Err(e) => {
                    error!("Price lookup for {} failed: {}", asset_id, e);
                    refresh.failures.push(failure(asset_id, &e));
                }
            }
        }
    }

    info!(
        "Quote refresh finished: {} updated, {} failed",
        refresh.quotes.len(),
        refresh.failures.len()
    );
    refresh
}

fn failure(asset_id: String, error: &MarketDataError) -> QuoteFailure {
    QuoteFailure {
        asset_id,
        message: error.to_string(),
        not_found: error.is_not_found(),
    }
}
