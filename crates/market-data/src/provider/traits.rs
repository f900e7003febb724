//! Price provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::LatestPrice;

/// Trait for anything that can look up the latest price of an asset.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use planfolio_market_data::{LatestPrice, MarketDataError, PriceProvider};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl PriceProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn latest_price(&self, symbol: &str) -> Result<LatestPrice, MarketDataError> {
///         Ok(LatestPrice::new(symbol, rust_decimal::Decimal::ONE, "EUR"))
///     }
/// }
/// ```
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the latest price for an identifier.
    ///
    /// Implementations must perform at most one network round trip per call.
    async fn latest_price(&self, symbol: &str) -> Result<LatestPrice, MarketDataError>;
}
