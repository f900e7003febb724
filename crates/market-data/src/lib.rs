//! Planfolio Market Data Crate
//!
//! Provider-agnostic price lookup for the planning core.
//!
//! # Core Types
//!
//! - [`PriceProvider`] - Trait for looking up the latest price of an identifier
//! - [`ProxyPriceProvider`] - HTTP client for the external price proxy
//! - [`LatestPrice`] - A single price with its currency and timestamp
//! - [`MarketDataError`] - Per-asset lookup failure

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::LatestPrice;
pub use provider::{PriceProvider, ProxyPriceProvider};
