//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while looking up a price.
///
/// Every variant is scoped to a single asset: callers refreshing a batch of
/// prices record the failure against that asset and carry on with the rest.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The price proxy does not know the requested identifier.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The proxy answered, but with a non-success status.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The proxy answered with a body that could not be turned into a price.
    #[error("Invalid response for {symbol}: {message}")]
    InvalidResponse {
        /// The identifier that was requested
        symbol: String,
        /// What was wrong with the payload
        message: String,
    },

    /// A network error occurred while communicating with the proxy.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the failure means "this identifier has no price", as opposed to
    /// the proxy being unreachable or misbehaving.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_))
    }
}
