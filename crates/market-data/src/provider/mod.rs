//! Price provider abstraction and the HTTP proxy implementation.
//!
//! The planning core never talks to the network itself. It is handed a
//! `PriceProvider` and asks it for one price per asset per refresh cycle.

mod traits;

pub mod proxy;

pub use proxy::ProxyPriceProvider;
pub use traits::PriceProvider;
