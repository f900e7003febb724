//! Quote handling.
//!
//! - [`quotes_model`] - Price quotes and the price map the planners consume
//! - [`quotes_refresh`] - Concurrent refresh through a [`PriceProvider`]
//!
//! [`PriceProvider`]: planfolio_market_data::PriceProvider

pub mod quotes_model;
pub mod quotes_refresh;


pub use quotes_model::*;
pub use quotes_refresh::*;
