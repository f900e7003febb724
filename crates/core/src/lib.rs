//! Planfolio Core - Domain entities and the planning solvers.
//!
//! This crate turns a ledger of buy/sell transactions plus target allocations
//! into holdings, rebalancing and withdrawal plans, and monthly cash-flow
//! forecasts. The solvers are pure functions; persistence is reached through
//! [`snapshot::SnapshotRepositoryTrait`], implemented by the `storage-sqlite`
//! crate, and prices through the `market-data` crate.

pub mod accounts;
pub mod assets;
pub mod constants;
pub mod errors;
pub mod goals;
pub mod portfolio;
pub mod quotes;
pub mod settings;
pub mod snapshot;
pub mod transactions;
pub mod utils;

// Re-export common types from the portfolio module
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
