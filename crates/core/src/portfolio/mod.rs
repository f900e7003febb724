//! Portfolio solvers.
//!
//! - [`holdings`] - ledger replay into valued positions
//! - [`allocation`] - goal breakdowns and per-account values
//! - [`rebalancing`] - full and buy-only rebalancing
//! - [`withdrawal`] - tax-aware sell-only withdrawals
//! - [`forecast`] - monthly cash-flow simulation
//!
//! Every solver is a pure function of its inputs.

pub mod allocation;
pub mod forecast;
pub mod holdings;
pub mod rebalancing;
pub mod withdrawal;

pub use allocation::*;
pub use forecast::*;
pub use holdings::*;
pub use rebalancing::*;
pub use withdrawal::*;
