//! Holdings module - ledger replay, position valuation and portfolio totals.

mod holdings_calculator;
mod holdings_model;

#[cfg(test)]
mod holdings_calculator_tests;

pub use holdings_calculator::{
    aggregate, aggregate_account, aggregate_with_settings, replay_transactions, summarize,
    HoldingState,
};
pub use holdings_model::{ClassAllocation, Holdings, PortfolioSummary, Position};
