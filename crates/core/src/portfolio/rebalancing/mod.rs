//! Rebalancing module - full buy/sell rebalance, buy-only cash deployment and
//! the liquidity needed to reach every target without selling.

mod rebalancing_calculator;
mod rebalancing_model;

#[cfg(test)]
mod rebalancing_calculator_tests;

pub use rebalancing_calculator::{
    min_liquidity_for_full_buy_only_coverage, plan_account_rebalance, plan_buy_only_rebalance,
    plan_full_rebalance,
};
pub use rebalancing_model::{
    AccountRebalancePlan, BuyOnlyAction, BuyOnlyPlan, RebalanceAction, RebalanceKind,
};
