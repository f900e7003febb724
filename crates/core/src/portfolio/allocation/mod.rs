//! Allocation module - goal breakdowns and per-account valuation.

mod allocation_calculator;
mod allocation_model;

#[cfg(test)]
mod allocation_calculator_tests;

pub use allocation_calculator::{account_values, allocation_by_goal, primary_goal};
pub use allocation_model::AccountValue;
