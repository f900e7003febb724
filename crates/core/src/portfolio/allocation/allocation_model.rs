//! Allocation models for account-level reporting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::{Goal, GoalAllocation};

/// Current value of one account, as consumed by the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountValue {
    pub account_id: String,
    pub account_name: String,
    /// Market value of the account's positions
    pub invested_value: Decimal,
    pub cash_reserve: Decimal,
    /// `invested_value + cash_reserve`
    pub total_value: Decimal,
    /// Goal bucket holding the largest share of the positions
    pub primary_goal: Goal,
    pub goal_allocations: Vec<GoalAllocation>,
}
