use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::Goal;
use crate::portfolio::allocation::AccountValue;

/// Starting point of one account in a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastAccount {
    pub id: String,
    pub name: String,
    pub value: Decimal,
    pub primary_goal: Goal,
}

impl ForecastAccount {
    pub fn new(id: &str, value: Decimal, primary_goal: Goal) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            value,
            primary_goal,
        }
    }
}

impl From<&AccountValue> for ForecastAccount {
    fn from(value: &AccountValue) -> Self {
        Self {
            id: value.account_id.clone(),
            name: value.account_name.clone(),
            value: value.total_value,
            primary_goal: value.primary_goal,
        }
    }
}

/// A lump-sum expense due in a given month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledExpense {
    pub name: String,
    pub amount: Decimal,
    /// Month of the year, 1-12
    pub month: u32,
    /// Simulated year (1-based) the expense falls in; every year when unset.
    #[serde(default)]
    pub year: Option<u32>,
    /// Whether cash-source balances may be spent on it.
    #[serde(default)]
    pub allow_liquidity_erosion: bool,
    /// Accounts whose primary goal is listed here may be drawn down.
    #[serde(default)]
    pub allowed_goals: Vec<Goal>,
}

impl ScheduledExpense {
    pub fn is_due(&self, year: u32, month_of_year: u32) -> bool {
        self.month == month_of_year && self.year.map_or(true, |y| y == year)
    }
}

/// State at the end of one simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyResult {
    /// 0-based month index from the start of the forecast
    pub month: u32,
    /// 1-based simulated year
    pub year: u32,
    /// 1-12
    pub month_of_year: u32,
    pub total_value: Decimal,
    pub invested_value: Decimal,
    pub liquidity_value: Decimal,
    pub per_account_value: BTreeMap<String, Decimal>,
    /// Income minus regular expenses for the month
    pub cashflow: Decimal,
    /// Scheduled expenses due in the month
    pub scheduled_expenses: Decimal,
    pub insolvent: bool,
    pub rule_breach: bool,
    pub failure_reason: Option<String>,
}
