use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;

use crate::accounts::Account;
use crate::assets::AssetDefinition;
use crate::goals::{Goal, GoalAllocation};
use crate::portfolio::allocation::AccountValue;
use crate::portfolio::holdings::{aggregate_account, Position};
use crate::quotes::PriceMap;
use crate::transactions::Transaction;
use crate::utils::percent_of;

/// Value and share of total per goal bucket, one entry for every goal.
pub fn allocation_by_goal(positions: &[Position]) -> Vec<GoalAllocation> {
    let mut by_goal: BTreeMap<Goal, Decimal> =
        Goal::ALL.iter().map(|g| (*g, Decimal::ZERO)).collect();
    for position in positions {
        *by_goal.entry(position.goal).or_insert(Decimal::ZERO) += position.current_value;
    }
    let total: Decimal = by_goal.values().copied().sum();

    by_goal
        .into_iter()
        .map(|(goal, value)| GoalAllocation {
            goal,
            value,
            percentage: percent_of(value, total),
        })
        .collect()
}

/// Goal with the largest value. Ties resolve in goal order; an empty or
/// zero-valued set of positions is Growth.
pub fn primary_goal(positions: &[Position]) -> Goal {
    let mut best = (Goal::Growth, Decimal::ZERO);
    for allocation in allocation_by_goal(positions) {
        if allocation.value > best.1 {
            best = (allocation.goal, allocation.value);
        }
    }
    best.0
}

/// Values every account from its own slice of the ledger.
pub fn account_values(
    transactions: &[Transaction],
    accounts: &[Account],
    definitions: &[AssetDefinition],
    prices: &PriceMap,
) -> Vec<AccountValue> {
    accounts
        .iter()
        .map(|account| {
            let holdings = aggregate_account(transactions, &account.id, definitions, prices);
            let invested_value = holdings.summary.total_value;
            let value = AccountValue {
                account_id: account.id.clone(),
                account_name: account.name.clone(),
                invested_value,
                cash_reserve: account.cash_reserve,
                total_value: invested_value + account.cash_reserve,
                primary_goal: primary_goal(&holdings.positions),
                goal_allocations: allocation_by_goal(&holdings.positions),
            };
            debug!(
                "Account {} valued at {} ({:?})",
                value.account_id, value.total_value, value.primary_goal
            );
            value
        })
        .collect()
}
