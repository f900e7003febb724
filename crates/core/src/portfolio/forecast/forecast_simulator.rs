//! Monthly cash-flow simulation.
//!
//! Each month runs the same steps in order:
//!
//! 1. Scheduled expenses due this month are paid from the month's net
//!    inflow, then from cash sources when the expense allows it, then
//!    pro-rata from accounts whose primary goal the expense allows.
//! 2. A negative net cash flow drains cash sources, then all accounts
//!    pro-rata. Whatever is still missing is dropped.
//! 3. A positive net cash flow refills cash sources up to their liquidity
//!    floor, in source order.
//! 4. The rest is invested pro-rata across accounts (evenly when they are
//!    all empty).
//! 5. Accounts grow at their monthly-equivalent rate.
//!
//! Insolvency and floor breaches are reported on the month, never raised:
//! the forecast always covers the full horizon. An account whose value
//! would leave the `Decimal` range is capped at `Decimal::MAX` and stops
//! growing; the month it happens carries the reason.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::accounts::CashSource;
use crate::constants::MONTHS_PER_YEAR;
use crate::portfolio::forecast::{ForecastAccount, MonthlyResult, ScheduledExpense};
use crate::utils::{monthly_rate_from_annual_percent, safe_div};

struct AccountState {
    account: ForecastAccount,
    value: Decimal,
    monthly_rate: Decimal,
}

struct SourceState {
    source: CashSource,
    liquidity: Decimal,
}

impl AccountState {
    /// Adds `amount`, capping at `Decimal::MAX`. Returns false when capped.
    fn credit(&mut self, amount: Decimal) -> bool {
        match self.value.checked_add(amount) {
            Some(value) => {
                self.value = value;
                true
            }
            None => {
                self.cap();
                false
            }
        }
    }

    /// One month of growth. Returns false when the account had to be capped.
    fn grow(&mut self) -> bool {
        let grown = self
            .value
            .checked_mul(self.monthly_rate)
            .and_then(|growth| self.value.checked_add(growth));
        match grown {
            Some(value) => {
                self.value = value.max(Decimal::ZERO);
                true
            }
            None => {
                self.cap();
                false
            }
        }
    }

    fn cap(&mut self) {
        self.value = Decimal::MAX;
        self.monthly_rate = Decimal::ZERO;
    }

    fn overflow_reason(&self) -> String {
        format!(
            "Value of account {} exceeds the representable range; growth stopped",
            self.account.id
        )
    }
}

impl SourceState {
    fn floor(&self, total_invested: Decimal) -> Decimal {
        self.source.min_liquidity_rule.floor(total_invested)
    }
}

/// Simulates `horizon_years × 12` months and returns one result per month.
///
/// `annual_return_by_account` maps account ids to an annual percentage;
/// accounts missing from it do not grow.
pub fn simulate(
    accounts: &[ForecastAccount],
    cash_sources: &[CashSource],
    monthly_income: Decimal,
    monthly_expenses: Decimal,
    horizon_years: u32,
    annual_return_by_account: &HashMap<String, Decimal>,
    scheduled_expenses: &[ScheduledExpense],
) -> Vec<MonthlyResult> {
    let mut accounts: Vec<AccountState> = accounts
        .iter()
        .map(|account| {
            let annual = annual_return_by_account
                .get(&account.id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            AccountState {
                account: account.clone(),
                value: account.value.max(Decimal::ZERO),
                monthly_rate: monthly_rate_from_annual_percent(annual),
            }
        })
        .collect();
    let mut sources: Vec<SourceState> = cash_sources
        .iter()
        .map(|source| SourceState {
            source: source.clone(),
            liquidity: source.current_liquidity,
        })
        .collect();

    let months = horizon_years.saturating_mul(MONTHS_PER_YEAR);
    let cashflow = monthly_income - monthly_expenses;
    debug!(
        "Forecasting {} months over {} accounts and {} cash sources",
        months,
        accounts.len(),
        sources.len()
    );

    let mut results = Vec::with_capacity(months as usize);
    for month in 0..months {
        let year = month / MONTHS_PER_YEAR + 1;
        let month_of_year = month % MONTHS_PER_YEAR + 1;
        let invested_at_start = total_value(&accounts);

        let mut inflow = cashflow.max(Decimal::ZERO);
        let mut reasons: Vec<String> = Vec::new();
        let mut insolvent = false;
        let mut rule_breach = false;

        // 1. Scheduled expenses
        let due: Vec<&ScheduledExpense> = scheduled_expenses
            .iter()
            .filter(|e| e.is_due(year, month_of_year))
            .collect();
        let scheduled_total: Decimal = due.iter().map(|e| e.amount).sum();
        for expense in due {
            if let Some(reason) = fund_expense(expense, &mut inflow, &mut accounts, &mut sources) {
                warn!("Month {} (year {}): {}", month_of_year, year, reason);
                insolvent = true;
                reasons.push(reason);
            }
        }

        if cashflow < Decimal::ZERO {
            // 2. Deficit
            let mut deficit = -cashflow;
            deficit -= drain_sources(&mut sources, deficit);
            deficit -= withdraw_pro_rata(&mut accounts, deficit, |_| true);
            if deficit > Decimal::ZERO {
                let below_floor = sources
                    .iter()
                    .any(|s| s.liquidity < s.floor(invested_at_start));
                if below_floor {
                    rule_breach = true;
                    reasons.push(format!(
                        "Uncovered deficit of {} with liquidity below its floor",
                        deficit
                    ));
                }
                warn!(
                    "Month {} (year {}): dropping uncovered deficit of {}",
                    month_of_year, year, deficit
                );
            }
        } else if inflow > Decimal::ZERO {
            // 3. Floors first
            for source in sources.iter_mut() {
                let missing = source.floor(invested_at_start).saturating_sub(source.liquidity);
                if missing > Decimal::ZERO {
                    let top_up = missing.min(inflow);
                    source.liquidity += top_up;
                    inflow -= top_up;
                }
            }
            // 4. Invest the rest
            if inflow > Decimal::ZERO {
                reasons.extend(invest(&mut accounts, &mut sources, inflow));
            }
        }

        // 5. Growth
        for account in accounts.iter_mut() {
            if !account.grow() {
                let reason = account.overflow_reason();
                warn!("Month {} (year {}): {}", month_of_year, year, reason);
                reasons.push(reason);
            }
        }

        let invested_value = total_value(&accounts);
        let liquidity_value = sources
            .iter()
            .fold(Decimal::ZERO, |sum, s| sum.saturating_add(s.liquidity));
        results.push(MonthlyResult {
            month,
            year,
            month_of_year,
            total_value: invested_value.saturating_add(liquidity_value),
            invested_value,
            liquidity_value,
            per_account_value: accounts
                .iter()
                .map(|a| (a.account.id.clone(), a.value))
                .collect::<BTreeMap<_, _>>(),
            cashflow,
            scheduled_expenses: scheduled_total,
            insolvent,
            rule_breach,
            failure_reason: if reasons.is_empty() {
                None
            } else {
                Some(reasons.join("; "))
            },
        });
    }

    results
}

/// Sum of account values, saturating at `Decimal::MAX`.
fn total_value(accounts: &[AccountState]) -> Decimal {
    accounts
        .iter()
        .fold(Decimal::ZERO, |sum, a| sum.saturating_add(a.value))
}

/// Pays one scheduled expense. Returns the insolvency reason when the
/// allowed sources could not cover it.
fn fund_expense(
    expense: &ScheduledExpense,
    inflow: &mut Decimal,
    accounts: &mut [AccountState],
    sources: &mut [SourceState],
) -> Option<String> {
    let mut needed = expense.amount.max(Decimal::ZERO);

    let from_inflow = needed.min(*inflow);
    *inflow -= from_inflow;
    needed -= from_inflow;

    if needed > Decimal::ZERO && expense.allow_liquidity_erosion {
        needed -= drain_sources(sources, needed);
    }
    if needed.is_zero() {
        return None;
    }

    let allowed = |account: &AccountState| {
        expense
            .allowed_goals
            .contains(&account.account.primary_goal)
    };
    needed -= withdraw_pro_rata(accounts, needed, allowed);
    if needed.is_zero() {
        return None;
    }

    // Keep going: the shortfall is charged to the first source.
    if let Some(first) = sources.first_mut() {
        first.liquidity -= needed;
    }
    Some(format!(
        "{} of {} not covered by allowed sources (short by {})",
        expense.name, expense.amount, needed
    ))
}

/// Takes up to `amount` from positive cash-source balances, in source order.
/// Returns what was taken.
fn drain_sources(sources: &mut [SourceState], amount: Decimal) -> Decimal {
    let mut taken = Decimal::ZERO;
    for source in sources.iter_mut() {
        let remaining = amount - taken;
        if remaining <= Decimal::ZERO {
            break;
        }
        let take = source.liquidity.max(Decimal::ZERO).min(remaining);
        source.liquidity -= take;
        taken += take;
    }
    taken
}

/// Takes up to `amount` from the accounts accepted by `eligible`, weighted by
/// their value. When they hold less than `amount` they are emptied. Returns
/// what was taken.
fn withdraw_pro_rata<F>(accounts: &mut [AccountState], amount: Decimal, eligible: F) -> Decimal
where
    F: Fn(&AccountState) -> bool,
{
    let pool = accounts
        .iter()
        .filter(|a| eligible(a))
        .fold(Decimal::ZERO, |sum, a| sum.saturating_add(a.value));
    if pool <= Decimal::ZERO || amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    if pool <= amount {
        for account in accounts.iter_mut().filter(|a| eligible(a)) {
            account.value = Decimal::ZERO;
        }
        return pool;
    }

    let share = safe_div(amount, pool);
    for account in accounts.iter_mut().filter(|a| eligible(a)) {
        account.value -= account.value * share;
    }
    amount
}

/// Invests a surplus across accounts by current weight. Returns a reason for
/// every account that had to be capped.
fn invest(
    accounts: &mut [AccountState],
    sources: &mut [SourceState],
    amount: Decimal,
) -> Vec<String> {
    if accounts.is_empty() {
        if let Some(first) = sources.first_mut() {
            first.liquidity = first.liquidity.saturating_add(amount);
        }
        return Vec::new();
    }

    let total = total_value(accounts);
    let each = amount / Decimal::from(accounts.len());
    let mut capped = Vec::new();
    for account in accounts.iter_mut() {
        let share = if total.is_zero() {
            each
        } else {
            amount * safe_div(account.value, total)
        };
        if !account.credit(share) {
            capped.push(account.overflow_reason());
        }
    }
    capped
}
