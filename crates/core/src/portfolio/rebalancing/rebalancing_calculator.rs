//! Integer-share rebalancing against target allocations.
//!
//! Targets are used as given: they are never normalised to 100%, so a target
//! set summing to 90% leaves 10% of the total in cash and one summing to 110%
//! asks for more than the total.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::accounts::{Account, TargetAllocations};
use crate::assets::normalize_asset_id;
use crate::portfolio::holdings::Position;
use crate::portfolio::rebalancing::{
    AccountRebalancePlan, BuyOnlyAction, BuyOnlyPlan, RebalanceAction, RebalanceKind,
};
use crate::quotes::PriceMap;
use crate::utils::{safe_div, weight_from_percent};

/// Positions keyed by normalised asset id.
fn index_positions(positions: &[Position]) -> BTreeMap<String, &Position> {
    positions
        .iter()
        .map(|p| (normalize_asset_id(&p.asset_id), p))
        .collect()
}

/// Every asset that is either held or targeted, in id order.
fn universe(
    positions: &BTreeMap<String, &Position>,
    targets: &TargetAllocations,
) -> BTreeSet<String> {
    positions
        .keys()
        .cloned()
        .chain(targets.asset_ids().cloned())
        .collect()
}

/// Position price when it has one, otherwise the quote. Targeted assets that
/// are not held yet only have the quote.
fn resolve_price(asset_id: &str, position: Option<&&Position>, prices: &PriceMap) -> Decimal {
    if let Some(position) = position {
        if position.current_price > Decimal::ZERO {
            return position.current_price;
        }
    }
    prices
        .iter()
        .find(|(id, _)| normalize_asset_id(id) == asset_id)
        .map(|(_, price)| *price)
        .unwrap_or(Decimal::ZERO)
}

/// Buy and sell whole shares so every asset lands as close as possible to
/// `total_value × target%`.
///
/// Share counts round half away from zero: a delta of exactly 2.5 shares
/// buys 3, and -2.5 sells 3. Assets with neither a target nor a holding are
/// left out; assets without a usable price are reported as balanced.
pub fn plan_full_rebalance(
    positions: &[Position],
    targets: &TargetAllocations,
    total_value: Decimal,
    prices: &PriceMap,
) -> Vec<RebalanceAction> {
    let by_id = index_positions(positions);

    universe(&by_id, targets)
        .into_iter()
        .filter_map(|asset_id| {
            let position = by_id.get(&asset_id);
            let target_percent = targets.get(&asset_id);
            let quantity = position.map(|p| p.quantity).unwrap_or(Decimal::ZERO);
            if target_percent.is_zero() && quantity.is_zero() {
                return None;
            }

            let current_value = position.map(|p| p.current_value).unwrap_or(Decimal::ZERO);
            let target_value = total_value * weight_from_percent(target_percent);
            let price = resolve_price(&asset_id, position, prices);

            let shares = if price > Decimal::ZERO {
                safe_div(target_value - current_value, price)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            } else {
                warn!("No price for {}; leaving it out of the rebalance", asset_id);
                Decimal::ZERO
            };

            let kind = match shares.cmp(&Decimal::ZERO) {
                Ordering::Greater => RebalanceKind::Buy,
                Ordering::Less => RebalanceKind::Sell,
                Ordering::Equal => RebalanceKind::Balanced,
            };

            Some(RebalanceAction {
                asset_id,
                kind,
                target_percent,
                current_value,
                target_value,
                price,
                shares,
                amount: shares * price,
            })
        })
        .collect()
}

struct Candidate {
    asset_id: String,
    price: Decimal,
    shares: Decimal,
    remainder: Decimal,
}

/// Deploys `available_cash` into underweight assets without selling.
///
/// Gaps are measured against the total after the cash is added. The cash is
/// split across underweight assets in proportion to their gap, each share
/// count is floored, and the leftover is spent in a single pass, one extra
/// share per asset, largest fractional remainder first (ties by asset id).
pub fn plan_buy_only_rebalance(
    positions: &[Position],
    targets: &TargetAllocations,
    available_cash: Decimal,
    prices: &PriceMap,
) -> BuyOnlyPlan {
    if available_cash <= Decimal::ZERO {
        return BuyOnlyPlan {
            leftover_cash: available_cash.max(Decimal::ZERO),
            ..Default::default()
        };
    }

    let by_id = index_positions(positions);
    let current_total: Decimal = positions.iter().map(|p| p.current_value).sum();
    let new_total = current_total + available_cash;

    let gaps: Vec<(String, Decimal, Decimal)> = universe(&by_id, targets)
        .into_iter()
        .filter_map(|asset_id| {
            let position = by_id.get(&asset_id);
            let current_value = position.map(|p| p.current_value).unwrap_or(Decimal::ZERO);
            let gap = new_total * weight_from_percent(targets.get(&asset_id)) - current_value;
            let price = resolve_price(&asset_id, position, prices);
            if gap > Decimal::ZERO && price > Decimal::ZERO {
                Some((asset_id, gap, price))
            } else {
                None
            }
        })
        .collect();

    let total_gap: Decimal = gaps.iter().map(|(_, gap, _)| *gap).sum();
    if total_gap.is_zero() {
        debug!("Nothing underweight; keeping {} as cash", available_cash);
        return BuyOnlyPlan {
            leftover_cash: available_cash,
            ..Default::default()
        };
    }

    let mut remaining = available_cash;
    let mut candidates: Vec<Candidate> = gaps
        .into_iter()
        .map(|(asset_id, gap, price)| {
            let allocated = available_cash * safe_div(gap, total_gap);
            let raw_shares = safe_div(allocated, price);
            let shares = raw_shares.floor();
            remaining -= shares * price;
            Candidate {
                asset_id,
                price,
                shares,
                remainder: raw_shares - shares,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.remainder
            .cmp(&a.remainder)
            .then_with(|| a.asset_id.cmp(&b.asset_id))
    });
    for candidate in candidates.iter_mut() {
        if remaining >= candidate.price {
            candidate.shares += Decimal::ONE;
            remaining -= candidate.price;
        }
    }

    let mut actions: Vec<BuyOnlyAction> = candidates
        .into_iter()
        .filter(|c| c.shares > Decimal::ZERO)
        .map(|c| BuyOnlyAction {
            cash_spent: c.shares * c.price,
            asset_id: c.asset_id,
            price: c.price,
            shares: c.shares,
        })
        .collect();
    actions.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));

    let total_spent: Decimal = actions.iter().map(|a| a.cash_spent).sum();
    debug!(
        "Buy-only deploys {} of {} across {} assets",
        total_spent,
        available_cash,
        actions.len()
    );

    BuyOnlyPlan {
        actions,
        total_spent,
        leftover_cash: available_cash - total_spent,
    }
}

/// Smallest amount of new cash that lets every positively-targeted asset
/// reach its target by buying alone.
///
/// The binding asset is the one whose current value implies the largest
/// portfolio (`value / target`), since all targets share one denominator.
pub fn min_liquidity_for_full_buy_only_coverage(
    positions: &[Position],
    targets: &TargetAllocations,
) -> Decimal {
    let by_id = index_positions(positions);
    let current_total: Decimal = positions.iter().map(|p| p.current_value).sum();

    let implied_total = targets
        .iter()
        .filter(|(_, percent)| **percent > Decimal::ZERO)
        .map(|(asset_id, percent)| {
            let current_value = by_id
                .get(asset_id)
                .map(|p| p.current_value)
                .unwrap_or(Decimal::ZERO);
            safe_div(current_value, weight_from_percent(*percent))
        })
        .max()
        .unwrap_or(Decimal::ZERO);

    (implied_total - current_total).max(Decimal::ZERO)
}

/// Full rebalance, buy-only deployment of the cash reserve and required
/// liquidity for one account.
pub fn plan_account_rebalance(
    account: &Account,
    positions: &[Position],
    prices: &PriceMap,
) -> AccountRebalancePlan {
    let targets = &account.target_allocations;
    if targets.total_percent() != Decimal::ONE_HUNDRED {
        debug!(
            "Account {} targets sum to {}%; using them as given",
            account.id,
            targets.total_percent()
        );
    }

    let invested_value: Decimal = positions.iter().map(|p| p.current_value).sum();
    let total_value = invested_value + account.cash_reserve;

    AccountRebalancePlan {
        account_id: account.id.clone(),
        invested_value,
        cash_reserve: account.cash_reserve,
        full: plan_full_rebalance(positions, targets, total_value, prices),
        buy_only: plan_buy_only_rebalance(positions, targets, account.cash_reserve, prices),
        required_liquidity: min_liquidity_for_full_buy_only_coverage(positions, targets),
    }
}
