//! Greedy sell-only withdrawal planning.
//!
//! Shares are sold one at a time from the asset that is most overweight
//! relative to its target (`remaining value / target weight`), so the
//! portfolio left behind stays as close to the targets as whole shares allow.
//! The loop stops on accumulated *net* proceeds, which keeps the tax inside
//! the termination check.

use log::{debug, warn};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::accounts::TargetAllocations;
use crate::portfolio::holdings::Position;
use crate::portfolio::withdrawal::{
    PostSaleAllocation, SaleProceeds, WithdrawalAction, WithdrawalPlan,
};
use crate::settings::{PlannerSettings, TaxSettings};
use crate::utils::{percent_of, safe_div, weight_from_percent};

/// Proceeds of selling `quantity` units of `position` at its current price.
///
/// Only a gain is taxed; a sale at a loss is taxed at zero.
pub fn sale_proceeds(position: &Position, quantity: Decimal, tax: &TaxSettings) -> SaleProceeds {
    let gross = quantity * position.current_price;
    let gain = (gross - quantity * position.average_cost).max(Decimal::ZERO);
    let tax = gain * tax.rate_for(position.class);
    SaleProceeds {
        gross,
        gain,
        tax,
        net: gross - tax,
    }
}

struct Holding<'a> {
    position: &'a Position,
    target_percent: Decimal,
    weight: Decimal,
    remaining: Decimal,
    sold: Decimal,
}

impl Holding<'_> {
    /// Untargeted assets outrank everything, larger value first.
    fn score(&self) -> (bool, Decimal) {
        let value = self.remaining * self.position.current_price;
        if self.weight.is_zero() {
            (true, value)
        } else {
            (false, safe_div(value, self.weight))
        }
    }
}

/// Plans a withdrawal of `net_needed` with the default settings.
pub fn plan_withdrawal(
    positions: &[Position],
    targets: &TargetAllocations,
    net_needed: Decimal,
) -> WithdrawalPlan {
    plan_withdrawal_with_settings(positions, targets, net_needed, &PlannerSettings::default())
}

pub fn plan_withdrawal_with_settings(
    positions: &[Position],
    targets: &TargetAllocations,
    net_needed: Decimal,
    settings: &PlannerSettings,
) -> WithdrawalPlan {
    if net_needed <= Decimal::ZERO {
        return build_plan(positions, targets, &[], net_needed, false, &settings.tax);
    }

    let mut holdings: Vec<Holding> = positions
        .iter()
        .filter(|p| p.quantity > Decimal::ZERO && p.current_price > Decimal::ZERO)
        .map(|position| {
            let target_percent = targets.get(&position.asset_id);
            Holding {
                position,
                target_percent,
                weight: weight_from_percent(target_percent),
                remaining: position.quantity,
                sold: Decimal::ZERO,
            }
        })
        .collect();
    holdings.sort_by(|a, b| a.position.asset_id.cmp(&b.position.asset_id));

    let sellable_value: Decimal = holdings
        .iter()
        .map(|h| h.remaining * h.position.current_price)
        .sum();
    let full_liquidation = sellable_value > Decimal::ZERO
        && net_needed >= sellable_value * settings.withdrawal.full_liquidation_ratio;

    if full_liquidation {
        debug!(
            "Withdrawal of {} is at least {} of {}; selling everything",
            net_needed, settings.withdrawal.full_liquidation_ratio, sellable_value
        );
        for holding in holdings.iter_mut() {
            holding.sold = holding.remaining;
            holding.remaining = Decimal::ZERO;
        }
    } else {
        sell_greedily(&mut holdings, net_needed, settings);
    }

    build_plan(positions, targets, &holdings, net_needed, full_liquidation, &settings.tax)
}

fn sell_greedily(holdings: &mut [Holding], net_needed: Decimal, settings: &PlannerSettings) {
    let total_shares: Decimal = holdings.iter().map(|h| h.remaining).sum();
    let max_iterations = total_shares
        .ceil()
        .to_u64()
        .unwrap_or(u64::MAX)
        .saturating_add(settings.withdrawal.extra_iterations);

    let mut net_total = Decimal::ZERO;
    let mut iterations: u64 = 0;

    while net_total < net_needed {
        if iterations >= max_iterations {
            warn!(
                "Withdrawal loop hit its bound of {} iterations with {} of {} raised",
                max_iterations, net_total, net_needed
            );
            break;
        }
        iterations += 1;

        let mut best: Option<usize> = None;
        for (index, holding) in holdings.iter().enumerate() {
            if holding.remaining <= Decimal::ZERO {
                continue;
            }
            let better = match best {
                Some(current) => holding.score() > holdings[current].score(),
                None => true,
            };
            if better {
                best = Some(index);
            }
        }
        let Some(index) = best else {
            break;
        };

        let holding = &mut holdings[index];
        let step = holding.remaining.min(Decimal::ONE);
        let proceeds = sale_proceeds(holding.position, step, &settings.tax);
        holding.remaining -= step;
        holding.sold += step;
        net_total += proceeds.net;
    }

    debug!(
        "Withdrawal loop ran {} iterations, raised {} net of {}",
        iterations, net_total, net_needed
    );
}

fn build_plan(
    positions: &[Position],
    targets: &TargetAllocations,
    holdings: &[Holding],
    net_needed: Decimal,
    full_liquidation: bool,
    tax: &TaxSettings,
) -> WithdrawalPlan {
    let portfolio_value: Decimal = positions.iter().map(|p| p.current_value).sum();

    let sales: Vec<(&Holding, SaleProceeds)> = holdings
        .iter()
        .filter(|h| h.sold > Decimal::ZERO)
        .map(|h| (h, sale_proceeds(h.position, h.sold, tax)))
        .collect();

    let gross_total: Decimal = sales.iter().map(|(_, p)| p.gross).sum();
    let tax_total: Decimal = sales.iter().map(|(_, p)| p.tax).sum();
    let net_total = gross_total - tax_total;
    let post_total = portfolio_value - gross_total;

    let actions = sales
        .into_iter()
        .map(|(holding, proceeds)| {
            let position = holding.position;
            let post_quantity = position.quantity - holding.sold;
            let post_value = post_quantity * position.current_price;
            WithdrawalAction {
                asset_id: position.asset_id.clone(),
                class: position.class,
                price: position.current_price,
                target_percent: holding.target_percent,
                shares_sold: holding.sold,
                gross: proceeds.gross,
                tax: proceeds.tax,
                net: proceeds.net,
                post_quantity,
                post_value,
                post_allocation_percent: percent_of(post_value, post_total),
            }
        })
        .collect();

    let mut post_allocations: Vec<PostSaleAllocation> = positions
        .iter()
        .map(|position| {
            let sold = holdings
                .iter()
                .find(|h| h.position.asset_id == position.asset_id)
                .map(|h| h.sold)
                .unwrap_or(Decimal::ZERO);
            let target_percent = targets.get(&position.asset_id);
            let post_value = (position.quantity - sold) * position.current_price;
            let post_allocation_percent = percent_of(post_value, post_total);
            PostSaleAllocation {
                asset_id: position.asset_id.clone(),
                target_percent,
                shares_sold: sold,
                post_value,
                post_allocation_percent,
                drift_percent: post_allocation_percent - target_percent,
            }
        })
        .collect();
    post_allocations.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));

    let fulfilled = net_total >= net_needed;
    if !fulfilled {
        warn!(
            "Withdrawal short by {}: raised {} net of {}",
            net_needed - net_total,
            net_total,
            net_needed
        );
    }

    WithdrawalPlan {
        net_needed,
        gross_total,
        net_total,
        tax_total,
        full_liquidation,
        fulfilled,
        shortfall: (net_needed - net_total).max(Decimal::ZERO),
        actions,
        post_allocations,
    }
}
