//! Folds the transaction ledger into positions.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::assets::{normalize_asset_id, AssetDefinition};
use crate::goals::classify;
use crate::portfolio::holdings::{ClassAllocation, Holdings, PortfolioSummary, Position};
use crate::quotes::PriceMap;
use crate::settings::PlannerSettings;
use crate::transactions::{Direction, Transaction};
use crate::utils::{percent_of, safe_div};

/// Running state of one asset while replaying its transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingState {
    pub quantity: Decimal,
    pub average_cost: Decimal,
    /// Book cost of the current quantity. Kept alongside the average so a
    /// run of buys divides once instead of compounding rounding.
    pub total_cost: Decimal,
    /// Price of the most recent transaction, used when no quote exists.
    pub last_price: Option<Decimal>,
}

impl HoldingState {
    /// Applies one transaction.
    ///
    /// Buys move the weighted-average cost; sells only reduce quantity. A
    /// quantity that lands exactly on zero resets the cost to zero.
    pub fn apply(&mut self, transaction: &Transaction) {
        let quantity = transaction.quantity;
        let price = transaction.unit_price;

        match transaction.direction {
            Direction::Buy => {
                self.total_cost += quantity * price;
                self.quantity += quantity;
                if self.quantity.is_zero() {
                    self.total_cost = Decimal::ZERO;
                    self.average_cost = Decimal::ZERO;
                } else {
                    self.average_cost = safe_div(self.total_cost, self.quantity);
                }
            }
            Direction::Sell => {
                self.quantity -= quantity;
                if self.quantity.is_zero() {
                    self.average_cost = Decimal::ZERO;
                    self.total_cost = Decimal::ZERO;
                } else {
                    if self.quantity.is_sign_negative() {
                        warn!(
                            "Transaction {} oversells {}: quantity is now {}",
                            transaction.id, transaction.asset_id, self.quantity
                        );
                    }
                    self.total_cost = self.quantity * self.average_cost;
                }
            }
        }

        if price > Decimal::ZERO {
            self.last_price = Some(price);
        }
    }
}

/// Replays the ledger into one state per (normalised) asset id, applying each
/// asset's transactions in list order.
pub fn replay_transactions(transactions: &[Transaction]) -> BTreeMap<String, HoldingState> {
    let mut states: BTreeMap<String, HoldingState> = BTreeMap::new();
    for transaction in transactions {
        states
            .entry(normalize_asset_id(&transaction.asset_id))
            .or_default()
            .apply(transaction);
    }
    states
}

/// Aggregates the whole ledger into valued positions and a summary.
pub fn aggregate(
    transactions: &[Transaction],
    definitions: &[AssetDefinition],
    prices: &PriceMap,
) -> Holdings {
    aggregate_with_settings(transactions, definitions, prices, &PlannerSettings::default())
}

/// Aggregates only the transactions linked to one account.
pub fn aggregate_account(
    transactions: &[Transaction],
    account_id: &str,
    definitions: &[AssetDefinition],
    prices: &PriceMap,
) -> Holdings {
    let account_transactions: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_in_account(account_id))
        .cloned()
        .collect();
    aggregate(&account_transactions, definitions, prices)
}

pub fn aggregate_with_settings(
    transactions: &[Transaction],
    definitions: &[AssetDefinition],
    prices: &PriceMap,
    settings: &PlannerSettings,
) -> Holdings {
    let definitions_by_id: HashMap<String, &AssetDefinition> = definitions
        .iter()
        .map(|d| (normalize_asset_id(&d.asset_id), d))
        .collect();
    let prices_by_id: HashMap<String, Decimal> = prices
        .iter()
        .map(|(id, price)| (normalize_asset_id(id), *price))
        .collect();

    let states = replay_transactions(transactions);
    debug!(
        "Aggregating {} transactions into {} positions",
        transactions.len(),
        states.len()
    );

    let positions: Vec<Position> = states
        .into_iter()
        .map(|(asset_id, state)| {
            let (label, class, sub_class) = match definitions_by_id.get(&asset_id) {
                Some(def) => (def.label.clone(), def.class, def.sub_class.clone()),
                None => (
                    asset_id.clone(),
                    settings.default_asset_class,
                    settings.default_asset_sub_class.clone(),
                ),
            };
            let current_price = effective_price(&asset_id, &state, &prices_by_id);

            let mut position = Position {
                label,
                goal: classify(class, &sub_class),
                class,
                sub_class,
                quantity: state.quantity,
                average_cost: state.average_cost,
                current_price,
                current_value: Decimal::ZERO,
                cost_basis: Decimal::ZERO,
                unrealized_gain: Decimal::ZERO,
                unrealized_gain_percent: Decimal::ZERO,
                asset_id,
            };
            position.revalue();
            position
        })
        .collect();

    let summary = summarize(&positions);
    Holdings { positions, summary }
}

/// Quote if there is a usable one, otherwise the last transaction price,
/// otherwise the average cost.
fn effective_price(
    asset_id: &str,
    state: &HoldingState,
    prices: &HashMap<String, Decimal>,
) -> Decimal {
    match prices.get(asset_id) {
        Some(price) if *price > Decimal::ZERO => *price,
        Some(price) => {
            warn!(
                "Ignoring non-positive quote {} for {}; falling back",
                price, asset_id
            );
            state.last_price.unwrap_or(state.average_cost)
        }
        None => state.last_price.unwrap_or(state.average_cost),
    }
}

/// Totals and per-class allocation for a set of positions.
pub fn summarize(positions: &[Position]) -> PortfolioSummary {
    let total_value: Decimal = positions.iter().map(|p| p.current_value).sum();
    let total_cost: Decimal = positions.iter().map(|p| p.cost_basis).sum();
    let total_gain = total_value - total_cost;

    let mut by_class: BTreeMap<_, Decimal> = BTreeMap::new();
    for position in positions {
        *by_class.entry(position.class).or_insert(Decimal::ZERO) += position.current_value;
    }

    let class_allocations = by_class
        .into_iter()
        .map(|(class, value)| ClassAllocation {
            class,
            value,
            percentage: percent_of(value, total_value),
        })
        .collect();

    PortfolioSummary {
        total_value,
        total_cost,
        total_gain,
        total_gain_percent: percent_of(total_gain, total_cost),
        class_allocations,
    }
}
