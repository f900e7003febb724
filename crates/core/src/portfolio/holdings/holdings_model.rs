use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::{normalize_asset_id, AssetClass};
use crate::constants::DEFAULT_ASSET_SUB_CLASS;
use crate::goals::{classify, Goal};
use crate::utils::percent_of;

/// Current holding of one asset, derived from the ledger and a price.
///
/// Never persisted: recomputed from the transactions on every query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub asset_id: String,
    pub label: String,
    pub class: AssetClass,
    pub sub_class: String,
    pub goal: Goal,
    /// May be negative when the ledger oversells an asset.
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub current_price: Decimal,
    /// `quantity × current_price`
    pub current_value: Decimal,
    /// `quantity × average_cost`
    pub cost_basis: Decimal,
    /// `current_value − cost_basis`
    pub unrealized_gain: Decimal,
    /// Gain relative to cost basis (0-100 scale), zero when cost basis is zero.
    pub unrealized_gain_percent: Decimal,
}

impl Position {
    /// Builds a valued position with the default classification. Mostly useful
    /// for feeding the planners directly without going through the ledger.
    pub fn new(
        asset_id: &str,
        quantity: Decimal,
        average_cost: Decimal,
        current_price: Decimal,
    ) -> Self {
        let asset_id = normalize_asset_id(asset_id);
        let mut position = Position {
            label: asset_id.clone(),
            asset_id,
            class: AssetClass::Stock,
            sub_class: DEFAULT_ASSET_SUB_CLASS.to_string(),
            goal: Goal::Growth,
            quantity,
            average_cost,
            current_price,
            current_value: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
            unrealized_gain: Decimal::ZERO,
            unrealized_gain_percent: Decimal::ZERO,
        };
        position.revalue();
        position
    }

    /// Reclassifies the position; the goal follows the class.
    pub fn with_class(mut self, class: AssetClass, sub_class: &str) -> Self {
        self.class = class;
        self.sub_class = sub_class.to_string();
        self.goal = classify(class, sub_class);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Recomputes the derived value fields from quantity, cost and price.
    pub fn revalue(&mut self) {
        self.current_value = self.quantity * self.current_price;
        self.cost_basis = self.quantity * self.average_cost;
        self.unrealized_gain = self.current_value - self.cost_basis;
        self.unrealized_gain_percent = percent_of(self.unrealized_gain, self.cost_basis);
    }
}

/// Value held in one asset class and its share of the total.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassAllocation {
    pub class: AssetClass,
    pub value: Decimal,
    /// Percentage of total value (0-100)
    pub percentage: Decimal,
}

/// Totals across a set of positions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_gain: Decimal,
    /// Zero when total cost is zero.
    pub total_gain_percent: Decimal,
    /// One entry per asset class present, in class order.
    pub class_allocations: Vec<ClassAllocation>,
}

/// Output of the aggregator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Holdings {
    /// Sorted by asset id.
    pub positions: Vec<Position>,
    pub summary: PortfolioSummary,
}

impl Holdings {
    pub fn position(&self, asset_id: &str) -> Option<&Position> {
        let asset_id = normalize_asset_id(asset_id);
        self.positions.iter().find(|p| p.asset_id == asset_id)
    }
}
