use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Full rebalance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebalanceKind {
    Buy,
    Sell,
    /// Within one share of the target, nothing to trade.
    Balanced,
}

/// Trade for one asset in a full rebalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceAction {
    pub asset_id: String,
    pub kind: RebalanceKind,
    pub target_percent: Decimal,
    pub current_value: Decimal,
    pub target_value: Decimal,
    pub price: Decimal,
    /// Whole shares to trade: positive buys, negative sells.
    pub shares: Decimal,
    /// `shares × price`, signed like `shares`.
    pub amount: Decimal,
}

// ============================================================================
// Buy-only deployment
// ============================================================================

/// Purchase for one underweight asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyOnlyAction {
    pub asset_id: String,
    pub price: Decimal,
    pub shares: Decimal,
    pub cash_spent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyOnlyPlan {
    /// Sorted by asset id; assets that end up with zero shares are omitted.
    pub actions: Vec<BuyOnlyAction>,
    pub total_spent: Decimal,
    /// Cash left undeployed after the largest-remainder pass.
    pub leftover_cash: Decimal,
}

// ============================================================================
// Per-account bundle
// ============================================================================

/// Everything the rebalancing view needs for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRebalancePlan {
    pub account_id: String,
    pub invested_value: Decimal,
    pub cash_reserve: Decimal,
    /// Full rebalance against `invested_value + cash_reserve`.
    pub full: Vec<RebalanceAction>,
    /// Deployment of `cash_reserve` without selling.
    pub buy_only: BuyOnlyPlan,
    /// Extra cash needed for buy-only to reach every positive target.
    pub required_liquidity: Decimal,
}
