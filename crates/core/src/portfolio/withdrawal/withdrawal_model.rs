use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::AssetClass;

/// Cash raised by selling some quantity of one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleProceeds {
    pub gross: Decimal,
    /// Realized gain, floored at zero. Losses never offset gains.
    pub gain: Decimal,
    pub tax: Decimal,
    /// `gross − tax`
    pub net: Decimal,
}

/// Sale of one asset within a withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalAction {
    pub asset_id: String,
    pub class: AssetClass,
    pub price: Decimal,
    pub target_percent: Decimal,
    pub shares_sold: Decimal,
    pub gross: Decimal,
    pub tax: Decimal,
    pub net: Decimal,
    pub post_quantity: Decimal,
    pub post_value: Decimal,
    /// Share of the post-sale portfolio (0-100)
    pub post_allocation_percent: Decimal,
}

/// Where one held asset ends up once the withdrawal is applied, sold or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSaleAllocation {
    pub asset_id: String,
    pub target_percent: Decimal,
    pub shares_sold: Decimal,
    pub post_value: Decimal,
    pub post_allocation_percent: Decimal,
    /// `post_allocation_percent − target_percent`
    pub drift_percent: Decimal,
}

/// Result of a withdrawal request.
///
/// A request that cannot be met is not an error: compare `net_total` with
/// `net_needed`, or check `fulfilled`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalPlan {
    pub net_needed: Decimal,
    pub gross_total: Decimal,
    pub net_total: Decimal,
    pub tax_total: Decimal,
    /// True when the request was large enough to sell everything.
    pub full_liquidation: bool,
    pub fulfilled: bool,
    /// `net_needed − net_total`, floored at zero.
    pub shortfall: Decimal,
    /// Assets with at least one share sold, sorted by asset id.
    pub actions: Vec<WithdrawalAction>,
    /// Every held asset after the sale, sorted by asset id.
    #[serde(default)]
    pub post_allocations: Vec<PostSaleAllocation>,
}
