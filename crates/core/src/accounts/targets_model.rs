//! Target allocation map.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::normalize_asset_id;
use crate::constants::ONE_HUNDRED;

/// Desired percentage (0-100) of account value per asset.
///
/// Percentages are kept exactly as entered. They need not add up to 100 and
/// are never normalised; each solver decides what to do with the slack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Decimal>",
    into = "BTreeMap<String, Decimal>"
)]
pub struct TargetAllocations(BTreeMap<String, Decimal>);

impl TargetAllocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target for an asset, replacing any previous value.
    pub fn set(&mut self, asset_id: &str, percent: Decimal) {
        self.0.insert(normalize_asset_id(asset_id), percent);
    }

    pub fn with(mut self, asset_id: &str, percent: Decimal) -> Self {
        self.set(asset_id, percent);
        self
    }

    /// Target for an asset, zero when it has none. Lookup ignores case.
    pub fn get(&self, asset_id: &str) -> Decimal {
        self.0
            .get(&normalize_asset_id(asset_id))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.0.contains_key(&normalize_asset_id(asset_id))
    }

    pub fn remove(&mut self, asset_id: &str) -> Option<Decimal> {
        self.0.remove(&normalize_asset_id(asset_id))
    }

    /// Iterates targets in asset-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.0.iter()
    }

    pub fn asset_ids(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum of all target percentages.
    pub fn total_percent(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// `100 - total`; negative when the targets are over-allocated.
    pub fn unallocated_percent(&self) -> Decimal {
        ONE_HUNDRED - self.total_percent()
    }
}

impl FromIterator<(String, Decimal)> for TargetAllocations {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut targets = TargetAllocations::new();
        for (asset_id, percent) in iter {
            targets.set(&asset_id, percent);
        }
        targets
    }
}

impl From<BTreeMap<String, Decimal>> for TargetAllocations {
    fn from(map: BTreeMap<String, Decimal>) -> Self {
        map.into_iter().collect()
    }
}

impl From<TargetAllocations> for BTreeMap<String, Decimal> {
    fn from(targets: TargetAllocations) -> Self {
        targets.0
    }
}
