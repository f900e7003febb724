//! Goals domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Purpose bucket an asset serves in the overall plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Goal {
    Growth,
    Protection,
    Security,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Growth, Goal::Protection, Goal::Security];
}

/// Value held towards one goal and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAllocation {
    pub goal: Goal,
    pub value: Decimal,
    /// Percentage of total value (0-100)
    pub percentage: Decimal,
}
