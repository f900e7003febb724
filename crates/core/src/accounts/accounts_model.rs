//! Account domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::TargetAllocations;
use crate::errors::{Result, ValidationError};
use crate::utils::{deserialize_decimal_lenient, weight_from_percent};
use crate::Error;

/// An investment account (portfolio) with its target allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub target_allocations: TargetAllocations,
    /// Uninvested cash held inside the account
    #[serde(default, deserialize_with = "deserialize_decimal_lenient")]
    pub cash_reserve: Decimal,
}

impl Account {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            target_allocations: TargetAllocations::new(),
            cash_reserve: Decimal::ZERO,
        }
    }

    /// Validates the account data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.cash_reserve.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Cash reserve cannot be negative".to_string(),
            )));
        }
        if let Some((asset_id, _)) = self
            .target_allocations
            .iter()
            .find(|(_, p)| p.is_sign_negative() || **p > Decimal::ONE_HUNDRED)
        {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Target for {} must be between 0 and 100",
                asset_id
            ))));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiquidityRuleType {
    /// Floor is a percentage of the total invested value
    Percent,
    /// Floor is an absolute amount
    #[default]
    Fixed,
}

/// Minimum balance a cash source should keep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRule {
    #[serde(rename = "type", default)]
    pub kind: LiquidityRuleType,
    #[serde(default, deserialize_with = "deserialize_decimal_lenient")]
    pub value: Decimal,
}

impl LiquidityRule {
    pub fn fixed(amount: Decimal) -> Self {
        Self {
            kind: LiquidityRuleType::Fixed,
            value: amount,
        }
    }

    pub fn percent(percent: Decimal) -> Self {
        Self {
            kind: LiquidityRuleType::Percent,
            value: percent,
        }
    }

    /// The floor amount, given the current total invested value. Never negative.
    pub fn floor(&self, total_invested: Decimal) -> Decimal {
        let floor = match self.kind {
            LiquidityRuleType::Fixed => self.value,
            LiquidityRuleType::Percent => {
                total_invested.saturating_mul(weight_from_percent(self.value))
            }
        };
        floor.max(Decimal::ZERO)
    }
}

/// A broker or bank balance that funds investments and absorbs cash flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSource {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_decimal_lenient")]
    pub current_liquidity: Decimal,
    #[serde(default)]
    pub min_liquidity_rule: LiquidityRule,
}

impl CashSource {
    pub fn new(id: &str, name: &str, current_liquidity: Decimal, rule: LiquidityRule) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            current_liquidity,
            min_liquidity_rule: rule,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        if self.min_liquidity_rule.value.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Liquidity rule value cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}
