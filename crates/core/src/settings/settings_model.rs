//! Settings domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::AssetClass;
use crate::constants::{
    DEFAULT_ASSET_SUB_CLASS, DEFAULT_BOND_TAX_RATE, DEFAULT_EQUITY_TAX_RATE,
    DEFAULT_FULL_LIQUIDATION_RATIO, DEFAULT_WITHDRAWAL_EXTRA_ITERATIONS,
};
use crate::errors::{Result, ValidationError};
use crate::utils::weight_from_percent;
use crate::Error;

/// Capital-gains rates, as percentages of the realized gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxSettings {
    /// Applies to Stock, Crypto and Commodity
    pub equity_rate: Decimal,
    /// Applies to Bond and Cash
    pub bond_rate: Decimal,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            equity_rate: DEFAULT_EQUITY_TAX_RATE,
            bond_rate: DEFAULT_BOND_TAX_RATE,
        }
    }
}

impl TaxSettings {
    /// Rate for an asset class as a 0-1 fraction.
    pub fn rate_for(&self, class: AssetClass) -> Decimal {
        let percent = match class {
            AssetClass::Stock | AssetClass::Crypto | AssetClass::Commodity => self.equity_rate,
            AssetClass::Bond | AssetClass::Cash => self.bond_rate,
        };
        weight_from_percent(percent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawalSettings {
    /// Requests at or above this share of total value sell everything
    pub full_liquidation_ratio: Decimal,
    /// Iterations allowed on top of the total share count
    pub extra_iterations: u64,
}

impl Default for WithdrawalSettings {
    fn default() -> Self {
        Self {
            full_liquidation_ratio: DEFAULT_FULL_LIQUIDATION_RATIO,
            extra_iterations: DEFAULT_WITHDRAWAL_EXTRA_ITERATIONS,
        }
    }
}

/// All tunables used by the solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerSettings {
    pub tax: TaxSettings,
    pub withdrawal: WithdrawalSettings,
    pub default_asset_class: AssetClass,
    pub default_asset_sub_class: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            tax: TaxSettings::default(),
            withdrawal: WithdrawalSettings::default(),
            default_asset_class: AssetClass::Stock,
            default_asset_sub_class: DEFAULT_ASSET_SUB_CLASS.to_string(),
        }
    }
}

impl PlannerSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: PlannerSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |rate: Decimal| rate >= Decimal::ZERO && rate <= Decimal::ONE_HUNDRED;
        if !in_range(self.tax.equity_rate) || !in_range(self.tax.bond_rate) {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Tax rates must be between 0 and 100".to_string(),
            )));
        }
        if self.withdrawal.full_liquidation_ratio <= Decimal::ZERO
            || self.withdrawal.full_liquidation_ratio > Decimal::ONE
        {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Full liquidation ratio must be in (0, 1]".to_string(),
            )));
        }
        Ok(())
    }
}
