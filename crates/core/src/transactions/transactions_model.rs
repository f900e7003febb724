//! Transaction domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assets::normalize_asset_id;
use crate::errors::{Result, ValidationError};
use crate::utils::{decimal_from_value, deserialize_decimal_lenient};
use crate::Error;

/// Side of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Direction::Buy),
            "SELL" => Ok(Direction::Sell),
            _ => Err(format!("Unknown transaction direction: {}", s)),
        }
    }
}

/// One ledger entry. Only its account and cash-source links ever change,
/// when the referenced record is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub asset_id: String,
    #[serde(deserialize_with = "deserialize_decimal_lenient")]
    pub quantity: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_lenient")]
    pub unit_price: Decimal,
    pub date: NaiveDate,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_source_id: Option<String>,
}

impl Transaction {
    /// Cash value of the transaction (`quantity × unit_price`).
    pub fn amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// Whether the transaction belongs to the given account (case-sensitive id match).
    pub fn is_in_account(&self, account_id: &str) -> bool {
        self.account_id.as_deref() == Some(account_id)
    }
}

/// Input model for recording a transaction, as produced by forms and imports.
///
/// Numeric fields are kept as raw JSON values so a malformed cell becomes a
/// zero instead of rejecting the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub asset_id: String,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub unit_price: Value,
    pub date: Option<NaiveDate>,
    pub direction: Direction,
    pub account_id: Option<String>,
    pub cash_source_id: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.asset_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "assetId".to_string(),
            )));
        }
        Ok(())
    }

    /// Converts the input into a ledger entry, coercing malformed numbers to
    /// zero and generating an id when none was supplied.
    pub fn into_transaction(self) -> Result<Transaction> {
        self.validate()?;
        let quantity = decimal_from_value(&self.quantity, "quantity");
        let unit_price = decimal_from_value(&self.unit_price, "unitPrice");
        Ok(Transaction {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::now_v7().to_string()),
            asset_id: normalize_asset_id(&self.asset_id),
            quantity,
            unit_price,
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            direction: self.direction,
            account_id: self.account_id.filter(|id| !id.trim().is_empty()),
            cash_source_id: self.cash_source_id.filter(|id| !id.trim().is_empty()),
        })
    }
}
