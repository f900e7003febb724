//! Asset domain models.

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

/// Canonical form of an asset identifier: trimmed and upper-cased, so that
/// "vwce", " VWCE" and "Vwce" all group together.
pub fn normalize_asset_id(asset_id: &str) -> String {
    asset_id.trim().to_uppercase()
}

/// Broad asset class. Drives tax rates and goal classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum AssetClass {
    #[default]
    Stock,
    Bond,
    Commodity,
    Crypto,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stock,
        AssetClass::Bond,
        AssetClass::Commodity,
        AssetClass::Crypto,
        AssetClass::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stock => "Stock",
            AssetClass::Bond => "Bond",
            AssetClass::Commodity => "Commodity",
            AssetClass::Crypto => "Crypto",
            AssetClass::Cash => "Cash",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" | "stocks" | "equity" => Ok(AssetClass::Stock),
            "bond" | "bonds" => Ok(AssetClass::Bond),
            "commodity" | "commodities" => Ok(AssetClass::Commodity),
            "crypto" => Ok(AssetClass::Crypto),
            "cash" => Ok(AssetClass::Cash),
            _ => Err(format!("Unknown asset class: {}", s)),
        }
    }
}

impl From<String> for AssetClass {
    /// Unknown classes fall back to `Stock`.
    fn from(value: String) -> Self {
        AssetClass::from_str(&value).unwrap_or_else(|e| {
            warn!("{}. Defaulting to {}.", e, AssetClass::default());
            AssetClass::default()
        })
    }
}

impl From<AssetClass> for String {
    fn from(value: AssetClass) -> Self {
        value.as_str().to_string()
    }
}

/// Where an asset's market price comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceSource {
    /// Looked up through the price proxy on every refresh
    #[default]
    Proxy,
    /// Never fetched; valued from quotes entered by hand or from cost
    Manual,
}

/// Static metadata for one asset, independent of any transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDefinition {
    pub asset_id: String,
    pub label: String,
    #[serde(default)]
    pub class: AssetClass,
    #[serde(default)]
    pub sub_class: String,
    #[serde(default)]
    pub price_source: PriceSource,
}

impl AssetDefinition {
    pub fn new(asset_id: &str, label: &str, class: AssetClass, sub_class: &str) -> Self {
        Self {
            asset_id: normalize_asset_id(asset_id),
            label: label.to_string(),
            class,
            sub_class: sub_class.to_string(),
            price_source: PriceSource::Proxy,
        }
    }
}
