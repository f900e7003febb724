//! The persisted portfolio document.

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::{Account, CashSource};
use crate::assets::{normalize_asset_id, AssetDefinition, PriceSource};
use crate::errors::{Result, ValidationError};
use crate::portfolio::allocation::{account_values, AccountValue};
use crate::portfolio::forecast::ForecastAccount;
use crate::portfolio::holdings::{aggregate, aggregate_account, Holdings};
use crate::portfolio::rebalancing::{plan_account_rebalance, AccountRebalancePlan};
use crate::quotes::PriceMap;
use crate::transactions::{NewTransaction, Transaction};
use crate::Error;

/// Everything the planner persists, stored and loaded as one document.
///
/// Positions and summaries are never stored: they are derived from the
/// ledger on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioSnapshot {
    pub transactions: Vec<Transaction>,
    pub asset_definitions: Vec<AssetDefinition>,
    pub accounts: Vec<Account>,
    pub cash_sources: Vec<CashSource>,
    pub prices: PriceMap,
}

impl PortfolioSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Appends a batch of transactions. The batch is rejected as a whole if
    /// any entry lacks an asset id. Returns the ids of the new entries.
    pub fn add_transactions(&mut self, batch: Vec<NewTransaction>) -> Result<Vec<String>> {
        let transactions = batch
            .into_iter()
            .map(NewTransaction::into_transaction)
            .collect::<Result<Vec<_>>>()?;
        let ids = transactions.iter().map(|t| t.id.clone()).collect();
        debug!("Appending {} transactions", transactions.len());
        self.transactions.extend(transactions);
        Ok(ids)
    }

    /// Removes a transaction. Returns whether it existed.
    pub fn delete_transaction(&mut self, transaction_id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != transaction_id);
        before != self.transactions.len()
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    pub fn upsert_account(&mut self, account: Account) -> Result<()> {
        account.validate()?;
        match self.accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account,
            None => self.accounts.push(account),
        }
        Ok(())
    }

    /// Removes an account. Its transactions stay in the ledger, unlinked.
    pub fn delete_account(&mut self, account_id: &str) -> bool {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != account_id);
        if before == self.accounts.len() {
            return false;
        }
        let mut unlinked = 0;
        for transaction in self.transactions.iter_mut() {
            if transaction.account_id.as_deref() == Some(account_id) {
                transaction.account_id = None;
                unlinked += 1;
            }
        }
        debug!("Deleted account {}, unlinked {} transactions", account_id, unlinked);
        true
    }

    pub fn upsert_cash_source(&mut self, source: CashSource) -> Result<()> {
        source.validate()?;
        match self.cash_sources.iter_mut().find(|s| s.id == source.id) {
            Some(existing) => *existing = source,
            None => self.cash_sources.push(source),
        }
        Ok(())
    }

    /// Removes a cash source and clears it from any transaction that
    /// referenced it.
    pub fn delete_cash_source(&mut self, source_id: &str) -> bool {
        let before = self.cash_sources.len();
        self.cash_sources.retain(|s| s.id != source_id);
        if before == self.cash_sources.len() {
            return false;
        }
        for transaction in self.transactions.iter_mut() {
            if transaction.cash_source_id.as_deref() == Some(source_id) {
                transaction.cash_source_id = None;
            }
        }
        true
    }

    pub fn upsert_asset_definition(&mut self, mut definition: AssetDefinition) -> Result<()> {
        definition.asset_id = normalize_asset_id(&definition.asset_id);
        if definition.asset_id.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "assetId".to_string(),
            )));
        }
        match self
            .asset_definitions
            .iter_mut()
            .find(|d| normalize_asset_id(&d.asset_id) == definition.asset_id)
        {
            Some(existing) => *existing = definition,
            None => self.asset_definitions.push(definition),
        }
        Ok(())
    }

    /// Merges fresh prices into the stored price map. Non-positive prices are
    /// skipped. Returns how many prices were stored.
    pub fn apply_quotes(&mut self, quotes: &PriceMap) -> usize {
        let mut applied = 0;
        for (asset_id, price) in quotes {
            if *price <= Decimal::ZERO {
                warn!("Skipping non-positive price {} for {}", price, asset_id);
                continue;
            }
            self.prices.insert(normalize_asset_id(asset_id), *price);
            applied += 1;
        }
        applied
    }

    // =========================================================================
    // Derivations
    // =========================================================================

    pub fn aggregate(&self) -> Holdings {
        aggregate(&self.transactions, &self.asset_definitions, &self.prices)
    }

    pub fn aggregate_account(&self, account_id: &str) -> Holdings {
        aggregate_account(
            &self.transactions,
            account_id,
            &self.asset_definitions,
            &self.prices,
        )
    }

    pub fn account_values(&self) -> Vec<AccountValue> {
        account_values(
            &self.transactions,
            &self.accounts,
            &self.asset_definitions,
            &self.prices,
        )
    }

    /// Starting accounts for a forecast, valued from the ledger.
    pub fn forecast_accounts(&self) -> Vec<ForecastAccount> {
        self.account_values()
            .iter()
            .map(ForecastAccount::from)
            .collect()
    }

    /// Rebalance bundle for one account, or `None` if it does not exist.
    pub fn rebalance_account(&self, account_id: &str) -> Option<AccountRebalancePlan> {
        let account = self.accounts.iter().find(|a| a.id == account_id)?;
        let holdings = self.aggregate_account(account_id);
        Some(plan_account_rebalance(
            account,
            &holdings.positions,
            &self.prices,
        ))
    }

    /// Asset ids whose price should be refreshed: everything in the ledger or
    /// targeted by an account, minus manually priced assets.
    pub fn quoted_asset_ids(&self) -> Vec<String> {
        let manual: Vec<String> = self
            .asset_definitions
            .iter()
            .filter(|d| d.price_source == PriceSource::Manual)
            .map(|d| normalize_asset_id(&d.asset_id))
            .collect();

        let mut ids: Vec<String> = self
            .transactions
            .iter()
            .map(|t| normalize_asset_id(&t.asset_id))
            .chain(
                self.accounts
                    .iter()
                    .flat_map(|a| a.target_allocations.asset_ids().cloned()),
            )
            .filter(|id| !id.is_empty() && !manual.contains(id))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
