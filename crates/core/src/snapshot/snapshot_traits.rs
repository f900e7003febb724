use async_trait::async_trait;

use super::snapshot_model::PortfolioSnapshot;
use crate::errors::Result;

/// Key-value persistence of whole snapshots.
///
/// Writes always replace the full document stored under a key; there are no
/// partial updates.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Loads the snapshot stored under `key`, or `None` if there is none.
    fn load(&self, key: &str) -> Result<Option<PortfolioSnapshot>>;

    /// Replaces the snapshot stored under `key`.
    async fn save(&self, key: &str, snapshot: &PortfolioSnapshot) -> Result<()>;

    /// Removes the snapshot stored under `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
