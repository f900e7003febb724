//! Snapshot module - the whole persisted document and the storage seam it is
//! loaded from and saved to.

mod snapshot_model;
mod snapshot_traits;


pub use snapshot_model::PortfolioSnapshot;
pub use snapshot_traits::SnapshotRepositoryTrait;
