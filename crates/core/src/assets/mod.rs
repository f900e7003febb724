//! Assets module - static asset metadata and identifier normalisation.

mod assets_model;


pub use assets_model::{normalize_asset_id, AssetClass, AssetDefinition, PriceSource};
