//! Planner settings - tax rates, withdrawal tuning and classification defaults.

mod settings_model;


pub use settings_model::{PlannerSettings, TaxSettings, WithdrawalSettings};
