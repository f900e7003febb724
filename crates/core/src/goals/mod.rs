//! Goals module - financial-goal buckets and the asset-to-goal classifier.

mod goal_classifier;
mod goals_model;


pub use goal_classifier::{classify, classify_definition};
pub use goals_model::{Goal, GoalAllocation};
