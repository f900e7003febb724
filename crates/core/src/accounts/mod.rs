//! Accounts module - portfolios with their targets, and the cash sources that
//! fund them.

mod accounts_model;
mod targets_model;


pub use accounts_model::{Account, CashSource, LiquidityRule, LiquidityRuleType};
pub use targets_model::TargetAllocations;
