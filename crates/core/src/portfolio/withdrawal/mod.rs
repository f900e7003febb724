//! Withdrawal module - tax-aware, sell-only planning of cash withdrawals.

mod withdrawal_model;
mod withdrawal_solver;


pub use withdrawal_model::{PostSaleAllocation, SaleProceeds, WithdrawalAction, WithdrawalPlan};
pub use withdrawal_solver::{plan_withdrawal, plan_withdrawal_with_settings, sale_proceeds};
