//! Transactions module - the append-only ledger that all holdings derive from.

mod transactions_model;


pub use transactions_model::{Direction, NewTransaction, Transaction};
