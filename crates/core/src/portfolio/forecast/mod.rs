//! Forecast module - month-by-month cash-flow simulation across accounts and
//! cash sources.

mod forecast_model;
mod forecast_simulator;


pub use forecast_model::{ForecastAccount, MonthlyResult, ScheduledExpense};
pub use forecast_simulator::simulate;
