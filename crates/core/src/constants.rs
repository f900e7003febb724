use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Percent scale used by targets and allocation reports
pub const ONE_HUNDRED: Decimal = dec!(100);

/// Months per simulated year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Decimal precision for reported ratios and percentages
pub const DECIMAL_PRECISION: u32 = 6;

/// Default capital-gains rate (percent) for Stock, Crypto and Commodity
pub const DEFAULT_EQUITY_TAX_RATE: Decimal = dec!(26);

/// Default capital-gains rate (percent) for Bond and Cash
pub const DEFAULT_BOND_TAX_RATE: Decimal = dec!(12.5);

/// Share of total value at which a withdrawal becomes a full liquidation
pub const DEFAULT_FULL_LIQUIDATION_RATIO: Decimal = dec!(0.99);

/// Iterations allowed on top of the total share count in the withdrawal loop
pub const DEFAULT_WITHDRAWAL_EXTRA_ITERATIONS: u64 = 1000;

/// Sub-class assumed for assets without a definition
pub const DEFAULT_ASSET_SUB_CLASS: &str = "International";

/// Store key the whole portfolio document is saved under
pub const DEFAULT_SNAPSHOT_KEY: &str = "portfolio";
