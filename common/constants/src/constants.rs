#![no_std]

pub const WAD: u128 = 1_000_000_000_000_000_000; // 1.0 in Fixed18
pub const WAD_PRECISION: usize = 18;

pub const BPS_PRECISION: usize = 4; // 10_000 is 100%

/// Highest native precision an asset may have to be normalized into Fixed18
pub const MAX_ASSET_DECIMALS: usize = 18;

pub const SECONDS_PER_MINUTE: u64 = 60;

/// Offset used when asking the DEX for a time-weighted price (15 minutes)
pub const TWAP_OFFSET_SECONDS: u64 = SECONDS_PER_MINUTE * 15;

/// Flat deposit fee charged on minted market shares (0.50%)
pub const DEFAULT_DEPOSIT_FEE_BPS: usize = 50;

/// Ceiling for the deposit fee (10%)
pub const MAX_DEPOSIT_FEE_BPS: usize = 1_000;

/// Administrative ceiling on leverage iterations per call
pub const MAX_COMPOUND_DEPTH: usize = 20;

/// Redeem-and-repay iterations a withdrawal may spend unwinding leverage
pub const WITHDRAW_UNWIND_ITERATIONS: usize = 10;

/// Redeem-and-repay iterations a deleverage call may spend
pub const DELEVERAGE_ITERATIONS: usize = 5;

/// Redeem-and-repay iterations a full repayment may spend
pub const REPAY_ALL_ITERATIONS: usize = 15;

/// Hard cap for any configured loop limit
pub const MAX_LOOP_ITERATIONS: usize = 50;

/// Minimum USD value of a leverage step (500 USD, Fixed18)
pub const MIN_LEVERAGE_VALUE_USD: u128 = 500 * WAD;

/// Micro-leverage guard: an extra borrow within 5% of the current borrow is skipped
pub const MICRO_LEVERAGE_MARGIN_BPS: usize = 500;

/// Deleverage triggers above `markdown / 0.85`
pub const DELEVERAGE_TRIGGER_BPS: usize = 8_500;

/// Deleverage lands on `markdown * 0.95`
pub const DELEVERAGE_TARGET_BPS: usize = 9_500;

/// Unwinding redeems against `collateral_factor * 0.95`
pub const UNWIND_SAFETY_BPS: usize = 9_500;

/// Maximum incentive paid to whoever triggers a staking compound (5%)
pub const MAX_CALLER_INCENTIVE_BPS: usize = 500;

pub const DEFAULT_CALLER_INCENTIVE_BPS: usize = 100;
