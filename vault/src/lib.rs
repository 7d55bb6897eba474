#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

pub mod cache;
pub mod config;
pub mod ledger;
pub mod market;
pub mod oracle;
pub mod positions;
pub mod rewards;
pub mod risk;
pub mod storage;
pub mod validation;
pub mod views;

use common_constants::{DEFAULT_DEPOSIT_FEE_BPS, MAX_COMPOUND_DEPTH, MIN_LEVERAGE_VALUE_USD};
pub use common_errors::*;
pub use common_proxies::*;
pub use common_structs::*;

/// Leveraged yield vault over a set of lending markets.
///
/// Deposits are pooled per underlying and supplied to that underlying's market. The
/// pool then borrows and re-supplies the same asset under a safety margin, and keeps
/// every depositor's pro-rata claim in a per-share ledger that absorbs compounded
/// market rewards and losses.
#[multiversx_sc::contract]
pub trait Vault:
    positions::deposit::DepositModule
    + positions::withdraw::WithdrawModule
    + positions::leverage::LeverageModule
    + positions::pool::PoolModule
    + config::ConfigModule
    + views::ViewsModule
    + storage::Storage
    + market::MarketModule
    + oracle::OracleModule
    + rewards::RewardsModule
    + risk::RiskModule
    + ledger::LedgerModule
    + validation::ValidationModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
    + common_rates::InterestRates
    + multiversx_sc_modules::pause::PauseModule
{
    /// # Arguments
    /// - `limit_fraction`: share of the collateral factor the vault may use, WAD, in (0, 1).
    /// - `compound_depth`: leverage iterations per call.
    /// - `loan_to_value`: pegged tokens minted per normalized unit deposited, WAD, in (0, 1].
    /// - `fee_collector`: ledger account credited with the deposit fee.
    #[init]
    fn init(
        &self,
        limit_fraction: BigUint,
        compound_depth: usize,
        loan_to_value: BigUint,
        fee_collector: ManagedAddress,
    ) {
        let limit_fraction = self.to_decimal_wad(limit_fraction);
        self.require_valid_limit_fraction(&limit_fraction);
        require!(
            compound_depth <= MAX_COMPOUND_DEPTH,
            ERROR_COMPOUND_DEPTH_TOO_HIGH
        );
        let loan_to_value = self.to_decimal_wad(loan_to_value);
        require!(
            !self.is_zero(&loan_to_value) && loan_to_value <= self.wad(),
            ERROR_INVALID_LOAN_TO_VALUE
        );
        self.require_non_zero_address(&fee_collector);

        self.limit_fraction().set(limit_fraction);
        self.compound_depth().set(compound_depth);
        self.loan_to_value().set(loan_to_value);
        self.fee_collector().set(fee_collector);

        self.deposit_fee()
            .set(self.to_decimal_bps(BigUint::from(DEFAULT_DEPOSIT_FEE_BPS)));
        self.loop_limits().set(LoopLimits::default());
        self.min_leverage_value()
            .set(self.to_decimal_wad(BigUint::from(MIN_LEVERAGE_VALUE_USD)));
    }

    #[upgrade]
    fn upgrade(&self) {}
}
