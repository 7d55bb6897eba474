multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_errors::ERROR_WRONG_PAYMENT_TOKEN;

use crate::{ledger, market, oracle, rewards, risk, storage, validation};

use super::pool;

#[multiversx_sc::module]
pub trait DepositModule:
    storage::Storage
    + pool::PoolModule
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
    /// Supplies the payment to the underlying's market on the caller's behalf.
    ///
    /// The caller is credited the minted market shares minus the deposit fee, and
    /// receives `normalize(amount) * loan_to_value` of the pegged token.
    #[payable]
    #[endpoint(deposit)]
    fn deposit(&self, underlying: EgldOrEsdtTokenIdentifier) {
        self.require_not_paused();
        let (token, amount) = self.call_value().egld_or_single_fungible_esdt();
        require!(token == underlying, ERROR_WRONG_PAYMENT_TOKEN);
        self.require_amount_greater_than_zero(&amount);

        let config = self.require_market(&underlying);
        let caller = self.blockchain().get_caller();

        let mut pool = self.begin_pool_action(&underlying, &config, &amount);

        let mut entry = self.load_entry(&underlying, &caller, config.asset_decimals);
        self.settle_entry(&mut pool, &mut entry, true);

        let minted = self.market_supply(&underlying, &config, &amount);
        let fee = self
            .mul_down(&minted, &self.deposit_fee().get(), WAD_PRECISION)
            .rescale(config.asset_decimals);
        let credited = minted.clone() - fee.clone();
        self.add_shares(&mut pool, &mut entry, &credited);

        let principal_increase = self.mul_down(
            &self.normalize(&amount, config.asset_decimals),
            &self.loan_to_value().get(),
            WAD_PRECISION,
        );
        entry.principal += principal_increase.clone();
        self.store_entry(&underlying, &caller, &entry);

        // Loaded after the caller's entry is stored, the collector may be the caller.
        if !self.is_zero(&fee) {
            let collector = self.fee_collector().get();
            let mut collector_entry =
                self.load_entry(&underlying, &collector, config.asset_decimals);
            self.settle_entry(&mut pool, &mut collector_entry, true);
            self.add_shares(&mut pool, &mut collector_entry, &fee);
            self.store_entry(&underlying, &collector, &collector_entry);
        }

        let pegged_amount = principal_increase.into_raw_units().clone();
        if pegged_amount > 0 {
            self.send()
                .esdt_local_mint(&config.pegged_token, 0, &pegged_amount);
            self.tx()
                .to(&caller)
                .single_esdt(&config.pegged_token, 0, &pegged_amount)
                .transfer();
        }

        self.end_pool_action(&underlying, &config, &mut pool);
        self.deposit_event(&caller, &underlying, &amount, &credited, &pegged_amount);
    }
}
