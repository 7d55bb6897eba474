multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_errors::ERROR_ARITHMETIC_INVARIANT;
use common_structs::{MarketConfig, PoolState, PositionLedgerEntry};

use crate::{ledger, market, oracle, rewards, risk, storage, validation};

/// Bracket shared by every action that touches the pooled ledger.
///
/// `begin_pool_action` runs, in this exact order: lock, market accrual, reward
/// compounding, loss recording. Only then may the caller settle and mutate entries.
/// `end_pool_action` refreshes the loss snapshot, persists the pool and unlocks it.
#[multiversx_sc::module]
pub trait PoolModule:
    storage::Storage
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
{
    fn begin_pool_action(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        incoming: &BigUint,
    ) -> PoolState<Self::Api> {
        self.lock_pool(underlying);
        self.market_accrue(config);

        let mut pool = self.pool_state(underlying).get();
        let compounded = self.compound_rewards(underlying, config, &mut pool);
        self.record_loss(underlying, config, &mut pool, &compounded, incoming);

        pool
    }

    fn end_pool_action(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        pool: &mut PoolState<Self::Api>,
    ) {
        pool.last_known_free_underlying =
            self.free_underlying(underlying, config, &BigUint::zero());
        self.pool_state(underlying).set(&*pool);
        self.update_pool_event(underlying, pool);
        self.unlock_pool(underlying);
    }

    /// Converts a drop of the free balance since the last action into a loss index
    /// increase. Underlying compounded during this call does not mask a loss.
    fn record_loss(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        pool: &mut PoolState<Self::Api>,
        compounded: &ManagedDecimal<Self::Api, NumDecimals>,
        incoming: &BigUint,
    ) {
        if !pool.has_free_shares() {
            return;
        }

        let live = self.free_underlying(underlying, config, incoming);
        let comparable = self.sub_or_zero(&live, compounded);
        if comparable >= pool.last_known_free_underlying {
            return;
        }

        let loss = pool.last_known_free_underlying.clone() - comparable;
        let exchange_rate = self.current_exchange_rate(&self.market_snapshot(config));
        require!(!self.is_zero(&exchange_rate), ERROR_ARITHMETIC_INVARIANT);

        let loss_shares = self
            .div_down(&loss, &exchange_rate, WAD_PRECISION)
            .rescale(config.asset_decimals);
        self.distribute_loss(pool, &loss_shares);
        self.loss_recorded_event(underlying, &loss, &pool.total_loss_index);
    }

    /// `supply - borrow + idle` of the vault in the market, at the asset's decimals.
    /// `excluded_idle` is underlying that arrived with the current call.
    fn free_underlying(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        excluded_idle: &BigUint,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let snapshot = self.market_snapshot(config);
        let supply = self.current_supply(&snapshot);
        let borrow = self.current_borrow(&snapshot);

        let balance = self.blockchain().get_sc_balance(underlying, 0);
        let idle_raw = if &balance > excluded_idle {
            balance - excluded_idle
        } else {
            BigUint::zero()
        };
        let idle = self.normalize(&idle_raw, config.asset_decimals);

        let free = self.sub_or_zero(&(supply + idle), &borrow);
        self.denormalize(&free, config.asset_decimals)
    }

    fn load_entry(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        account: &ManagedAddress,
        asset_decimals: usize,
    ) -> PositionLedgerEntry<Self::Api> {
        let mapper = self.ledger(underlying, account);
        if mapper.is_empty() {
            return PositionLedgerEntry::new(asset_decimals);
        }
        mapper.get()
    }

    fn store_entry(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        account: &ManagedAddress,
        entry: &PositionLedgerEntry<Self::Api>,
    ) {
        self.ledger(underlying, account).set(entry);
        self.update_ledger_event(underlying, account, entry);
    }
}
