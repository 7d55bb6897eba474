multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_errors::{ERROR_INSUFFICIENT_LIQUIDITY, ERROR_NOT_PAUSED};
use common_structs::MarketConfig;

use crate::{cache::Cache, market, oracle, risk, storage, validation};

#[multiversx_sc::module]
pub trait LeverageModule:
    storage::Storage
    + market::MarketModule
    + oracle::OracleModule
    + risk::RiskModule
    + validation::ValidationModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
    + common_rates::InterestRates
    + multiversx_sc_modules::pause::PauseModule
{
    /// Borrows and re-supplies the underlying up to `compound_depth` times, as long as
    /// every step stays under the safe ratio and is worth at least `min_leverage_value`.
    #[endpoint(leverage)]
    fn leverage(&self, underlying: EgldOrEsdtTokenIdentifier) {
        self.require_not_paused();
        let config = self.require_market(&underlying);
        let mut cache = Cache::new(self);

        self.leverage_market(&underlying, &config, &mut cache);
    }

    #[endpoint(leverageAll)]
    fn leverage_all(&self) {
        self.require_not_paused();
        let mut cache = Cache::new(self);

        for underlying in self.markets().iter() {
            let config = self.market_config(&underlying).get();
            self.leverage_market(&underlying, &config, &mut cache);
        }
    }

    /// Redeems and repays until the position is back under the deleverage trigger.
    /// Fails when the iteration cap is reached first.
    #[endpoint(deleverage)]
    fn deleverage(&self, underlying: EgldOrEsdtTokenIdentifier) {
        let config = self.require_market(&underlying);
        self.deleverage_market(&underlying, &config);
    }

    #[endpoint(deleverageAll)]
    fn deleverage_all(&self) {
        for underlying in self.markets().iter() {
            let config = self.market_config(&underlying).get();
            self.deleverage_market(&underlying, &config);
        }
    }

    /// Clears the whole borrow of a market, then supplies back whatever underlying the
    /// vault holds. Owner only, while paused.
    #[only_owner]
    #[endpoint(repayAll)]
    fn repay_all(&self, underlying: EgldOrEsdtTokenIdentifier) {
        require!(self.is_paused(), ERROR_NOT_PAUSED);
        let config = self.require_market(&underlying);

        self.lock_pool(&underlying);
        self.market_accrue(&config);

        let limits = self.loop_limits().get();
        let mut iterations = 0usize;
        for _ in 0..limits.repay_all {
            let owed = self.vault_borrow(&config).into_raw_units().clone();
            if owed == 0 {
                break;
            }

            let snapshot = self.market_snapshot(&config);
            let step = self.unwind_redeem_amount(&snapshot);
            // The last step clears the exact amount the market reports.
            let amount = if step >= self.current_borrow(&snapshot) {
                owed
            } else {
                self.denormalize_raw(&step, config.asset_decimals)
            };
            if amount == 0 {
                break;
            }

            self.redeem_and_repay(&underlying, &config, &amount);
            iterations += 1;
        }

        require!(
            self.is_zero(&self.vault_borrow(&config)),
            ERROR_INSUFFICIENT_LIQUIDITY
        );

        let idle = self.blockchain().get_sc_balance(&underlying, 0);
        if idle > 0 {
            self.market_supply(&underlying, &config, &idle);
        }

        self.repay_all_event(&underlying, iterations, &idle);
        self.unlock_pool(&underlying);
    }

    fn leverage_market(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        cache: &mut Cache<Self>,
    ) {
        self.lock_pool(underlying);
        self.market_accrue(config);

        let limit_fraction = self.limit_fraction().get();
        let min_value = self.min_leverage_value().get();

        for step in 0..self.compound_depth().get() {
            let snapshot = self.priced_snapshot(underlying, config, cache);
            let amount = self.safe_borrow_amount(&snapshot, &limit_fraction);
            let value = self.mul_down(&amount, &snapshot.underlying_price, WAD_PRECISION);
            if value < min_value {
                break;
            }

            let raw_amount = self.denormalize_raw(&amount, config.asset_decimals);
            if raw_amount == 0 {
                break;
            }

            self.market_borrow(config, &raw_amount);
            self.market_supply(underlying, config, &raw_amount);
            self.leverage_step_event(underlying, step, &raw_amount);
        }

        self.unlock_pool(underlying);
    }

    fn deleverage_market(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
    ) {
        self.lock_pool(underlying);
        self.market_accrue(config);

        let limit_fraction = self.limit_fraction().get();
        let limits = self.loop_limits().get();
        let dust = self.whole_units(1);

        for step in 0..limits.deleverage {
            let snapshot = self.market_snapshot(config);
            let amount = self.deleverage_amount(&snapshot, &limit_fraction);
            if amount < dust {
                break;
            }

            let step_amount = self.get_min(amount, self.unwind_redeem_amount(&snapshot));
            if step_amount < dust {
                break;
            }

            let redeemed = self.denormalize_raw(&step_amount, config.asset_decimals);
            let repaid = self.redeem_and_repay(underlying, config, &redeemed);
            self.deleverage_step_event(underlying, step, &redeemed, &repaid);
        }

        let remaining = self.deleverage_amount(&self.market_snapshot(config), &limit_fraction);
        require!(remaining < dust, ERROR_INSUFFICIENT_LIQUIDITY);

        self.unlock_pool(underlying);
    }
}
