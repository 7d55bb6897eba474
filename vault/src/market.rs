multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_errors::{ERROR_EXTERNAL_CALL_FAILED, ERROR_MARKET_NOT_REGISTERED};
use common_proxies::market;
use common_structs::{BorrowSnapshot, MarketConfig, MarketSnapshot};

use crate::{cache::Cache, oracle, storage};

const MARKET_SUCCESS: u64 = 0;

/// Reads lending market state in place and drives the market on behalf of the vault.
///
/// Every mutating call answers with a status code; anything but `0` reverts the whole
/// endpoint with `ExternalCallFailed`.
#[multiversx_sc::module]
pub trait MarketModule:
    storage::Storage
    + oracle::OracleModule
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
    + common_rates::InterestRates
{
    fn require_market(&self, underlying: &EgldOrEsdtTokenIdentifier) -> MarketConfig<Self::Api> {
        let mapper = self.market_config(underlying);
        require!(!mapper.is_empty(), ERROR_MARKET_NOT_REGISTERED);
        mapper.get()
    }

    /// Normalized view of the market and of the vault's account in it. Prices are
    /// left at zero.
    fn market_snapshot(&self, config: &MarketConfig<Self::Api>) -> MarketSnapshot<Self::Api> {
        let market = config.market_address.clone();
        let vault = self.blockchain().get_sc_address();

        let borrow_mapper = self.market_borrow_snapshot(market.clone(), &vault);
        let account_borrow = if borrow_mapper.is_empty() {
            BorrowSnapshot::empty(WAD_PRECISION)
        } else {
            let stored = borrow_mapper.get();
            BorrowSnapshot {
                principal: self.normalize_decimal(&stored.principal),
                interest_index: stored.interest_index,
            }
        };

        let (supply_reward_speed, borrow_reward_speed) =
            if self.market_reward_token(market.clone()).is_empty() {
                (self.wad_zero(), self.wad_zero())
            } else {
                (
                    self.normalize_decimal(&self.market_supply_reward_speed(market.clone()).get()),
                    self.normalize_decimal(&self.market_borrow_reward_speed(market.clone()).get()),
                )
            };

        MarketSnapshot {
            cash: self.normalize_decimal(&self.market_cash(market.clone()).get()),
            total_borrows: self.normalize_decimal(&self.market_total_borrows(market.clone()).get()),
            total_reserves: self
                .normalize_decimal(&self.market_total_reserves(market.clone()).get()),
            total_shares: self.normalize_decimal(&self.market_total_shares(market.clone()).get()),
            initial_exchange_rate: self.market_initial_exchange_rate(market.clone()).get(),
            borrow_index: self.market_borrow_index(market.clone()).get(),
            accrual_block: self.market_accrual_block(market.clone()).get(),
            current_block: self.blockchain().get_block_nonce(),
            rate_model: self.market_rate_model(market.clone()).get(),
            reserve_factor: self.market_reserve_factor(market.clone()).get(),
            collateral_factor: self.market_collateral_factor(market.clone()).get(),
            account_borrow,
            account_shares: self.normalize_decimal(&self.vault_shares(config)),
            supply_reward_speed,
            borrow_reward_speed,
            underlying_price: self.wad_zero(),
            reward_price: self.wad_zero(),
        }
    }

    /// Snapshot carrying the USD prices the profitability check needs. The reward
    /// token is only priced when the oracle knows it; otherwise rewards count as zero.
    fn priced_snapshot(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        cache: &mut Cache<Self>,
    ) -> MarketSnapshot<Self::Api> {
        let mut snapshot = self.market_snapshot(config);
        snapshot.underlying_price = self.get_usd_price(underlying, cache);

        let reward_mapper = self.market_reward_token(config.market_address.clone());
        if !reward_mapper.is_empty() {
            let reward_token = EgldOrEsdtTokenIdentifier::esdt(reward_mapper.get());
            if cache.get_cached_oracle(&reward_token).is_some() {
                snapshot.reward_price = self.get_usd_price(&reward_token, cache);
            }
        }

        snapshot
    }

    /// Market shares held by the vault, at the asset's decimals.
    fn vault_shares(
        &self,
        config: &MarketConfig<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mapper = self.market_shares(
            config.market_address.clone(),
            &self.blockchain().get_sc_address(),
        );
        if mapper.is_empty() {
            return self.to_decimal(BigUint::zero(), config.asset_decimals);
        }
        mapper.get()
    }

    /// Borrow balance of the vault at the market's last accrual, at the asset's decimals.
    fn vault_borrow(
        &self,
        config: &MarketConfig<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let market = config.market_address.clone();
        let mapper =
            self.market_borrow_snapshot(market.clone(), &self.blockchain().get_sc_address());
        if mapper.is_empty() {
            return self.to_decimal(BigUint::zero(), config.asset_decimals);
        }

        let stored = mapper.get();
        self.borrow_balance(
            &stored.principal,
            &stored.interest_index,
            &self.market_borrow_index(market).get(),
        )
    }

    /// Underlying held by the vault itself, at the asset's decimals.
    fn idle_balance(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let balance = self.blockchain().get_sc_balance(underlying, 0);
        self.to_decimal(balance, config.asset_decimals)
    }

    fn market_accrue(&self, config: &MarketConfig<Self::Api>) {
        let code = self
            .market_proxy(config.market_address.clone())
            .accrue_interest()
            .returns(ReturnsResult)
            .sync_call();
        self.require_market_success(code);
    }

    /// Supplies `amount` and returns the shares minted, measured on the vault's balance.
    fn market_supply(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        amount: &BigUint,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let shares_before = self.vault_shares(config);
        let code = self
            .market_proxy(config.market_address.clone())
            .supply()
            .egld_or_single_esdt(underlying, 0, amount)
            .returns(ReturnsResult)
            .sync_call();
        self.require_market_success(code);

        self.vault_shares(config) - shares_before
    }

    fn market_borrow(&self, config: &MarketConfig<Self::Api>, amount: &BigUint) {
        let code = self
            .market_proxy(config.market_address.clone())
            .borrow(amount)
            .returns(ReturnsResult)
            .sync_call();
        self.require_market_success(code);
    }

    fn market_redeem_underlying(&self, config: &MarketConfig<Self::Api>, amount: &BigUint) {
        let code = self
            .market_proxy(config.market_address.clone())
            .redeem_underlying(amount)
            .returns(ReturnsResult)
            .sync_call();
        self.require_market_success(code);
    }

    fn market_repay(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        amount: &BigUint,
    ) {
        let code = self
            .market_proxy(config.market_address.clone())
            .repay_borrow()
            .egld_or_single_esdt(underlying, 0, amount)
            .returns(ReturnsResult)
            .sync_call();
        self.require_market_success(code);
    }

    fn market_claim_rewards(&self, config: &MarketConfig<Self::Api>) -> BigUint {
        self.market_proxy(config.market_address.clone())
            .claim_rewards()
            .returns(ReturnsResult)
            .sync_call()
    }

    /// Redeems `amount` of underlying, then repays as much of it as is owed.
    /// Returns the repaid amount.
    fn redeem_and_repay(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        amount: &BigUint,
    ) -> BigUint {
        self.market_redeem_underlying(config, amount);

        let owed = self.vault_borrow(config).into_raw_units().clone();
        let repaid = if &owed < amount { owed } else { amount.clone() };
        if repaid > 0 {
            self.market_repay(underlying, config, &repaid);
        }

        repaid
    }

    fn require_market_success(&self, code: u64) {
        require!(code == MARKET_SUCCESS, ERROR_EXTERNAL_CALL_FAILED);
    }

    #[proxy]
    fn market_proxy(&self, sc_address: ManagedAddress) -> market::ProxyTo<Self::Api>;
}
