multiversx_sc::imports!();

use common_structs::{PoolState, PositionLedgerEntry, PriceQuote};

use crate::{cache::Cache, ledger, market, oracle, risk, storage};

/// Read-only projections of the vault. Risk figures are WAD based and computed as of
/// the current block without touching the market.
#[multiversx_sc::module]
pub trait ViewsModule:
    storage::Storage
    + market::MarketModule
    + oracle::OracleModule
    + risk::RiskModule
    + ledger::LedgerModule
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
    + common_rates::InterestRates
{
    #[view(getAccount)]
    fn get_account(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
        account: ManagedAddress,
    ) -> PositionLedgerEntry<Self::Api> {
        let config = self.require_market(&underlying);
        let mapper = self.ledger(&underlying, &account);
        if mapper.is_empty() {
            return PositionLedgerEntry::new(config.asset_decimals);
        }
        mapper.get()
    }

    #[view(getPoolState)]
    fn get_pool_state(&self, underlying: EgldOrEsdtTokenIdentifier) -> PoolState<Self::Api> {
        self.require_market(&underlying);
        self.pool_state(&underlying).get()
    }

    /// Reward shares the account would realize at its next settlement, rewards not yet
    /// claimed from the market excluded.
    #[view(getPendingRewards)]
    fn get_pending_rewards(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
        account: ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let pool = self.get_pool_state(underlying.clone());
        let entry = self.get_account(underlying, account);
        self.pending_reward_shares(&pool, &entry)
    }

    #[view(getCurrentBorrow)]
    fn get_current_borrow(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_market(&underlying);
        self.current_borrow(&self.market_snapshot(&config))
    }

    #[view(getCurrentSupply)]
    fn get_current_supply(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_market(&underlying);
        self.current_supply(&self.market_snapshot(&config))
    }

    #[view(getSafeCollateralRatio)]
    fn get_safe_collateral_ratio(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_market(&underlying);
        self.safe_collateral_ratio(&self.market_snapshot(&config), &self.limit_fraction().get())
    }

    /// Priced through the oracle, like the leverage loop itself.
    #[view(getSafeBorrowAmount)]
    fn get_safe_borrow_amount(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_market(&underlying);
        let mut cache = Cache::new(self);
        let snapshot = self.priced_snapshot(&underlying, &config, &mut cache);
        self.safe_borrow_amount(&snapshot, &self.limit_fraction().get())
    }

    #[view(getSafeRedeemAmount)]
    fn get_safe_redeem_amount(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_market(&underlying);
        self.safe_redeem_amount(&self.market_snapshot(&config), &self.limit_fraction().get())
    }

    #[view(getDeleverageAmount)]
    fn get_deleverage_amount(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_market(&underlying);
        self.deleverage_amount(&self.market_snapshot(&config), &self.limit_fraction().get())
    }

    /// Borrow rate per block once `amount` (raw units) more is borrowed.
    #[view(getPredictedBorrowRate)]
    fn get_predicted_borrow_rate(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_market(&underlying);
        let amount = self.normalize(&amount, config.asset_decimals);
        self.predict_borrow_rate(&self.market_snapshot(&config), &amount)
    }

    #[view(getPredictedSupplyRate)]
    fn get_predicted_supply_rate(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_market(&underlying);
        let amount = self.normalize(&amount, config.asset_decimals);
        self.predict_supply_rate(&self.market_snapshot(&config), &amount)
    }

    #[view(getPriceInQuote)]
    fn get_price_in_quote(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
        quote: PriceQuote,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut cache = Cache::new(self);
        self.price_in_quote(&asset, &amount, quote, &mut cache)
    }

    /// Value of `amount` LP tokens as `(bridge asset, USD)`.
    #[view(getLpPrice)]
    fn get_lp_price(
        &self,
        lp_token: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
    ) -> MultiValue2<ManagedDecimal<Self::Api, NumDecimals>, ManagedDecimal<Self::Api, NumDecimals>>
    {
        let mut cache = Cache::new(self);
        let (native, usd) = self.lp_price(&lp_token, &amount, &mut cache);
        (native, usd).into()
    }
}
