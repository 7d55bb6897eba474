use common_structs::{
    BorrowSnapshot, FeedRound, LoopLimits, LpOracleConfig, MarketConfig, OracleConfig, PoolState,
    PositionLedgerEntry, RateModelParams,
};

multiversx_sc::imports!();

#[multiversx_sc::module]
pub trait Storage {
    /// Underlying assets with a registered lending market.
    #[view(getMarkets)]
    #[storage_mapper("markets")]
    fn markets(&self) -> UnorderedSetMapper<EgldOrEsdtTokenIdentifier>;

    #[view(getMarketConfig)]
    #[storage_mapper("market_config")]
    fn market_config(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<MarketConfig<Self::Api>>;

    #[storage_mapper("pool_state")]
    fn pool_state(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<PoolState<Self::Api>>;

    #[storage_mapper("ledger")]
    fn ledger(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        account: &ManagedAddress,
    ) -> SingleValueMapper<PositionLedgerEntry<Self::Api>>;

    /// Set for the duration of a top-level action on the pool.
    #[storage_mapper("pool_lock")]
    fn pool_lock(&self, underlying: &EgldOrEsdtTokenIdentifier) -> SingleValueMapper<bool>;

    // Risk and vault parameters

    #[view(getLimitFraction)]
    #[storage_mapper("limit_fraction")]
    fn limit_fraction(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getCompoundDepth)]
    #[storage_mapper("compound_depth")]
    fn compound_depth(&self) -> SingleValueMapper<usize>;

    #[view(getLoanToValue)]
    #[storage_mapper("loan_to_value")]
    fn loan_to_value(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getDepositFee)]
    #[storage_mapper("deposit_fee")]
    fn deposit_fee(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getFeeCollector)]
    #[storage_mapper("fee_collector")]
    fn fee_collector(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getLoopLimits)]
    #[storage_mapper("loop_limits")]
    fn loop_limits(&self) -> SingleValueMapper<LoopLimits>;

    #[view(getMinLeverageValue)]
    #[storage_mapper("min_leverage_value")]
    fn min_leverage_value(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getSwapRouter)]
    #[storage_mapper("swap_router")]
    fn swap_router(&self) -> SingleValueMapper<ManagedAddress>;

    // Oracle configuration

    #[view(getTokenOracle)]
    #[storage_mapper("token_oracle")]
    fn token_oracle(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<OracleConfig<Self::Api>>;

    #[view(getLpOracle)]
    #[storage_mapper("lp_oracle")]
    fn lp_oracle(
        &self,
        lp_token: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<LpOracleConfig<Self::Api>>;

    /// Native asset every TWAP quote is expressed in.
    #[view(getBridgeToken)]
    #[storage_mapper("bridge_token")]
    fn bridge_token(&self) -> SingleValueMapper<EgldOrEsdtTokenIdentifier>;

    #[view(getSafePriceView)]
    #[storage_mapper("safe_price_view")]
    fn safe_price_view(&self) -> SingleValueMapper<ManagedAddress>;

    // Lending market state, read in place

    #[storage_mapper_from_address("underlying")]
    fn market_underlying(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<EgldOrEsdtTokenIdentifier, ManagedAddress>;

    #[storage_mapper_from_address("asset_decimals")]
    fn market_asset_decimals(&self, market: ManagedAddress)
        -> SingleValueMapper<usize, ManagedAddress>;

    #[storage_mapper_from_address("cash")]
    fn market_cash(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("total_borrows")]
    fn market_total_borrows(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("total_reserves")]
    fn market_total_reserves(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("total_shares")]
    fn market_total_shares(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("initial_exchange_rate")]
    fn market_initial_exchange_rate(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("borrow_index")]
    fn market_borrow_index(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("accrual_block")]
    fn market_accrual_block(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<u64, ManagedAddress>;

    #[storage_mapper_from_address("rate_model")]
    fn market_rate_model(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<RateModelParams<Self::Api>, ManagedAddress>;

    #[storage_mapper_from_address("reserve_factor")]
    fn market_reserve_factor(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("collateral_factor")]
    fn market_collateral_factor(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("shares")]
    fn market_shares(
        &self,
        market: ManagedAddress,
        account: &ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("borrow_snapshot")]
    fn market_borrow_snapshot(
        &self,
        market: ManagedAddress,
        account: &ManagedAddress,
    ) -> SingleValueMapper<BorrowSnapshot<Self::Api>, ManagedAddress>;

    #[storage_mapper_from_address("reward_token")]
    fn market_reward_token(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<TokenIdentifier, ManagedAddress>;

    #[storage_mapper_from_address("supply_reward_speed")]
    fn market_supply_reward_speed(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    #[storage_mapper_from_address("borrow_reward_speed")]
    fn market_borrow_reward_speed(
        &self,
        market: ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>, ManagedAddress>;

    // Price feeds

    #[storage_mapper_from_address("latest_round")]
    fn feed_latest_round(
        &self,
        feed: ManagedAddress,
    ) -> SingleValueMapper<FeedRound<Self::Api>, ManagedAddress>;

    #[storage_mapper_from_address("pause_module:paused")]
    fn feed_paused_state(&self, feed: ManagedAddress) -> SingleValueMapper<bool, ManagedAddress>;
}
