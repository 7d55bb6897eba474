use common_structs::{BorrowSnapshot, RateModelParams};

multiversx_sc::imports!();

/// Storage layout of the market. The vault reads these keys directly from the market's
/// address, so renaming a key is a breaking change for every reader.
#[multiversx_sc::module]
pub trait Storage {
    #[view(getUnderlying)]
    #[storage_mapper("underlying")]
    fn underlying(&self) -> SingleValueMapper<EgldOrEsdtTokenIdentifier>;

    #[view(getAssetDecimals)]
    #[storage_mapper("asset_decimals")]
    fn asset_decimals(&self) -> SingleValueMapper<usize>;

    #[view(getCash)]
    #[storage_mapper("cash")]
    fn cash(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getTotalBorrows)]
    #[storage_mapper("total_borrows")]
    fn total_borrows(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getTotalReserves)]
    #[storage_mapper("total_reserves")]
    fn total_reserves(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getTotalShares)]
    #[storage_mapper("total_shares")]
    fn total_shares(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("initial_exchange_rate")]
    fn initial_exchange_rate(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getBorrowIndex)]
    #[storage_mapper("borrow_index")]
    fn borrow_index(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getAccrualBlock)]
    #[storage_mapper("accrual_block")]
    fn accrual_block(&self) -> SingleValueMapper<u64>;

    #[view(getRateModel)]
    #[storage_mapper("rate_model")]
    fn rate_model(&self) -> SingleValueMapper<RateModelParams<Self::Api>>;

    #[view(getReserveFactor)]
    #[storage_mapper("reserve_factor")]
    fn reserve_factor(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getCollateralFactor)]
    #[storage_mapper("collateral_factor")]
    fn collateral_factor(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("shares")]
    fn shares(&self, account: &ManagedAddress)
        -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("borrow_snapshot")]
    fn borrow_snapshot(
        &self,
        account: &ManagedAddress,
    ) -> SingleValueMapper<BorrowSnapshot<Self::Api>>;

    #[view(isBorrowPaused)]
    #[storage_mapper("borrow_paused")]
    fn borrow_paused(&self) -> SingleValueMapper<bool>;

    #[view(getRewardToken)]
    #[storage_mapper("reward_token")]
    fn reward_token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[storage_mapper("reward_decimals")]
    fn reward_decimals(&self) -> SingleValueMapper<usize>;

    #[view(getSupplyRewardSpeed)]
    #[storage_mapper("supply_reward_speed")]
    fn supply_reward_speed(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getBorrowRewardSpeed)]
    #[storage_mapper("borrow_reward_speed")]
    fn borrow_reward_speed(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("reward_supply_index")]
    fn reward_supply_index(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("reward_borrow_index")]
    fn reward_borrow_index(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("reward_block")]
    fn reward_block(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("supplier_reward_index")]
    fn supplier_reward_index(
        &self,
        account: &ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("borrower_reward_index")]
    fn borrower_reward_index(
        &self,
        account: &ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("reward_accrued")]
    fn reward_accrued(
        &self,
        account: &ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;
}
