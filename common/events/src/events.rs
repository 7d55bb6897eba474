#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();
pub use common_structs::*;

#[multiversx_sc::module]
pub trait EventsModule {
    #[event("add_market")]
    fn add_market_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] market_address: &ManagedAddress,
        #[indexed] pegged_token: &TokenIdentifier,
        #[indexed] asset_decimals: usize,
    );

    #[event("remove_market")]
    fn remove_market_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] market_address: &ManagedAddress,
    );

    #[event("deposit")]
    fn deposit_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] amount: &BigUint,
        #[indexed] minted_shares: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] pegged_minted: &BigUint,
    );

    #[event("withdraw")]
    fn withdraw_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] share_amount: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] reward_shares: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] underlying_paid: &BigUint,
        #[indexed] pegged_burned: &BigUint,
    );

    // Emitted every time a ledger entry changes, whether through the owner's own action
    // or through a settlement (rewards credited, losses deducted, fee collected)
    #[event("update_ledger")]
    fn update_ledger_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] account: &ManagedAddress,
        #[indexed] entry: &PositionLedgerEntry<Self::Api>,
    );

    #[event("update_pool")]
    fn update_pool_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] pool: &PoolState<Self::Api>,
    );

    #[event("rewards_compounded")]
    fn rewards_compounded_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] reward_amount: &BigUint,
        #[indexed] underlying_received: &BigUint,
        #[indexed] minted_shares: &ManagedDecimal<Self::Api, NumDecimals>,
    );

    #[event("loss_recorded")]
    fn loss_recorded_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] loss: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] loss_index: &ManagedDecimal<Self::Api, NumDecimals>,
    );

    #[event("leverage_step")]
    fn leverage_step_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] step: usize,
        #[indexed] borrowed: &BigUint,
    );

    #[event("deleverage_step")]
    fn deleverage_step_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] step: usize,
        #[indexed] redeemed: &BigUint,
        #[indexed] repaid: &BigUint,
    );

    #[event("repay_all")]
    fn repay_all_event(
        &self,
        #[indexed] underlying: &EgldOrEsdtTokenIdentifier,
        #[indexed] iterations: usize,
        #[indexed] resupplied: &BigUint,
    );

    #[event("stake")]
    fn stake_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] amount: &BigUint,
        #[indexed] position: &StakerPosition<Self::Api>,
    );

    #[event("unstake")]
    fn unstake_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] amount: &BigUint,
        #[indexed] position: &StakerPosition<Self::Api>,
    );

    #[event("staking_compound")]
    fn staking_compound_event(
        &self,
        #[indexed] caller: &ManagedAddress,
        #[indexed] harvested: &BigUint,
        #[indexed] incentive: &BigUint,
        #[indexed] state: &StakingState<Self::Api>,
    );
}
