use common_structs::{StakerPosition, StakingConfig, StakingState};

multiversx_sc::imports!();

#[multiversx_sc::module]
pub trait Storage {
    #[view(getConfig)]
    #[storage_mapper("config")]
    fn config(&self) -> SingleValueMapper<StakingConfig<Self::Api>>;

    #[view(getStakingState)]
    #[storage_mapper("staking_state")]
    fn staking_state(&self) -> SingleValueMapper<StakingState<Self::Api>>;

    #[storage_mapper("staker")]
    fn staker(&self, account: &ManagedAddress) -> SingleValueMapper<StakerPosition<Self::Api>>;

    /// Share of every explicit harvest paid to the caller of `compound`, in BPS.
    #[view(getCallerIncentive)]
    #[storage_mapper("caller_incentive")]
    fn caller_incentive(&self) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getStakedDecimals)]
    #[storage_mapper("staked_decimals")]
    fn staked_decimals(&self) -> SingleValueMapper<usize>;

    #[view(getRewardDecimals)]
    #[storage_mapper("reward_decimals")]
    fn reward_decimals(&self) -> SingleValueMapper<usize>;
}
