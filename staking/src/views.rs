multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_structs::StakerPosition;

use crate::{accumulator, compound, farm, storage};

#[multiversx_sc::module]
pub trait ViewsModule:
    storage::Storage
    + compound::CompoundModule
    + farm::FarmModule
    + accumulator::AccumulatorModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + multiversx_sc_modules::pause::PauseModule
{
    #[view(getStaker)]
    fn get_staker(&self, account: ManagedAddress) -> StakerPosition<Self::Api> {
        let mapper = self.staker(&account);
        if mapper.is_empty() {
            return StakerPosition::new(self.staked_decimals().get());
        }
        mapper.get()
    }

    /// Reward tokens the account would realize now, counting the farm rewards not yet
    /// harvested net of the caller incentive.
    #[view(getUserPendingRewards)]
    fn get_user_pending_rewards(
        &self,
        account: ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.config().get();
        let state = self.staking_state().get();
        let reward_decimals = self.reward_decimals().get();
        let position = self.get_staker(account);
        if !state.has_stake() {
            return self.to_decimal(BigUint::zero(), reward_decimals);
        }

        let mut unharvested = BigUint::zero();
        for pool_id in self.reward_streams(&config).iter() {
            unharvested += self.farm_pending(&config, pool_id);
        }

        let unharvested = self.to_decimal(unharvested, reward_decimals);
        let incentive = self
            .mul_down(&unharvested, &self.caller_incentive().get(), WAD_PRECISION)
            .rescale(reward_decimals);
        let net = unharvested - incentive;

        let index = state.reward_index.clone() + self.index_increase(&net, &state.total_staked);
        self.pending_rewards(&index, &position, reward_decimals)
    }
}
