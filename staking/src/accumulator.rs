multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_structs::{StakerPosition, StakingState};

/// Reward-per-staked-unit bookkeeping. `reward_index` is WAD scaled and only grows;
/// a staker is owed `amount * (reward_index - reward_index_paid)`.
#[multiversx_sc::module]
pub trait AccumulatorModule: common_math::SharedMathModule {
    /// Reward tokens owed to `position`, at `reward_decimals`, rounded down.
    fn pending_rewards(
        &self,
        index: &ManagedDecimal<Self::Api, NumDecimals>,
        position: &StakerPosition<Self::Api>,
        reward_decimals: usize,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let delta = self.sub_or_zero(index, &position.reward_index_paid);
        self.mul_down(&position.amount, &delta, WAD_PRECISION)
            .rescale(reward_decimals)
    }

    /// Spreads `net_rewards` over every staked unit. No-op while nothing is staked.
    fn distribute_rewards(
        &self,
        state: &mut StakingState<Self::Api>,
        net_rewards: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        if !state.has_stake() || self.is_zero(net_rewards) {
            return;
        }

        let increase = self.index_increase(net_rewards, &state.total_staked);
        state.reward_index += increase;
        state.unclaimed_rewards += net_rewards.rescale(state.unclaimed_rewards.scale());
    }

    /// Moves the position's snapshot to the current index and returns what it was owed.
    fn settle_position(
        &self,
        state: &mut StakingState<Self::Api>,
        position: &mut StakerPosition<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let pending = self.pending_rewards(
            &state.reward_index,
            position,
            state.unclaimed_rewards.scale(),
        );
        position.reward_index_paid = state.reward_index.clone();
        state.unclaimed_rewards = self.sub_or_zero(&state.unclaimed_rewards, &pending);

        pending
    }
}
