multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_errors::ERROR_NOTHING_STAKED;
use common_structs::{PoolKind, StakingConfig, StakingState};

use crate::{accumulator, farm, storage};

#[multiversx_sc::module]
pub trait CompoundModule:
    storage::Storage
    + farm::FarmModule
    + accumulator::AccumulatorModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + multiversx_sc_modules::pause::PauseModule
{
    /// Harvests every reward stream, restakes the proceeds and pays the caller a share
    /// of the harvest.
    #[endpoint(compound)]
    fn compound(&self) {
        self.require_not_paused();
        let config = self.config().get();
        let mut state = self.staking_state().get();
        require!(state.has_stake(), ERROR_NOTHING_STAKED);

        let caller = self.blockchain().get_caller();
        let (harvested, incentive) = self.compound_streams(&config, &mut state, Some(&caller));

        self.staking_state().set(&state);
        self.staking_compound_event(&caller, &harvested, &incentive, &state);
    }

    /// Farm pools feeding the staking pool, in harvest order. The base pool goes first:
    /// the farm stream is restaked into it and must not be counted as base yield.
    fn reward_streams(&self, config: &StakingConfig<Self::Api>) -> ManagedVec<u32> {
        let mut streams = ManagedVec::new();
        streams.push(config.base_pool_id);
        if config.kind == PoolKind::Lp {
            streams.push(config.farm_pool_id);
        }
        streams
    }

    /// Returns the total harvested and the incentive paid, both raw reward units.
    /// Without an `incentive_receiver` the whole harvest is restaked.
    fn compound_streams(
        &self,
        config: &StakingConfig<Self::Api>,
        state: &mut StakingState<Self::Api>,
        incentive_receiver: Option<&ManagedAddress>,
    ) -> (BigUint, BigUint) {
        let mut harvested = BigUint::zero();
        let mut incentive = BigUint::zero();
        if !state.has_stake() {
            return (harvested, incentive);
        }

        for pool_id in self.reward_streams(config).iter() {
            let (stream_harvested, stream_incentive) =
                self.compound_stream(config, state, pool_id, incentive_receiver);
            harvested += stream_harvested;
            incentive += stream_incentive;
        }

        (harvested, incentive)
    }

    fn compound_stream(
        &self,
        config: &StakingConfig<Self::Api>,
        state: &mut StakingState<Self::Api>,
        pool_id: u32,
        incentive_receiver: Option<&ManagedAddress>,
    ) -> (BigUint, BigUint) {
        let harvested = self.farm_harvest(config, pool_id);
        if harvested == 0 {
            return (harvested, BigUint::zero());
        }

        let reward_decimals = self.reward_decimals().get();
        let harvested_dec = self.to_decimal(harvested.clone(), reward_decimals);
        let incentive = match incentive_receiver {
            Some(_) => self
                .mul_down(&harvested_dec, &self.caller_incentive().get(), WAD_PRECISION)
                .rescale(reward_decimals),
            None => self.to_decimal(BigUint::zero(), reward_decimals),
        };
        let net = harvested_dec - incentive.clone();

        let incentive_amount = incentive.into_raw_units().clone();
        if let Some(receiver) = incentive_receiver {
            self.tx()
                .to(receiver)
                .single_esdt(&config.reward_token, 0, &incentive_amount)
                .transfer_if_not_empty();
        }

        self.farm_stake(
            config,
            config.base_pool_id,
            &config.reward_token,
            net.into_raw_units(),
        );
        self.distribute_rewards(state, &net);

        (harvested, incentive_amount)
    }
}
