multiversx_sc::imports!();

use common_errors::{
    ERROR_INSUFFICIENT_STAKE, ERROR_NOTHING_STAKED, ERROR_WRONG_PAYMENT_TOKEN, ERROR_ZERO_AMOUNT,
};
use common_structs::{PoolKind, StakerPosition, StakingConfig, StakingState};

use crate::{accumulator, compound, farm, storage};

#[multiversx_sc::module]
pub trait PositionsModule:
    storage::Storage
    + compound::CompoundModule
    + farm::FarmModule
    + accumulator::AccumulatorModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + multiversx_sc_modules::pause::PauseModule
{
    /// Stakes the payment. Pending rewards of the caller are settled first, at the
    /// index reached after compounding.
    #[payable]
    #[endpoint(deposit)]
    fn deposit(&self) {
        self.require_not_paused();
        let payment = self.call_value().single_esdt();
        let config = self.config().get();
        require!(
            payment.token_identifier == config.staked_token,
            ERROR_WRONG_PAYMENT_TOKEN
        );
        require!(payment.amount > 0, ERROR_ZERO_AMOUNT);

        let caller = self.blockchain().get_caller();
        let mut state = self.staking_state().get();
        let mut position = self.load_position(&caller);

        self.compound_streams(&config, &mut state, None);
        self.realize_rewards(&config, &mut state, &mut position, &caller);

        let amount = self.to_decimal(payment.amount.clone(), self.staked_decimals().get());
        position.amount += amount.clone();
        state.total_staked += amount;
        self.farm_stake(
            &config,
            config.farm_pool_id,
            &config.staked_token,
            &payment.amount,
        );

        self.staker(&caller).set(&position);
        self.staking_state().set(&state);
        self.stake_event(&caller, &payment.amount, &position);
    }

    /// Unstakes `amount` and returns it to the caller. Allowed while paused.
    ///
    /// Rewards are settled before the balance check, so a `Single` staker may withdraw
    /// the rewards realized by this very call.
    #[endpoint(withdraw)]
    fn withdraw(&self, amount: BigUint) {
        require!(amount > 0, ERROR_ZERO_AMOUNT);
        let caller = self.blockchain().get_caller();
        let position_mapper = self.staker(&caller);
        require!(!position_mapper.is_empty(), ERROR_NOTHING_STAKED);

        let config = self.config().get();
        let mut state = self.staking_state().get();
        let mut position = position_mapper.get();

        self.compound_streams(&config, &mut state, None);
        self.realize_rewards(&config, &mut state, &mut position, &caller);

        let amount_dec = self.to_decimal(amount.clone(), self.staked_decimals().get());
        require!(amount_dec <= position.amount, ERROR_INSUFFICIENT_STAKE);
        position.amount -= amount_dec.clone();
        state.total_staked -= amount_dec;

        self.farm_unstake(&config, config.farm_pool_id, &amount);
        self.tx()
            .to(&caller)
            .single_esdt(&config.staked_token, 0, &amount)
            .transfer();

        if self.is_zero(&position.amount) {
            position_mapper.clear();
        } else {
            position_mapper.set(&position);
        }
        self.staking_state().set(&state);
        self.unstake_event(&caller, &amount, &position);
    }

    fn load_position(&self, account: &ManagedAddress) -> StakerPosition<Self::Api> {
        let mapper = self.staker(account);
        if mapper.is_empty() {
            return StakerPosition::new(self.staked_decimals().get());
        }
        mapper.get()
    }

    /// Settles the position and hands over what it was owed: `Single` restakes it into
    /// the position, `Lp` takes it out of the base pool and pays it in the reward token.
    fn realize_rewards(
        &self,
        config: &StakingConfig<Self::Api>,
        state: &mut StakingState<Self::Api>,
        position: &mut StakerPosition<Self::Api>,
        account: &ManagedAddress,
    ) {
        let pending = self.settle_position(state, position);
        if self.is_zero(&pending) {
            return;
        }

        match config.kind {
            PoolKind::Single => {
                let restaked = pending.rescale(position.amount.scale());
                position.amount += restaked.clone();
                state.total_staked += restaked;
            },
            PoolKind::Lp => {
                let amount = pending.into_raw_units().clone();
                self.farm_unstake(config, config.base_pool_id, &amount);
                self.tx()
                    .to(account)
                    .single_esdt(&config.reward_token, 0, &amount)
                    .transfer();
            },
        }
    }
}
