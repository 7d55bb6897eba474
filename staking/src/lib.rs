#![no_std]

multiversx_sc::imports!();

pub mod accumulator;
pub mod compound;
pub mod config;
pub mod farm;
pub mod positions;
pub mod storage;
pub mod views;

use common_constants::DEFAULT_CALLER_INCENTIVE_BPS;
pub use common_errors::*;
pub use common_structs::*;

/// Auto-compounding staking pool on top of a farm.
///
/// Stakers share one farm position. Harvested rewards are restaked into the farm's base
/// pool and tracked per staked unit in `reward_index`; a staker's claim is settled every
/// time they deposit or withdraw.
#[multiversx_sc::contract]
pub trait Staking:
    positions::PositionsModule
    + compound::CompoundModule
    + config::ConfigModule
    + views::ViewsModule
    + farm::FarmModule
    + accumulator::AccumulatorModule
    + storage::Storage
    + common_events::EventsModule
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
    + multiversx_sc_modules::pause::PauseModule
{
    /// # Arguments
    /// - `kind`: `Single` stakes the reward token itself, `Lp` stakes a liquidity token.
    /// - `farm_pool_id`: farm pool receiving the staked token.
    /// - `base_pool_id`: farm pool staking the reward token, where proceeds are restaked.
    #[allow(clippy::too_many_arguments)]
    #[init]
    fn init(
        &self,
        kind: PoolKind,
        staked_token: TokenIdentifier,
        reward_token: TokenIdentifier,
        farm_address: ManagedAddress,
        farm_pool_id: u32,
        base_pool_id: u32,
        staked_decimals: usize,
        reward_decimals: usize,
    ) {
        require!(!farm_address.is_zero(), ERROR_INVALID_ADDRESS);
        self.require_supported_decimals(staked_decimals);
        self.require_supported_decimals(reward_decimals);

        let same_asset = staked_token == reward_token && farm_pool_id == base_pool_id;
        let valid = match kind {
            PoolKind::Single => same_asset && staked_decimals == reward_decimals,
            PoolKind::Lp => staked_token != reward_token && farm_pool_id != base_pool_id,
        };
        require!(valid, ERROR_INVALID_POOL_CONFIG);

        self.config().set(StakingConfig {
            kind,
            staked_token,
            reward_token,
            farm_address,
            farm_pool_id,
            base_pool_id,
        });
        self.staked_decimals().set(staked_decimals);
        self.reward_decimals().set(reward_decimals);
        self.staking_state()
            .set(StakingState::new(staked_decimals, reward_decimals));
        self.caller_incentive()
            .set(self.to_decimal_bps(BigUint::from(DEFAULT_CALLER_INCENTIVE_BPS)));
    }

    #[upgrade]
    fn upgrade(&self) {}
}
