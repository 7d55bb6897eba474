multiversx_sc::imports!();

use common_proxies::farm;
use common_structs::StakingConfig;

#[multiversx_sc::module]
pub trait FarmModule {
    fn farm_stake(
        &self,
        config: &StakingConfig<Self::Api>,
        pool_id: u32,
        token: &TokenIdentifier,
        amount: &BigUint,
    ) {
        if amount == &BigUint::zero() {
            return;
        }

        self.farm_proxy(config.farm_address.clone())
            .stake(pool_id)
            .single_esdt(token, 0, amount)
            .sync_call();
    }

    fn farm_unstake(&self, config: &StakingConfig<Self::Api>, pool_id: u32, amount: &BigUint) {
        if amount == &BigUint::zero() {
            return;
        }

        self.farm_proxy(config.farm_address.clone())
            .unstake(pool_id, amount)
            .sync_call();
    }

    /// Claims the pool's rewards to this contract and returns the amount received.
    fn farm_harvest(&self, config: &StakingConfig<Self::Api>, pool_id: u32) -> BigUint {
        self.farm_proxy(config.farm_address.clone())
            .harvest(pool_id)
            .returns(ReturnsResult)
            .sync_call()
    }

    fn farm_pending(&self, config: &StakingConfig<Self::Api>, pool_id: u32) -> BigUint {
        self.farm_proxy(config.farm_address.clone())
            .get_pending_rewards(pool_id, self.blockchain().get_sc_address())
            .returns(ReturnsResult)
            .sync_call_readonly()
    }

    #[proxy]
    fn farm_proxy(&self, sc_address: ManagedAddress) -> farm::ProxyTo<Self::Api>;
}
