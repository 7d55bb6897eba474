multiversx_sc::imports!();

#[multiversx_sc::proxy]
pub trait Farm {
    #[endpoint]
    fn stake(&self, pool_id: u32);

    #[endpoint]
    fn unstake(&self, pool_id: u32, amount: BigUint);

    #[endpoint]
    fn harvest(&self, pool_id: u32) -> BigUint;

    #[view(getPendingRewards)]
    fn get_pending_rewards(&self, pool_id: u32, account: ManagedAddress) -> BigUint;
}
