multiversx_sc::imports!();

/// Mutating calls answer with a status code, `0` meaning success.
#[multiversx_sc::proxy]
pub trait LendingMarket {
    #[endpoint]
    fn supply(&self) -> u64;

    #[endpoint]
    fn borrow(&self, amount: BigUint) -> u64;

    #[endpoint]
    fn redeem(&self, shares: BigUint) -> u64;

    #[endpoint(redeemUnderlying)]
    fn redeem_underlying(&self, amount: BigUint) -> u64;

    #[endpoint(repayBorrow)]
    fn repay_borrow(&self) -> u64;

    #[endpoint(accrueInterest)]
    fn accrue_interest(&self) -> u64;

    #[endpoint(claimRewards)]
    fn claim_rewards(&self) -> BigUint;
}
