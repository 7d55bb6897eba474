multiversx_sc::imports!();

use common_constants::{MAX_ASSET_DECIMALS, MAX_LOOP_ITERATIONS};
use common_errors::{
    ERROR_INVALID_ADDRESS, ERROR_INVALID_DECIMALS, ERROR_INVALID_LIMIT_FRACTION,
    ERROR_INVALID_LOOP_LIMIT, ERROR_POOL_LOCKED, ERROR_ZERO_AMOUNT,
};

use crate::storage;

#[multiversx_sc::module]
pub trait ValidationModule: storage::Storage + common_math::SharedMathModule {
    fn require_amount_greater_than_zero(&self, amount: &BigUint) {
        require!(amount > &BigUint::zero(), ERROR_ZERO_AMOUNT);
    }

    fn require_non_zero_address(&self, address: &ManagedAddress) {
        require!(!address.is_zero(), ERROR_INVALID_ADDRESS);
    }

    fn require_valid_decimals(&self, decimals: usize) {
        require!(decimals <= MAX_ASSET_DECIMALS, ERROR_INVALID_DECIMALS);
    }

    /// A limit fraction must lie strictly between 0 and 1.
    fn require_valid_limit_fraction(
        &self,
        limit_fraction: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        require!(
            !self.is_zero(limit_fraction) && limit_fraction < &self.wad(),
            ERROR_INVALID_LIMIT_FRACTION
        );
    }

    fn require_valid_loop_limit(&self, limit: usize) {
        require!(
            limit > 0 && limit <= MAX_LOOP_ITERATIONS,
            ERROR_INVALID_LOOP_LIMIT
        );
    }

    /// Takes the pool's lock for the rest of the call; a nested call into the same pool
    /// fails.
    fn lock_pool(&self, underlying: &EgldOrEsdtTokenIdentifier) {
        let lock = self.pool_lock(underlying);
        require!(!lock.get(), ERROR_POOL_LOCKED);
        lock.set(true);
    }

    fn unlock_pool(&self, underlying: &EgldOrEsdtTokenIdentifier) {
        self.pool_lock(underlying).clear();
    }
}
