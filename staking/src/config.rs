multiversx_sc::imports!();

use common_constants::MAX_CALLER_INCENTIVE_BPS;
use common_errors::ERROR_INVALID_CALLER_INCENTIVE;

use crate::storage;

#[multiversx_sc::module]
pub trait ConfigModule: storage::Storage + common_math::SharedMathModule {
    #[only_owner]
    #[endpoint(setCallerIncentive)]
    fn set_caller_incentive(&self, incentive_bps: usize) {
        require!(
            incentive_bps <= MAX_CALLER_INCENTIVE_BPS,
            ERROR_INVALID_CALLER_INCENTIVE
        );
        self.caller_incentive()
            .set(self.to_decimal_bps(BigUint::from(incentive_bps)));
    }
}
