use common_constants::{MAX_ASSET_DECIMALS, WAD_PRECISION};
use common_errors::ERROR_INVALID_DECIMALS;

multiversx_sc::imports!();

/// Moves amounts between an asset's native precision and the 18-decimal basis.
///
/// Upscaling is exact. Downscaling truncates, so
/// `normalize(denormalize(x, d), d) <= x` with a gap below `10^(18 - d)` raw units.
#[multiversx_sc::module]
pub trait DecimalNormalizerModule: crate::SharedMathModule {
    fn require_supported_decimals(&self, decimals: usize) {
        require!(decimals <= MAX_ASSET_DECIMALS, ERROR_INVALID_DECIMALS);
    }

    /// Raw native units to Fixed18.
    fn normalize(
        &self,
        amount: &BigUint,
        decimals: usize,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.require_supported_decimals(decimals);
        self.to_decimal(amount.clone(), decimals)
            .rescale(WAD_PRECISION)
    }

    fn normalize_decimal(
        &self,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.require_supported_decimals(amount.scale());
        amount.rescale(WAD_PRECISION)
    }

    /// Fixed18 back to the native precision, rounded down.
    fn denormalize(
        &self,
        value: &ManagedDecimal<Self::Api, NumDecimals>,
        decimals: usize,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.require_supported_decimals(decimals);
        value.rescale(WAD_PRECISION).rescale(decimals)
    }

    fn denormalize_raw(
        &self,
        value: &ManagedDecimal<Self::Api, NumDecimals>,
        decimals: usize,
    ) -> BigUint {
        self.denormalize(value, decimals).into_raw_units().clone()
    }

    /// Whole units of an asset expressed in Fixed18, e.g. `units(1)` is one token.
    fn whole_units(&self, units: u64) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal(BigUint::from(units), 0)
            .rescale(WAD_PRECISION)
    }
}
