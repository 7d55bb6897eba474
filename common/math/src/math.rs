#![no_std]

use common_constants::{BPS_PRECISION, WAD, WAD_PRECISION};

pub mod normalizer;

multiversx_sc::imports!();

/// Deterministic fixed-point helpers shared by every contract of the workspace.
///
/// Operands may carry different scales; every operation rescales both sides to the
/// requested `precision` first. Results round down unless the name says otherwise, so
/// amounts leaving the contract never exceed what is owed.
#[multiversx_sc::module]
pub trait SharedMathModule {
    /// Truncating multiplication: `floor(a * b)` at `precision`.
    fn mul_down(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let product = scaled_a.into_raw_units() * scaled_b.into_raw_units();
        let scaled = BigUint::from(10u64).pow(precision as u32);

        self.to_decimal(product / scaled, precision)
    }

    /// Truncating division: `floor(a / b)` at `precision`. The caller guarantees `b > 0`.
    fn div_down(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let scaled = BigUint::from(10u64).pow(precision as u32);
        let numerator = scaled_a.into_raw_units() * &scaled;

        self.to_decimal(numerator / scaled_b.into_raw_units(), precision)
    }

    /// Rounds up: `ceil(a / b)` at `precision`. The caller guarantees `b > 0`.
    fn div_up(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let scaled_a = a.rescale(precision);
        let scaled_b = b.rescale(precision);

        let scaled = BigUint::from(10u64).pow(precision as u32);
        let numerator = scaled_a.into_raw_units() * &scaled;
        let denominator = scaled_b.into_raw_units();
        let adjusted = numerator + denominator - &BigUint::from(1u64);

        self.to_decimal(adjusted / denominator, precision)
    }

    /// Square root of a non-negative decimal, truncated at `precision`.
    fn sqrt(
        &self,
        value: &ManagedDecimal<Self::Api, NumDecimals>,
        precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        // sqrt(x * 10^p * 10^p) = sqrt(x) * 10^p
        let scaled = value.rescale(precision);
        let factor = BigUint::from(10u64).pow(precision as u32);
        let widened = scaled.into_raw_units() * &factor;

        self.to_decimal(widened.sqrt(), precision)
    }

    /// Saturating subtraction at the scale of `a`.
    fn sub_or_zero(
        &self,
        a: &ManagedDecimal<Self::Api, NumDecimals>,
        b: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let rescaled_b = b.rescale(a.scale());
        if a.into_raw_units() <= rescaled_b.into_raw_units() {
            return self.to_decimal(BigUint::zero(), a.scale());
        }

        self.to_decimal(a.into_raw_units() - rescaled_b.into_raw_units(), a.scale())
    }

    /// Amount owed to a holder of `balance` units since the accumulator moved from
    /// `paid_index` to `index`, expressed at the balance's scale and rounded down.
    fn accrued_since(
        &self,
        balance: &ManagedDecimal<Self::Api, NumDecimals>,
        index: &ManagedDecimal<Self::Api, NumDecimals>,
        paid_index: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let delta = self.sub_or_zero(index, paid_index);
        self.mul_down(balance, &delta, WAD_PRECISION)
            .rescale(balance.scale())
    }

    /// Per-unit increase of an accumulator when `amount` is spread over `total` units.
    fn index_increase(
        &self,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
        total: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.div_down(amount, total, WAD_PRECISION)
    }

    fn is_zero(&self, value: &ManagedDecimal<Self::Api, NumDecimals>) -> bool {
        value.into_raw_units() == &BigUint::zero()
    }

    fn to_decimal_wad(self, value: BigUint) -> ManagedDecimal<<Self as ContractBase>::Api, usize> {
        self.to_decimal(value, WAD_PRECISION)
    }

    fn to_decimal_bps(self, value: BigUint) -> ManagedDecimal<<Self as ContractBase>::Api, usize> {
        self.to_decimal(value, BPS_PRECISION)
    }

    fn wad_zero(self) -> ManagedDecimal<<Self as ContractBase>::Api, usize> {
        self.to_decimal(BigUint::zero(), WAD_PRECISION)
    }

    fn wad(self) -> ManagedDecimal<<Self as ContractBase>::Api, usize> {
        self.to_decimal(BigUint::from(WAD), WAD_PRECISION)
    }

    /// Fraction expressed in basis points, lifted to WAD.
    fn bps_to_wad(self, value_bps: usize) -> ManagedDecimal<<Self as ContractBase>::Api, usize> {
        self.to_decimal(BigUint::from(value_bps), BPS_PRECISION)
            .rescale(WAD_PRECISION)
    }

    fn to_decimal(
        self,
        value: BigUint,
        precision: NumDecimals,
    ) -> ManagedDecimal<<Self as ContractBase>::Api, usize> {
        ManagedDecimal::from_raw_units(value, precision)
    }

    /// Downscales rounding up; used where a shortfall of one raw unit must be covered.
    fn rescale_up(
        &self,
        value: &ManagedDecimal<Self::Api, NumDecimals>,
        new_precision: NumDecimals,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let old_precision = value.scale();
        if new_precision >= old_precision {
            return value.rescale(new_precision);
        }

        let factor = BigUint::from(10u64).pow((old_precision - new_precision) as u32);
        let raw_value = value.into_raw_units();
        let mut quotient = raw_value / &factor;
        if &(&quotient * &factor) != raw_value {
            quotient += BigUint::from(1u64);
        }

        ManagedDecimal::from_raw_units(quotient, new_precision)
    }

    fn get_min(
        self,
        a: ManagedDecimal<Self::Api, NumDecimals>,
        b: ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if a < b {
            a
        } else {
            b
        }
    }
}
