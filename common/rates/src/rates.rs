#![no_std]
use common_constants::WAD_PRECISION;
use common_errors::ERROR_ARITHMETIC_INVARIANT;
use common_structs::{AccrualResult, RateModelParams};

multiversx_sc::imports!();

/// The InterestRates module evaluates the per-block jump rate model of a lending
/// market and simulates interest accrual between two blocks.
///
/// **Scope**: Shared by the market itself (to apply accrual) and by the vault (to
/// project the market "as of now" without touching its state).
///
/// **Goal**: Both sides run the exact same arithmetic, so a projection matches the
/// state the market writes once it accrues.
///
/// Amount arguments may use any scale as long as they share it; rates are WAD based.
#[multiversx_sc::module]
pub trait InterestRates: common_math::SharedMathModule {
    /// Share of the market's funds currently lent out.
    ///
    /// **Formula**: `borrows / (cash + borrows - reserves)`, zero when nothing is borrowed.
    fn utilization_rate(
        &self,
        cash: &ManagedDecimal<Self::Api, NumDecimals>,
        borrows: &ManagedDecimal<Self::Api, NumDecimals>,
        reserves: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if self.is_zero(borrows) {
            return self.wad_zero();
        }

        let gross = cash.clone() + borrows.clone();
        let denominator = self.sub_or_zero(&gross, reserves);
        require!(!self.is_zero(&denominator), ERROR_ARITHMETIC_INVARIANT);

        self.div_down(borrows, &denominator, WAD_PRECISION)
    }

    /// Calculates the borrow rate per block.
    ///
    /// **Formula**:
    /// - If `utilization <= kink`: `utilization * multiplier + base`.
    /// - Otherwise: `kink * multiplier + base + (utilization - kink) * jump_multiplier`.
    fn borrow_rate_per_block(
        &self,
        cash: &ManagedDecimal<Self::Api, NumDecimals>,
        borrows: &ManagedDecimal<Self::Api, NumDecimals>,
        reserves: &ManagedDecimal<Self::Api, NumDecimals>,
        params: &RateModelParams<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let utilization = self.utilization_rate(cash, borrows, reserves);

        if utilization <= params.kink {
            let variable = self.mul_down(&utilization, &params.multiplier_per_block, WAD_PRECISION);
            return variable + params.base_rate_per_block.clone();
        }

        let normal_rate = self.mul_down(&params.kink, &params.multiplier_per_block, WAD_PRECISION)
            + params.base_rate_per_block.clone();
        let excess_utilization = utilization - params.kink.clone();
        let jump = self.mul_down(
            &excess_utilization,
            &params.jump_multiplier_per_block,
            WAD_PRECISION,
        );

        normal_rate + jump
    }

    /// Calculates the supply rate per block.
    ///
    /// **Formula**: `utilization * borrow_rate * (1 - reserve_factor)`.
    fn supply_rate_per_block(
        &self,
        cash: &ManagedDecimal<Self::Api, NumDecimals>,
        borrows: &ManagedDecimal<Self::Api, NumDecimals>,
        reserves: &ManagedDecimal<Self::Api, NumDecimals>,
        reserve_factor: &ManagedDecimal<Self::Api, NumDecimals>,
        params: &RateModelParams<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let utilization = self.utilization_rate(cash, borrows, reserves);
        if self.is_zero(&utilization) {
            return self.wad_zero();
        }

        let borrow_rate = self.borrow_rate_per_block(cash, borrows, reserves, params);
        let rate_to_pool = self.mul_down(
            &borrow_rate,
            &self.sub_or_zero(&self.wad(), reserve_factor),
            WAD_PRECISION,
        );

        self.mul_down(&utilization, &rate_to_pool, WAD_PRECISION)
    }

    /// Underlying value of one market share.
    ///
    /// **Formula**: `(cash + borrows - reserves) / total_shares`, or the initial rate
    /// while no share exists.
    fn exchange_rate(
        &self,
        cash: &ManagedDecimal<Self::Api, NumDecimals>,
        borrows: &ManagedDecimal<Self::Api, NumDecimals>,
        reserves: &ManagedDecimal<Self::Api, NumDecimals>,
        total_shares: &ManagedDecimal<Self::Api, NumDecimals>,
        initial_exchange_rate: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if self.is_zero(total_shares) {
            return initial_exchange_rate.clone();
        }

        let gross = cash.clone() + borrows.clone();
        let net = self.sub_or_zero(&gross, reserves);

        self.div_down(&net, total_shares, WAD_PRECISION)
    }

    /// Applies `blocks` blocks of interest to the market totals.
    ///
    /// **Formula**:
    /// - `factor = borrow_rate * blocks`
    /// - `interest = total_borrows * factor`
    /// - `total_borrows += interest`, `total_reserves += interest * reserve_factor`
    /// - `borrow_index += borrow_index * factor`
    ///
    /// The rate is evaluated on the totals before accrual, as the market does.
    fn simulate_accrual(
        &self,
        cash: &ManagedDecimal<Self::Api, NumDecimals>,
        total_borrows: &ManagedDecimal<Self::Api, NumDecimals>,
        total_reserves: &ManagedDecimal<Self::Api, NumDecimals>,
        borrow_index: &ManagedDecimal<Self::Api, NumDecimals>,
        reserve_factor: &ManagedDecimal<Self::Api, NumDecimals>,
        params: &RateModelParams<Self::Api>,
        blocks: u64,
    ) -> AccrualResult<Self::Api> {
        if blocks == 0 || self.is_zero(total_borrows) {
            return AccrualResult {
                total_borrows: total_borrows.clone(),
                total_reserves: total_reserves.clone(),
                borrow_index: borrow_index.clone(),
            };
        }

        let borrow_rate = self.borrow_rate_per_block(cash, total_borrows, total_reserves, params);
        let factor = self.mul_down(
            &borrow_rate,
            &self.to_decimal(BigUint::from(blocks), 0),
            WAD_PRECISION,
        );

        let scale = total_borrows.scale();
        let interest = self
            .mul_down(total_borrows, &factor, WAD_PRECISION)
            .rescale(scale);
        let reserve_share = self
            .mul_down(&interest, reserve_factor, WAD_PRECISION)
            .rescale(scale);
        let index_growth = self.mul_down(borrow_index, &factor, WAD_PRECISION);

        AccrualResult {
            total_borrows: total_borrows.clone() + interest,
            total_reserves: total_reserves.clone() + reserve_share,
            borrow_index: borrow_index.clone() + index_growth,
        }
    }

    /// Live borrow balance of an account given the market's current borrow index.
    fn borrow_balance(
        &self,
        principal: &ManagedDecimal<Self::Api, NumDecimals>,
        interest_index: &ManagedDecimal<Self::Api, NumDecimals>,
        borrow_index: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if self.is_zero(principal) {
            return principal.clone();
        }
        require!(!self.is_zero(interest_index), ERROR_ARITHMETIC_INVARIANT);

        let scale = principal.scale();
        let grown = self.mul_down(principal, borrow_index, WAD_PRECISION);
        self.div_down(&grown, interest_index, WAD_PRECISION)
            .rescale(scale)
    }
}
