multiversx_sc::imports!();

use common_constants::{
    DELEVERAGE_TARGET_BPS, DELEVERAGE_TRIGGER_BPS, MICRO_LEVERAGE_MARGIN_BPS, UNWIND_SAFETY_BPS,
    WAD_PRECISION,
};
use common_errors::ERROR_ARITHMETIC_INVARIANT;
use common_structs::{AccrualResult, MarketSnapshot};

/// The RiskModule projects a lending market "as of the current block" and derives the
/// safety bounds every leverage decision of the vault is taken against.
///
/// **Scope**: Pure functions of a `MarketSnapshot`. Nothing here reads storage or
/// calls another contract, so the same snapshot always yields the same answers.
///
/// **Units**: Every amount of the snapshot and every result is normalized to 18
/// decimals; ratios and rates are WAD based.
#[multiversx_sc::module]
pub trait RiskModule: common_math::SharedMathModule + common_rates::InterestRates {
    fn accrued_totals(&self, snapshot: &MarketSnapshot<Self::Api>) -> AccrualResult<Self::Api> {
        self.simulate_accrual(
            &snapshot.cash,
            &snapshot.total_borrows,
            &snapshot.total_reserves,
            &snapshot.borrow_index,
            &snapshot.reserve_factor,
            &snapshot.rate_model,
            snapshot.current_block.saturating_sub(snapshot.accrual_block),
        )
    }

    /// Borrow balance of the account at the market's last accrual.
    fn stored_borrow(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let account_borrow = &snapshot.account_borrow;
        if self.is_zero(&account_borrow.principal) {
            return self.wad_zero();
        }

        self.borrow_balance(
            &account_borrow.principal,
            &account_borrow.interest_index,
            &snapshot.borrow_index,
        )
    }

    /// Borrow balance of the account as if the market accrued interest right now.
    ///
    /// **Formula**: `stored_balance * accrued_total_borrows / stored_total_borrows`.
    fn current_borrow(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let stored = self.stored_borrow(snapshot);
        if snapshot.current_block == snapshot.accrual_block || self.is_zero(&stored) {
            return stored;
        }

        require!(
            !self.is_zero(&snapshot.total_borrows),
            ERROR_ARITHMETIC_INVARIANT
        );

        let accrued = self.accrued_totals(snapshot);
        let grown = self.mul_down(&stored, &accrued.total_borrows, WAD_PRECISION);
        self.div_down(&grown, &snapshot.total_borrows, WAD_PRECISION)
    }

    fn current_exchange_rate(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let accrued = self.accrued_totals(snapshot);
        self.exchange_rate(
            &snapshot.cash,
            &accrued.total_borrows,
            &accrued.total_reserves,
            &snapshot.total_shares,
            &snapshot.initial_exchange_rate,
        )
    }

    /// Underlying value of the account's market shares after accrual.
    fn current_supply(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.mul_down(
            &snapshot.account_shares,
            &self.current_exchange_rate(snapshot),
            WAD_PRECISION,
        )
    }

    /// Borrow rate per block once `amount` more is borrowed. The amount is capped at
    /// the available cash.
    fn predict_borrow_rate(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let accrued = self.accrued_totals(snapshot);
        let added = self.capped_by_cash(snapshot, amount);

        self.borrow_rate_per_block(
            &(snapshot.cash.clone() - added.clone()),
            &(accrued.total_borrows + added),
            &accrued.total_reserves,
            &snapshot.rate_model,
        )
    }

    fn predict_supply_rate(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let accrued = self.accrued_totals(snapshot);
        let added = self.capped_by_cash(snapshot, amount);

        self.supply_rate_per_block(
            &(snapshot.cash.clone() - added.clone()),
            &(accrued.total_borrows + added),
            &accrued.total_reserves,
            &snapshot.reserve_factor,
            &snapshot.rate_model,
        )
    }

    /// Highest borrow-to-supply ratio worth holding.
    ///
    /// **Formula**: `min(collateral_factor * limit_fraction, supply_rate / borrow_rate)`,
    /// the markdown alone while the borrow rate is zero.
    fn safe_collateral_ratio(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        limit_fraction: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let markdown = self.mul_down(&snapshot.collateral_factor, limit_fraction, WAD_PRECISION);
        let nothing = self.wad_zero();

        let borrow_rate = self.predict_borrow_rate(snapshot, &nothing);
        if self.is_zero(&borrow_rate) {
            return markdown;
        }

        let supply_rate = self.predict_supply_rate(snapshot, &nothing);
        let rate_ratio = self.div_down(&supply_rate, &borrow_rate, WAD_PRECISION);

        self.get_min(markdown, rate_ratio)
    }

    /// Extra amount the account can borrow and re-supply while staying under the safe
    /// ratio and while the position still earns more than it pays.
    fn safe_borrow_amount(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        limit_fraction: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let supply = self.current_supply(snapshot);
        let borrow = self.current_borrow(snapshot);
        let ratio = self.safe_collateral_ratio(snapshot, limit_fraction);
        let max_borrow = self.mul_down(&supply, &ratio, WAD_PRECISION);

        if borrow >= max_borrow || self.is_zero(&snapshot.cash) {
            return self.wad_zero();
        }

        let headroom = max_borrow - borrow.clone();
        if !self.is_zero(&borrow) {
            let margin = self.mul_down(
                &borrow,
                &self.bps_to_wad(MICRO_LEVERAGE_MARGIN_BPS),
                WAD_PRECISION,
            );
            if headroom <= margin {
                return self.wad_zero();
            }
        }

        let candidate = self.get_min(headroom, snapshot.cash.clone());
        let cost = self.projected_cost(snapshot, &candidate, &borrow);
        let profit = self.projected_profit(snapshot, &candidate, &supply, &borrow);
        if cost > profit {
            return self.wad_zero();
        }

        candidate
    }

    /// Interest paid per block, in USD, once `candidate` more is borrowed.
    fn projected_cost(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        candidate: &ManagedDecimal<Self::Api, NumDecimals>,
        borrow: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let borrow_rate = self.predict_borrow_rate(snapshot, candidate);
        let new_borrow = borrow.clone() + candidate.clone();
        let interest = self.mul_down(&borrow_rate, &new_borrow, WAD_PRECISION);

        self.mul_down(&interest, &snapshot.underlying_price, WAD_PRECISION)
    }

    /// Interest earned plus liquidity mining rewards per block, in USD, once
    /// `candidate` more is borrowed and re-supplied.
    fn projected_profit(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        candidate: &ManagedDecimal<Self::Api, NumDecimals>,
        supply: &ManagedDecimal<Self::Api, NumDecimals>,
        borrow: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let supply_rate = self.predict_supply_rate(snapshot, candidate);
        let new_supply = supply.clone() + candidate.clone();
        let interest = self.mul_down(&supply_rate, &new_supply, WAD_PRECISION);
        let interest_value = self.mul_down(&interest, &snapshot.underlying_price, WAD_PRECISION);

        let accrued = self.accrued_totals(snapshot);
        let new_total_borrows = accrued.total_borrows + candidate.clone();
        let borrow_share = if self.is_zero(&new_total_borrows) {
            self.wad_zero()
        } else {
            self.div_down(
                &(borrow.clone() + candidate.clone()),
                &new_total_borrows,
                WAD_PRECISION,
            )
        };
        let borrow_rewards = self.mul_down(
            &self.mul_down(&snapshot.borrow_reward_speed, &borrow_share, WAD_PRECISION),
            &snapshot.reward_price,
            WAD_PRECISION,
        );

        let supply_share = if self.is_zero(&snapshot.total_shares) {
            self.wad_zero()
        } else {
            self.div_down(&snapshot.account_shares, &snapshot.total_shares, WAD_PRECISION)
        };
        let supply_rewards = self.mul_down(
            &self.mul_down(&snapshot.supply_reward_speed, &supply_share, WAD_PRECISION),
            &snapshot.reward_price,
            WAD_PRECISION,
        );

        interest_value + borrow_rewards + supply_rewards
    }

    /// Underlying that can leave the market without pushing the position above the
    /// safe ratio.
    fn safe_redeem_amount(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        limit_fraction: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let supply = self.current_supply(snapshot);
        let borrow = self.current_borrow(snapshot);
        if self.is_zero(&borrow) {
            return self.get_min(supply, snapshot.cash.clone());
        }

        let ratio = self.safe_collateral_ratio(snapshot, limit_fraction);
        require!(!self.is_zero(&ratio), ERROR_ARITHMETIC_INVARIANT);

        let locked = self.div_up(&borrow, &ratio, WAD_PRECISION);
        self.get_min(self.sub_or_zero(&supply, &locked), snapshot.cash.clone())
    }

    /// Redeem-and-repay amount bringing an over-levered position back to the target.
    ///
    /// - `markdown = collateral_factor * limit_fraction`
    /// - triggers once `borrow > supply * min(markdown / 0.85, collateral_factor)`
    /// - lands on `target = markdown * 0.95`: `x = (borrow - target * supply) / (1 - target)`
    ///
    /// The result is capped by the borrow and by the market cash only; the caller
    /// splits it into steps the market accepts.
    fn deleverage_amount(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        limit_fraction: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let borrow = self.current_borrow(snapshot);
        if self.is_zero(&borrow) {
            return self.wad_zero();
        }

        let supply = self.current_supply(snapshot);
        let markdown = self.mul_down(&snapshot.collateral_factor, limit_fraction, WAD_PRECISION);
        let trigger_ratio = self.get_min(
            self.div_down(
                &markdown,
                &self.bps_to_wad(DELEVERAGE_TRIGGER_BPS),
                WAD_PRECISION,
            ),
            snapshot.collateral_factor.clone(),
        );
        if borrow <= self.mul_down(&supply, &trigger_ratio, WAD_PRECISION) {
            return self.wad_zero();
        }

        let target_ratio = self.mul_down(
            &markdown,
            &self.bps_to_wad(DELEVERAGE_TARGET_BPS),
            WAD_PRECISION,
        );
        let free_fraction = self.sub_or_zero(&self.wad(), &target_ratio);
        require!(!self.is_zero(&free_fraction), ERROR_ARITHMETIC_INVARIANT);

        let excess = self.sub_or_zero(
            &borrow,
            &self.mul_down(&target_ratio, &supply, WAD_PRECISION),
        );
        let amount = self.div_up(&excess, &free_fraction, WAD_PRECISION);

        self.get_min(self.get_min(amount, borrow), snapshot.cash.clone())
    }

    /// Largest redeem a single unwinding step may take before repaying.
    ///
    /// **Formula**: `min(supply - borrow / (collateral_factor * 0.95), borrow, cash)`.
    fn unwind_redeem_amount(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let borrow = self.current_borrow(snapshot);
        if self.is_zero(&borrow) {
            return self.wad_zero();
        }

        let supply = self.current_supply(snapshot);
        let unwind_ratio = self.mul_down(
            &snapshot.collateral_factor,
            &self.bps_to_wad(UNWIND_SAFETY_BPS),
            WAD_PRECISION,
        );
        require!(!self.is_zero(&unwind_ratio), ERROR_ARITHMETIC_INVARIANT);

        let locked = self.div_up(&borrow, &unwind_ratio, WAD_PRECISION);
        let redeemable = self.get_min(self.sub_or_zero(&supply, &locked), borrow);

        self.get_min(redeemable, snapshot.cash.clone())
    }

    fn capped_by_cash(
        &self,
        snapshot: &MarketSnapshot<Self::Api>,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.get_min(amount.rescale(WAD_PRECISION), snapshot.cash.clone())
    }
}
