#![no_std]

use common_constants::WAD_PRECISION;
use common_structs::{BorrowSnapshot, RateModelParams};

pub mod storage;

multiversx_sc::imports!();

pub const SUCCESS: u64 = 0;
pub const ERROR_INSUFFICIENT_SHARES: u64 = 1;
pub const ERROR_INSUFFICIENT_CASH: u64 = 2;
pub const ERROR_INSUFFICIENT_COLLATERAL: u64 = 3;
pub const ERROR_BORROW_PAUSED: u64 = 4;

/// Single-asset lending market with per-block jump rate interest and liquidity mining.
///
/// Suppliers receive shares priced by the exchange rate; an account may borrow the same
/// asset against its own supply up to the collateral factor. Business failures answer
/// with a non-zero status code instead of reverting.
#[multiversx_sc::contract]
pub trait MarketMock:
    storage::Storage + common_math::SharedMathModule + common_rates::InterestRates
{
    #[init]
    fn init(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
        asset_decimals: usize,
        initial_exchange_rate: BigUint,
        rate_model: RateModelParams<Self::Api>,
        reserve_factor: BigUint,
        collateral_factor: BigUint,
    ) {
        self.underlying().set(&underlying);
        self.asset_decimals().set(asset_decimals);

        let zero = self.to_decimal(BigUint::zero(), asset_decimals);
        self.cash().set(&zero);
        self.total_borrows().set(&zero);
        self.total_reserves().set(&zero);
        self.total_shares().set(&zero);

        self.initial_exchange_rate()
            .set(self.to_decimal_wad(initial_exchange_rate));
        self.borrow_index().set(self.wad());
        self.rate_model().set(rate_model);
        self.reserve_factor().set(self.to_decimal_wad(reserve_factor));
        self.collateral_factor()
            .set(self.to_decimal_wad(collateral_factor));

        let current_block = self.blockchain().get_block_nonce();
        self.accrual_block().set(current_block);
        self.reward_block().set(current_block);
        self.reward_supply_index().set(self.wad_zero());
        self.reward_borrow_index().set(self.wad_zero());
    }

    #[upgrade]
    fn upgrade(&self) {}

    #[payable]
    #[endpoint]
    fn supply(&self) -> u64 {
        let (token, amount) = self.call_value().egld_or_single_fungible_esdt();
        require!(token == self.underlying().get(), "Wrong supply token");

        let caller = self.blockchain().get_caller();
        self.accrue();
        self.distribute_supplier_rewards(&caller);

        let decimals = self.asset_decimals().get();
        let amount = self.to_decimal(amount, decimals);
        let minted = self
            .div_down(&amount, &self.current_exchange_rate(), WAD_PRECISION)
            .rescale(decimals);

        self.shares(&caller)
            .set(self.account_shares(&caller) + minted.clone());
        self.total_shares().update(|total| *total += minted);
        self.cash().update(|cash| *cash += amount);

        SUCCESS
    }

    #[endpoint]
    fn redeem(&self, shares: BigUint) -> u64 {
        let caller = self.blockchain().get_caller();
        self.accrue();
        self.distribute_supplier_rewards(&caller);

        let decimals = self.asset_decimals().get();
        let shares = self.to_decimal(shares, decimals);
        let amount = self
            .mul_down(&shares, &self.current_exchange_rate(), WAD_PRECISION)
            .rescale(decimals);

        self.redeem_fresh(&caller, shares, amount)
    }

    #[endpoint(redeemUnderlying)]
    fn redeem_underlying(&self, amount: BigUint) -> u64 {
        let caller = self.blockchain().get_caller();
        self.accrue();
        self.distribute_supplier_rewards(&caller);

        let decimals = self.asset_decimals().get();
        let amount = self.to_decimal(amount, decimals);
        let shares_needed = self.div_up(&amount, &self.current_exchange_rate(), WAD_PRECISION);
        let shares = self.rescale_up(&shares_needed, decimals);

        self.redeem_fresh(&caller, shares, amount)
    }

    #[endpoint]
    fn borrow(&self, amount: BigUint) -> u64 {
        if self.borrow_paused().get() {
            return ERROR_BORROW_PAUSED;
        }

        let caller = self.blockchain().get_caller();
        self.accrue();
        self.distribute_borrower_rewards(&caller);

        let decimals = self.asset_decimals().get();
        let amount = self.to_decimal(amount, decimals);
        if amount > self.cash().get() {
            return ERROR_INSUFFICIENT_CASH;
        }

        let new_balance = self.account_borrow(&caller) + amount.clone();
        let supplied = self.account_supply(&caller);
        let max_borrow = self.mul_down(&supplied, &self.collateral_factor().get(), WAD_PRECISION);
        if new_balance > max_borrow.rescale(decimals) {
            return ERROR_INSUFFICIENT_COLLATERAL;
        }

        self.write_borrow(&caller, new_balance);
        self.total_borrows().update(|total| *total += amount.clone());
        self.cash().update(|cash| *cash -= amount.clone());

        self.tx()
            .to(&caller)
            .egld_or_single_esdt(&self.underlying().get(), 0, amount.into_raw_units())
            .transfer();

        SUCCESS
    }

    #[payable]
    #[endpoint(repayBorrow)]
    fn repay_borrow(&self) -> u64 {
        let (token, amount) = self.call_value().egld_or_single_fungible_esdt();
        require!(token == self.underlying().get(), "Wrong repay token");

        let caller = self.blockchain().get_caller();
        self.accrue();
        self.distribute_borrower_rewards(&caller);

        let decimals = self.asset_decimals().get();
        let paid = self.to_decimal(amount, decimals);
        let balance = self.account_borrow(&caller);
        let repaid = self.get_min(paid.clone(), balance.clone());
        let refund = paid - repaid.clone();

        self.write_borrow(&caller, balance - repaid.clone());
        let total_borrows = self.total_borrows().get();
        self.total_borrows()
            .set(self.sub_or_zero(&total_borrows, &repaid));
        self.cash().update(|cash| *cash += repaid);

        if !self.is_zero(&refund) {
            self.tx()
                .to(&caller)
                .egld_or_single_esdt(&token, 0, refund.into_raw_units())
                .transfer();
        }

        SUCCESS
    }

    #[endpoint(accrueInterest)]
    fn accrue_interest(&self) -> u64 {
        self.accrue();
        SUCCESS
    }

    #[endpoint(claimRewards)]
    fn claim_rewards(&self) -> BigUint {
        let caller = self.blockchain().get_caller();
        self.accrue();
        self.distribute_supplier_rewards(&caller);
        self.distribute_borrower_rewards(&caller);

        let accrued_mapper = self.reward_accrued(&caller);
        if accrued_mapper.is_empty() {
            return BigUint::zero();
        }

        let accrued = accrued_mapper.take();
        let amount = accrued.into_raw_units().clone();
        if amount > 0 {
            self.tx()
                .to(&caller)
                .single_esdt(&self.reward_token().get(), 0, &amount)
                .transfer();
        }

        amount
    }

    #[only_owner]
    #[endpoint(setCollateralFactor)]
    fn set_collateral_factor(&self, collateral_factor: BigUint) {
        self.accrue();
        self.collateral_factor()
            .set(self.to_decimal_wad(collateral_factor));
    }

    #[only_owner]
    #[endpoint(setBorrowPaused)]
    fn set_borrow_paused(&self, paused: bool) {
        self.borrow_paused().set(paused);
    }

    #[only_owner]
    #[endpoint(setRateModel)]
    fn set_rate_model(&self, rate_model: RateModelParams<Self::Api>) {
        self.accrue();
        self.rate_model().set(rate_model);
    }

    #[only_owner]
    #[endpoint(setReserveFactor)]
    fn set_reserve_factor(&self, reserve_factor: BigUint) {
        self.accrue();
        self.reserve_factor().set(self.to_decimal_wad(reserve_factor));
    }

    #[only_owner]
    #[endpoint(setRewardConfig)]
    fn set_reward_config(
        &self,
        reward_token: TokenIdentifier,
        reward_decimals: usize,
        supply_speed: BigUint,
        borrow_speed: BigUint,
    ) {
        self.accrue();
        self.reward_token().set(reward_token);
        self.reward_decimals().set(reward_decimals);
        self.supply_reward_speed()
            .set(self.to_decimal(supply_speed, reward_decimals));
        self.borrow_reward_speed()
            .set(self.to_decimal(borrow_speed, reward_decimals));
    }

    #[view(getExchangeRate)]
    fn current_exchange_rate(&self) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.exchange_rate(
            &self.cash().get(),
            &self.total_borrows().get(),
            &self.total_reserves().get(),
            &self.total_shares().get(),
            &self.initial_exchange_rate().get(),
        )
    }

    #[view(getAccountShares)]
    fn account_shares(&self, account: &ManagedAddress) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mapper = self.shares(account);
        if mapper.is_empty() {
            return self.to_decimal(BigUint::zero(), self.asset_decimals().get());
        }
        mapper.get()
    }

    #[view(getAccountSupply)]
    fn account_supply(&self, account: &ManagedAddress) -> ManagedDecimal<Self::Api, NumDecimals> {
        let decimals = self.asset_decimals().get();
        self.mul_down(
            &self.account_shares(account),
            &self.current_exchange_rate(),
            WAD_PRECISION,
        )
        .rescale(decimals)
    }

    #[view(getAccountBorrow)]
    fn account_borrow(&self, account: &ManagedAddress) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mapper = self.borrow_snapshot(account);
        if mapper.is_empty() {
            return self.to_decimal(BigUint::zero(), self.asset_decimals().get());
        }

        let snapshot = mapper.get();
        self.borrow_balance(
            &snapshot.principal,
            &snapshot.interest_index,
            &self.borrow_index().get(),
        )
    }

    fn redeem_fresh(
        &self,
        account: &ManagedAddress,
        shares: ManagedDecimal<Self::Api, NumDecimals>,
        amount: ManagedDecimal<Self::Api, NumDecimals>,
    ) -> u64 {
        let balance = self.account_shares(account);
        if shares > balance {
            return ERROR_INSUFFICIENT_SHARES;
        }
        if amount > self.cash().get() {
            return ERROR_INSUFFICIENT_CASH;
        }

        let decimals = self.asset_decimals().get();
        let borrowed = self.account_borrow(account);
        if !self.is_zero(&borrowed) {
            let remaining_shares = balance.clone() - shares.clone();
            let remaining_supply = self.mul_down(
                &remaining_shares,
                &self.current_exchange_rate(),
                WAD_PRECISION,
            );
            let max_borrow = self
                .mul_down(&remaining_supply, &self.collateral_factor().get(), WAD_PRECISION)
                .rescale(decimals);
            if borrowed > max_borrow {
                return ERROR_INSUFFICIENT_COLLATERAL;
            }
        }

        self.shares(account).set(balance - shares.clone());
        self.total_shares().update(|total| *total -= shares);
        self.cash().update(|cash| *cash -= amount.clone());

        if !self.is_zero(&amount) {
            self.tx()
                .to(account)
                .egld_or_single_esdt(&self.underlying().get(), 0, amount.into_raw_units())
                .transfer();
        }

        SUCCESS
    }

    fn write_borrow(
        &self,
        account: &ManagedAddress,
        balance: ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        self.borrow_snapshot(account).set(BorrowSnapshot {
            principal: balance,
            interest_index: self.borrow_index().get(),
        });
    }

    fn accrue(&self) {
        let current_block = self.blockchain().get_block_nonce();
        self.update_reward_indexes(current_block);

        let accrual_block = self.accrual_block().get();
        if current_block == accrual_block {
            return;
        }

        let result = self.simulate_accrual(
            &self.cash().get(),
            &self.total_borrows().get(),
            &self.total_reserves().get(),
            &self.borrow_index().get(),
            &self.reserve_factor().get(),
            &self.rate_model().get(),
            current_block - accrual_block,
        );

        self.total_borrows().set(result.total_borrows);
        self.total_reserves().set(result.total_reserves);
        self.borrow_index().set(result.borrow_index);
        self.accrual_block().set(current_block);
    }

    fn update_reward_indexes(&self, current_block: u64) {
        let reward_block = self.reward_block().get();
        if current_block == reward_block || self.reward_token().is_empty() {
            self.reward_block().set(current_block);
            return;
        }

        let blocks = self.to_decimal(BigUint::from(current_block - reward_block), 0);
        let total_shares = self.total_shares().get();
        if !self.is_zero(&total_shares) {
            let emitted = self.mul_down(&self.supply_reward_speed().get(), &blocks, WAD_PRECISION);
            let increase = self.index_increase(&emitted, &total_shares);
            self.reward_supply_index().update(|index| *index += increase);
        }

        let total_borrows = self.total_borrows().get();
        if !self.is_zero(&total_borrows) {
            let emitted = self.mul_down(&self.borrow_reward_speed().get(), &blocks, WAD_PRECISION);
            let increase = self.index_increase(&emitted, &total_borrows);
            self.reward_borrow_index().update(|index| *index += increase);
        }

        self.reward_block().set(current_block);
    }

    fn distribute_supplier_rewards(&self, account: &ManagedAddress) {
        let index = self.reward_supply_index().get();
        let paid_mapper = self.supplier_reward_index(account);
        let paid = if paid_mapper.is_empty() {
            self.wad_zero()
        } else {
            paid_mapper.get()
        };

        let earned = self.accrued_since(&self.account_shares(account), &index, &paid);
        self.credit_reward(account, earned);
        paid_mapper.set(index);
    }

    fn distribute_borrower_rewards(&self, account: &ManagedAddress) {
        let index = self.reward_borrow_index().get();
        let paid_mapper = self.borrower_reward_index(account);
        let paid = if paid_mapper.is_empty() {
            self.wad_zero()
        } else {
            paid_mapper.get()
        };

        let earned = self.accrued_since(&self.account_borrow(account), &index, &paid);
        self.credit_reward(account, earned);
        paid_mapper.set(index);
    }

    fn credit_reward(
        &self,
        account: &ManagedAddress,
        earned: ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        if self.reward_token().is_empty() || self.is_zero(&earned) {
            return;
        }

        let reward_decimals = self.reward_decimals().get();
        // earned carries the scale of the balance it was computed from
        let earned = earned.rescale(reward_decimals);
        let mapper = self.reward_accrued(account);
        let accrued = if mapper.is_empty() {
            self.to_decimal(BigUint::zero(), reward_decimals)
        } else {
            mapper.get()
        };
        mapper.set(accrued + earned);
    }
}
