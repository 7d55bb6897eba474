#![no_std]

use common_constants::{
    DELEVERAGE_ITERATIONS, REPAY_ALL_ITERATIONS, WAD_PRECISION, WITHDRAW_UNWIND_ITERATIONS,
};

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

fn zero_decimal<M: ManagedTypeApi>(decimals: usize) -> ManagedDecimal<M, NumDecimals> {
    ManagedDecimal::from_raw_units(BigUint::zero(), decimals)
}

/// Jump rate model parameters of a lending market, all per block and WAD based.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct RateModelParams<M: ManagedTypeApi> {
    pub base_rate_per_block: ManagedDecimal<M, NumDecimals>,
    pub multiplier_per_block: ManagedDecimal<M, NumDecimals>,
    pub jump_multiplier_per_block: ManagedDecimal<M, NumDecimals>,
    pub kink: ManagedDecimal<M, NumDecimals>,
}

/// Borrow balance of an account as last written by the market.
///
/// The live balance is `principal * borrow_index / interest_index`.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct BorrowSnapshot<M: ManagedTypeApi> {
    pub principal: ManagedDecimal<M, NumDecimals>,
    pub interest_index: ManagedDecimal<M, NumDecimals>,
}

impl<M: ManagedTypeApi> BorrowSnapshot<M> {
    pub fn empty(decimals: usize) -> Self {
        BorrowSnapshot {
            principal: zero_decimal(decimals),
            interest_index: zero_decimal(WAD_PRECISION),
        }
    }
}

/// Totals of a market after simulating (or applying) interest accrual.
#[derive(Clone)]
pub struct AccrualResult<M: ManagedTypeApi> {
    pub total_borrows: ManagedDecimal<M, NumDecimals>,
    pub total_reserves: ManagedDecimal<M, NumDecimals>,
    pub borrow_index: ManagedDecimal<M, NumDecimals>,
}

/// Latest answer published by a price feed. `price` is expressed with `decimals` decimals.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct FeedRound<M: ManagedTypeApi> {
    pub price: BigUint<M>,
    pub decimals: u8,
    pub timestamp: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PriceQuote {
    Usd,
    Native,
}

/// Pricing configuration of a single asset.
///
/// `twap_pair` is the DEX pair quoting the asset against the bridge token; a zero
/// address disables the fallback path.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct OracleConfig<M: ManagedTypeApi> {
    pub feed_address: ManagedAddress<M>,
    pub max_stale_seconds: u64,
    pub twap_pair: ManagedAddress<M>,
    pub asset_decimals: usize,
}

/// Fair-value pricing configuration of a two-asset LP token.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct LpOracleConfig<M: ManagedTypeApi> {
    pub pair_address: ManagedAddress<M>,
    pub first_token: EgldOrEsdtTokenIdentifier<M>,
    pub second_token: EgldOrEsdtTokenIdentifier<M>,
    pub lp_decimals: usize,
}

/// Registry entry linking an underlying asset to its lending market and pegged token.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct MarketConfig<M: ManagedTypeApi> {
    pub market_address: ManagedAddress<M>,
    pub pegged_token: TokenIdentifier<M>,
    pub asset_decimals: usize,
}

/// Pooled accounting of one underlying.
///
/// `total_free_shares` always equals the sum of every ledger entry's `share_balance`.
/// `last_known_free_underlying` only serves to detect losses between two actions.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct PoolState<M: ManagedTypeApi> {
    pub total_free_shares: ManagedDecimal<M, NumDecimals>,
    pub total_loss_index: ManagedDecimal<M, NumDecimals>,
    pub total_reward_index: ManagedDecimal<M, NumDecimals>,
    pub last_known_free_underlying: ManagedDecimal<M, NumDecimals>,
}

impl<M: ManagedTypeApi> PoolState<M> {
    pub fn new(asset_decimals: usize) -> Self {
        PoolState {
            total_free_shares: zero_decimal(asset_decimals),
            total_loss_index: zero_decimal(WAD_PRECISION),
            total_reward_index: zero_decimal(WAD_PRECISION),
            last_known_free_underlying: zero_decimal(asset_decimals),
        }
    }

    pub fn has_free_shares(&self) -> bool {
        self.total_free_shares.into_raw_units() > &BigUint::zero()
    }
}

/// Per user, per underlying position in the vault.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct PositionLedgerEntry<M: ManagedTypeApi> {
    pub principal: ManagedDecimal<M, NumDecimals>,
    pub share_balance: ManagedDecimal<M, NumDecimals>,
    pub rewards_paid_index: ManagedDecimal<M, NumDecimals>,
    pub loss_paid_index: ManagedDecimal<M, NumDecimals>,
}

impl<M: ManagedTypeApi> PositionLedgerEntry<M> {
    pub fn new(asset_decimals: usize) -> Self {
        PositionLedgerEntry {
            principal: zero_decimal(WAD_PRECISION),
            share_balance: zero_decimal(asset_decimals),
            rewards_paid_index: zero_decimal(WAD_PRECISION),
            loss_paid_index: zero_decimal(WAD_PRECISION),
        }
    }

    pub fn has_shares(&self) -> bool {
        self.share_balance.into_raw_units() > &BigUint::zero()
    }

    pub fn is_dormant(&self) -> bool {
        !self.has_shares() && self.principal.into_raw_units() == &BigUint::zero()
    }
}

/// Iteration caps of the bounded redeem-and-repay loops.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub struct LoopLimits {
    pub withdraw_unwind: usize,
    pub deleverage: usize,
    pub repay_all: usize,
}

impl Default for LoopLimits {
    fn default() -> Self {
        LoopLimits {
            withdraw_unwind: WITHDRAW_UNWIND_ITERATIONS,
            deleverage: DELEVERAGE_ITERATIONS,
            repay_all: REPAY_ALL_ITERATIONS,
        }
    }
}

/// By-value view of one lending market and one account inside it.
///
/// Amounts are normalized to 18 decimals; rates, indexes and prices are WAD based.
#[derive(Clone)]
pub struct MarketSnapshot<M: ManagedTypeApi> {
    pub cash: ManagedDecimal<M, NumDecimals>,
    pub total_borrows: ManagedDecimal<M, NumDecimals>,
    pub total_reserves: ManagedDecimal<M, NumDecimals>,
    pub total_shares: ManagedDecimal<M, NumDecimals>,
    pub initial_exchange_rate: ManagedDecimal<M, NumDecimals>,
    pub borrow_index: ManagedDecimal<M, NumDecimals>,
    pub accrual_block: u64,
    pub current_block: u64,
    pub rate_model: RateModelParams<M>,
    pub reserve_factor: ManagedDecimal<M, NumDecimals>,
    pub collateral_factor: ManagedDecimal<M, NumDecimals>,
    pub account_borrow: BorrowSnapshot<M>,
    pub account_shares: ManagedDecimal<M, NumDecimals>,
    pub supply_reward_speed: ManagedDecimal<M, NumDecimals>,
    pub borrow_reward_speed: ManagedDecimal<M, NumDecimals>,
    pub underlying_price: ManagedDecimal<M, NumDecimals>,
    pub reward_price: ManagedDecimal<M, NumDecimals>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PoolKind {
    /// Staked token and reward token are the same asset
    Single,
    /// LP tokens are staked, rewards are paid out in the reward token
    Lp,
}

/// Static configuration of an auto-compounding staking pool.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct StakingConfig<M: ManagedTypeApi> {
    pub kind: PoolKind,
    pub staked_token: TokenIdentifier<M>,
    pub reward_token: TokenIdentifier<M>,
    pub farm_address: ManagedAddress<M>,
    pub farm_pool_id: u32,
    pub base_pool_id: u32,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct StakingState<M: ManagedTypeApi> {
    pub total_staked: ManagedDecimal<M, NumDecimals>,
    pub reward_index: ManagedDecimal<M, NumDecimals>,
    pub unclaimed_rewards: ManagedDecimal<M, NumDecimals>,
}

impl<M: ManagedTypeApi> StakingState<M> {
    pub fn new(staked_decimals: usize, reward_decimals: usize) -> Self {
        StakingState {
            total_staked: zero_decimal(staked_decimals),
            reward_index: zero_decimal(WAD_PRECISION),
            unclaimed_rewards: zero_decimal(reward_decimals),
        }
    }

    pub fn has_stake(&self) -> bool {
        self.total_staked.into_raw_units() > &BigUint::zero()
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct StakerPosition<M: ManagedTypeApi> {
    pub amount: ManagedDecimal<M, NumDecimals>,
    pub reward_index_paid: ManagedDecimal<M, NumDecimals>,
}

impl<M: ManagedTypeApi> StakerPosition<M> {
    pub fn new(staked_decimals: usize) -> Self {
        StakerPosition {
            amount: zero_decimal(staked_decimals),
            reward_index_paid: zero_decimal(WAD_PRECISION),
        }
    }
}
