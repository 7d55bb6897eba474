multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_errors::ERROR_INSUFFICIENT_BALANCE;
use common_structs::{PoolState, PositionLedgerEntry};

/// Per-share accumulator bookkeeping of the pooled position.
///
/// Rewards and losses are spread over `total_free_shares` by raising a global index;
/// an entry realizes `share_balance * (index - paid_index)` on its next settlement.
/// `total_free_shares` only moves together with some entry's `share_balance`, which
/// keeps `sum(share_balance) == total_free_shares`.
#[multiversx_sc::module]
pub trait LedgerModule: common_math::SharedMathModule {
    fn pending_reward_shares(
        &self,
        pool: &PoolState<Self::Api>,
        entry: &PositionLedgerEntry<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.accrued_since(
            &entry.share_balance,
            &pool.total_reward_index,
            &entry.rewards_paid_index,
        )
    }

    /// Shares lost since the entry's last settlement, never more than its balance.
    fn pending_loss_shares(
        &self,
        pool: &PoolState<Self::Api>,
        entry: &PositionLedgerEntry<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let loss = self.accrued_since(
            &entry.share_balance,
            &pool.total_loss_index,
            &entry.loss_paid_index,
        );

        self.get_min(loss, entry.share_balance.clone())
    }

    /// Spreads `reward_shares` over the free shares. No-op on an empty pool.
    fn distribute_rewards(
        &self,
        pool: &mut PoolState<Self::Api>,
        reward_shares: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        if !pool.has_free_shares() || self.is_zero(reward_shares) {
            return;
        }

        let increase = self.index_increase(reward_shares, &pool.total_free_shares);
        pool.total_reward_index += increase;
    }

    /// Spreads `loss_shares` over the free shares. No-op on an empty pool.
    fn distribute_loss(
        &self,
        pool: &mut PoolState<Self::Api>,
        loss_shares: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        if !pool.has_free_shares() || self.is_zero(loss_shares) {
            return;
        }

        let increase = self.index_increase(loss_shares, &pool.total_free_shares);
        pool.total_loss_index += increase;
    }

    /// Brings an entry up to date with both accumulators.
    ///
    /// The loss is always deducted. Pending rewards are computed on the balance held
    /// over the period; with `credit_rewards` they are added to the balance, otherwise
    /// the caller pays them out. Returns the reward shares.
    fn settle_entry(
        &self,
        pool: &mut PoolState<Self::Api>,
        entry: &mut PositionLedgerEntry<Self::Api>,
        credit_rewards: bool,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let rewards = self.pending_reward_shares(pool, entry);
        let loss = self.pending_loss_shares(pool, entry);

        self.remove_shares(pool, entry, &loss);
        entry.loss_paid_index = pool.total_loss_index.clone();
        entry.rewards_paid_index = pool.total_reward_index.clone();

        if credit_rewards {
            self.add_shares(pool, entry, &rewards);
        }

        rewards
    }

    fn add_shares(
        &self,
        pool: &mut PoolState<Self::Api>,
        entry: &mut PositionLedgerEntry<Self::Api>,
        shares: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        entry.share_balance += shares.clone();
        pool.total_free_shares += shares.clone();
    }

    fn remove_shares(
        &self,
        pool: &mut PoolState<Self::Api>,
        entry: &mut PositionLedgerEntry<Self::Api>,
        shares: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        require!(shares <= &entry.share_balance, ERROR_INSUFFICIENT_BALANCE);

        entry.share_balance -= shares.clone();
        pool.total_free_shares = self.sub_or_zero(&pool.total_free_shares, shares);
    }

    /// Pegged liability backing `share_amount` of the entry's shares.
    fn principal_share(
        &self,
        entry: &PositionLedgerEntry<Self::Api>,
        share_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if !entry.has_shares() {
            return self.wad_zero();
        }
        if share_amount == &entry.share_balance {
            return entry.principal.clone();
        }

        let scaled = self.mul_down(&entry.principal, share_amount, WAD_PRECISION);
        self.div_down(&scaled, &entry.share_balance, WAD_PRECISION)
    }
}
