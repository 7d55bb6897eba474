#![no_std]

use common_constants::WAD;

multiversx_sc::imports!();

pub static ERROR_UNKNOWN_POOL: &[u8] = b"Unknown pool";
pub static ERROR_WRONG_STAKE_TOKEN: &[u8] = b"Wrong token for this pool";
pub static ERROR_UNSTAKE_TOO_LARGE: &[u8] = b"Unstake amount exceeds the stake";

/// MasterChef style farm. Every pool emits `reward_per_block` reward tokens split
/// pro rata among its stakers; pool `0` conventionally stakes the reward token itself.
#[multiversx_sc::contract]
pub trait FarmMock {
    #[init]
    fn init(&self, reward_token: TokenIdentifier) {
        self.reward_token().set(reward_token);
    }

    #[upgrade]
    fn upgrade(&self) {}

    #[only_owner]
    #[endpoint(addPool)]
    fn add_pool(&self, pool_id: u32, stake_token: TokenIdentifier, reward_per_block: BigUint) {
        self.stake_token(pool_id).set(stake_token);
        self.reward_per_block(pool_id).set(reward_per_block);
        self.last_reward_block(pool_id)
            .set(self.blockchain().get_block_nonce());
    }

    #[payable]
    #[endpoint]
    fn stake(&self, pool_id: u32) {
        let payment = self.call_value().single_esdt();
        self.require_pool(pool_id);
        require!(
            payment.token_identifier == self.stake_token(pool_id).get(),
            ERROR_WRONG_STAKE_TOKEN
        );

        let caller = self.blockchain().get_caller();
        self.update_pool(pool_id);
        self.settle(pool_id, &caller);

        self.user_stake(pool_id, &caller)
            .update(|stake| *stake += &payment.amount);
        self.total_staked(pool_id)
            .update(|total| *total += &payment.amount);
    }

    #[endpoint]
    fn unstake(&self, pool_id: u32, amount: BigUint) {
        self.require_pool(pool_id);
        let caller = self.blockchain().get_caller();
        self.update_pool(pool_id);
        self.settle(pool_id, &caller);

        let stake_mapper = self.user_stake(pool_id, &caller);
        require!(amount <= stake_mapper.get(), ERROR_UNSTAKE_TOO_LARGE);

        stake_mapper.update(|stake| *stake -= &amount);
        self.total_staked(pool_id).update(|total| *total -= &amount);

        self.tx()
            .to(&caller)
            .single_esdt(&self.stake_token(pool_id).get(), 0, &amount)
            .transfer_if_not_empty();
    }

    #[endpoint]
    fn harvest(&self, pool_id: u32) -> BigUint {
        self.require_pool(pool_id);
        let caller = self.blockchain().get_caller();
        self.update_pool(pool_id);
        self.settle(pool_id, &caller);

        let amount = self.unpaid(pool_id, &caller).take();
        self.tx()
            .to(&caller)
            .single_esdt(&self.reward_token().get(), 0, &amount)
            .transfer_if_not_empty();

        amount
    }

    #[view(getPendingRewards)]
    fn get_pending_rewards(&self, pool_id: u32, account: ManagedAddress) -> BigUint {
        let index = self.acc_reward_per_share(pool_id).get() + self.pending_index_increase(pool_id);
        let paid = self.user_index_paid(pool_id, &account).get();
        let stake = self.user_stake(pool_id, &account).get();

        self.unpaid(pool_id, &account).get() + stake * (index - paid) / BigUint::from(WAD)
    }

    fn require_pool(&self, pool_id: u32) {
        require!(!self.stake_token(pool_id).is_empty(), ERROR_UNKNOWN_POOL);
    }

    fn pending_index_increase(&self, pool_id: u32) -> BigUint {
        let total = self.total_staked(pool_id).get();
        let current_block = self.blockchain().get_block_nonce();
        let last_block = self.last_reward_block(pool_id).get();
        if total == 0 || current_block <= last_block {
            return BigUint::zero();
        }

        let emitted = self.reward_per_block(pool_id).get() * (current_block - last_block);
        emitted * BigUint::from(WAD) / total
    }

    fn update_pool(&self, pool_id: u32) {
        let increase = self.pending_index_increase(pool_id);
        self.acc_reward_per_share(pool_id)
            .update(|index| *index += increase);
        self.last_reward_block(pool_id)
            .set(self.blockchain().get_block_nonce());
    }

    fn settle(&self, pool_id: u32, account: &ManagedAddress) {
        let index = self.acc_reward_per_share(pool_id).get();
        let paid = self.user_index_paid(pool_id, account).get();
        let stake = self.user_stake(pool_id, account).get();

        let earned = stake * (&index - &paid) / BigUint::from(WAD);
        self.unpaid(pool_id, account).update(|unpaid| *unpaid += earned);
        self.user_index_paid(pool_id, account).set(index);
    }

    #[view(getRewardToken)]
    #[storage_mapper("reward_token")]
    fn reward_token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[storage_mapper("stake_token")]
    fn stake_token(&self, pool_id: u32) -> SingleValueMapper<TokenIdentifier>;

    #[storage_mapper("reward_per_block")]
    fn reward_per_block(&self, pool_id: u32) -> SingleValueMapper<BigUint>;

    #[storage_mapper("last_reward_block")]
    fn last_reward_block(&self, pool_id: u32) -> SingleValueMapper<u64>;

    #[storage_mapper("acc_reward_per_share")]
    fn acc_reward_per_share(&self, pool_id: u32) -> SingleValueMapper<BigUint>;

    #[view(getTotalStaked)]
    #[storage_mapper("total_staked")]
    fn total_staked(&self, pool_id: u32) -> SingleValueMapper<BigUint>;

    #[view(getUserStake)]
    #[storage_mapper("user_stake")]
    fn user_stake(&self, pool_id: u32, account: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[storage_mapper("user_index_paid")]
    fn user_index_paid(&self, pool_id: u32, account: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[storage_mapper("unpaid")]
    fn unpaid(&self, pool_id: u32, account: &ManagedAddress) -> SingleValueMapper<BigUint>;
}
