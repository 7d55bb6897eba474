#![no_std]

use common_structs::FeedRound;

multiversx_sc::imports!();

/// Single-asset USD price feed. Consumers read `latest_round` straight from storage
/// and must ignore it while the feed is paused.
#[multiversx_sc::contract]
pub trait FeedMock: multiversx_sc_modules::pause::PauseModule {
    #[init]
    fn init(&self) {}

    #[upgrade]
    fn upgrade(&self) {}

    /// Publishes a round stamped with the current block timestamp.
    #[only_owner]
    #[endpoint(submitRound)]
    fn submit_round(&self, price: BigUint, decimals: u8) {
        let timestamp = self.blockchain().get_block_timestamp();
        self.submit_round_at(price, decimals, timestamp);
    }

    #[only_owner]
    #[endpoint(submitRoundAt)]
    fn submit_round_at(&self, price: BigUint, decimals: u8, timestamp: u64) {
        sc_print!("feed round: {}", price);
        self.latest_round().set(FeedRound {
            price,
            decimals,
            timestamp,
        });
    }

    #[view(getLatestRound)]
    #[storage_mapper("latest_round")]
    fn latest_round(&self) -> SingleValueMapper<FeedRound<Self::Api>>;
}
