multiversx_sc::imports!();

use common_errors::{ERROR_INVALID_ASSET, ERROR_SWAP_ROUTER_NOT_SET};
use common_proxies::dex::router;
use common_structs::{MarketConfig, PoolState};

use crate::{ledger, market, oracle, storage};

#[multiversx_sc::module]
pub trait RewardsModule:
    storage::Storage
    + market::MarketModule
    + oracle::OracleModule
    + ledger::LedgerModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
    + common_rates::InterestRates
{
    /// Claims the market's liquidity mining rewards, turns them into the underlying
    /// and supplies the proceeds back, crediting the minted shares to the reward index.
    ///
    /// Skipped while the pool has no free shares. Returns the underlying supplied, at
    /// the asset's decimals.
    fn compound_rewards(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        pool: &mut PoolState<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let nothing = self.to_decimal(BigUint::zero(), config.asset_decimals);
        if !pool.has_free_shares() {
            return nothing;
        }

        let reward_mapper = self.market_reward_token(config.market_address.clone());
        if reward_mapper.is_empty() {
            return nothing;
        }
        let reward_token = reward_mapper.get();

        let claimed = self.market_claim_rewards(config);
        if claimed == 0 {
            return nothing;
        }

        let proceeds = if EgldOrEsdtTokenIdentifier::esdt(reward_token.clone()) == *underlying {
            claimed.clone()
        } else {
            self.swap_rewards(&reward_token, &claimed, underlying)
        };
        if proceeds == 0 {
            return nothing;
        }

        let minted = self.market_supply(underlying, config, &proceeds);
        self.distribute_rewards(pool, &minted);
        self.rewards_compounded_event(underlying, &claimed, &proceeds, &minted);

        self.to_decimal(proceeds, config.asset_decimals)
    }

    /// Sells `amount` of the reward token for the underlying through the swap router.
    fn swap_rewards(
        &self,
        reward_token: &TokenIdentifier,
        amount: &BigUint,
        underlying: &EgldOrEsdtTokenIdentifier,
    ) -> BigUint {
        let router_mapper = self.swap_router();
        require!(!router_mapper.is_empty(), ERROR_SWAP_ROUTER_NOT_SET);
        require!(underlying.is_esdt(), ERROR_INVALID_ASSET);

        let wanted = underlying.clone().unwrap_esdt();
        let back_transfers = self
            .router_proxy(router_mapper.get())
            .swap_tokens_fixed_input(wanted.clone(), BigUint::from(1u64))
            .single_esdt(reward_token, 0, amount)
            .returns(ReturnsBackTransfersLegacyReset)
            .sync_call();

        let mut received = BigUint::zero();
        for payment in back_transfers.esdt_payments.iter() {
            if payment.token_identifier == wanted {
                received += &payment.amount;
            }
        }

        received
    }

    #[proxy]
    fn router_proxy(&self, sc_address: ManagedAddress) -> router::ProxyTo<Self::Api>;
}
