multiversx_sc::imports!();

use common_constants::WAD_PRECISION;
use common_errors::{
    ERROR_ARITHMETIC_INVARIANT, ERROR_INSUFFICIENT_LIQUIDITY, ERROR_PEGGED_PAYMENT_TOO_SMALL,
    ERROR_WRONG_PAYMENT_TOKEN,
};
use common_structs::MarketConfig;

use crate::{ledger, market, oracle, rewards, risk, storage, validation};

use super::pool;

#[multiversx_sc::module]
pub trait WithdrawModule:
    storage::Storage
    + pool::PoolModule
    + market::MarketModule
    + oracle::OracleModule
    + rewards::RewardsModule
    + risk::RiskModule
    + ledger::LedgerModule
    + validation::ValidationModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
    + common_rates::InterestRates
{
    /// Burns `share_amount` of the caller's shares and pays out their underlying value
    /// together with the caller's pending reward shares.
    ///
    /// The payment must carry the pegged token backing the burned shares; any excess is
    /// refunded. Leverage is unwound when the idle balance plus the safe redeem amount
    /// cannot cover the payout. Works while the vault is paused.
    #[payable]
    #[endpoint(withdraw)]
    fn withdraw(&self, underlying: EgldOrEsdtTokenIdentifier, share_amount: BigUint) {
        self.require_amount_greater_than_zero(&share_amount);
        let config = self.require_market(&underlying);
        let caller = self.blockchain().get_caller();
        let shares = self.to_decimal(share_amount, config.asset_decimals);

        let mut pool = self.begin_pool_action(&underlying, &config, &BigUint::zero());

        let mut entry = self.load_entry(&underlying, &caller, config.asset_decimals);
        let reward_shares = self.settle_entry(&mut pool, &mut entry, false);

        let liability = self.principal_share(&entry, &shares);
        self.remove_shares(&mut pool, &mut entry, &shares);

        let burned = liability.into_raw_units().clone();
        self.burn_pegged_payment(&config, &caller, &burned);

        entry.principal = self.sub_or_zero(&entry.principal, &liability);
        self.store_entry(&underlying, &caller, &entry);

        let exchange_rate = self.current_exchange_rate(&self.market_snapshot(&config));
        require!(!self.is_zero(&exchange_rate), ERROR_ARITHMETIC_INVARIANT);
        let payout = self.mul_down(
            &(shares.clone() + reward_shares.clone()),
            &exchange_rate,
            WAD_PRECISION,
        );
        let payout_amount = self.denormalize_raw(&payout, config.asset_decimals);

        self.redeem_for_withdrawal(&underlying, &config, &payout_amount);
        if payout_amount > 0 {
            self.tx()
                .to(&caller)
                .egld_or_single_esdt(&underlying, 0, &payout_amount)
                .transfer();
        }

        self.end_pool_action(&underlying, &config, &mut pool);
        self.withdraw_event(
            &caller,
            &underlying,
            &shares,
            &reward_shares,
            &payout_amount,
            &burned,
        );
    }

    /// Takes `required` pegged tokens out of the call's payments and burns them.
    fn burn_pegged_payment(
        &self,
        config: &MarketConfig<Self::Api>,
        caller: &ManagedAddress,
        required: &BigUint,
    ) {
        let payments = self.call_value().all_esdt_transfers();

        let mut paid = BigUint::zero();
        for payment in payments.iter() {
            require!(
                payment.token_identifier == config.pegged_token,
                ERROR_WRONG_PAYMENT_TOKEN
            );
            paid += &payment.amount;
        }
        require!(&paid >= required, ERROR_PEGGED_PAYMENT_TOO_SMALL);

        if required > &BigUint::zero() {
            self.send()
                .esdt_local_burn(&config.pegged_token, 0, required);
        }

        let excess = paid - required;
        self.tx()
            .to(caller)
            .single_esdt(&config.pegged_token, 0, &excess)
            .transfer_if_not_empty();
    }

    /// Makes `target` of the underlying available in the vault's own balance.
    ///
    /// Unwinds leverage first when even the safe redeem amount falls short, then
    /// redeems the remaining shortfall in one go.
    fn redeem_for_withdrawal(
        &self,
        underlying: &EgldOrEsdtTokenIdentifier,
        config: &MarketConfig<Self::Api>,
        target: &BigUint,
    ) {
        let limit_fraction = self.limit_fraction().get();
        let limits = self.loop_limits().get();
        let dust = self.whole_units(1);
        let wanted = self.normalize(target, config.asset_decimals);

        for _ in 0..limits.withdraw_unwind {
            let snapshot = self.market_snapshot(config);
            let available = self.normalize(
                &self.blockchain().get_sc_balance(underlying, 0),
                config.asset_decimals,
            ) + self.safe_redeem_amount(&snapshot, &limit_fraction);
            if available >= wanted {
                break;
            }

            let step = self.unwind_redeem_amount(&snapshot);
            if step < dust {
                break;
            }

            let step_amount = self.denormalize_raw(&step, config.asset_decimals);
            self.redeem_and_repay(underlying, config, &step_amount);
        }

        let idle = self.blockchain().get_sc_balance(underlying, 0);
        if &idle >= target {
            return;
        }

        let shortfall = target - &idle;
        let snapshot = self.market_snapshot(config);
        let redeemable = self.denormalize_raw(
            &self.safe_redeem_amount(&snapshot, &limit_fraction),
            config.asset_decimals,
        );
        require!(redeemable >= shortfall, ERROR_INSUFFICIENT_LIQUIDITY);

        self.market_redeem_underlying(config, &shortfall);
    }
}
