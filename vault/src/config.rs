multiversx_sc::imports!();

use common_constants::{MAX_COMPOUND_DEPTH, MAX_DEPOSIT_FEE_BPS};
use common_errors::*;
use common_structs::{LoopLimits, LpOracleConfig, MarketConfig, OracleConfig, PoolState};

use crate::{market, oracle, storage, validation};

/// Owner-only governance of the vault: market registry, oracle sources and the risk
/// parameters every leverage loop reads.
///
/// Pausing and unpausing come from the pause module composed into the contract.
#[multiversx_sc::module]
pub trait ConfigModule:
    storage::Storage
    + market::MarketModule
    + oracle::OracleModule
    + validation::ValidationModule
    + common_events::EventsModule
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
    + common_rates::InterestRates
{
    /// Registers the lending market of `underlying` and the pegged token minted against
    /// its deposits. The vault must hold the local mint and burn roles of the pegged token.
    ///
    /// # Errors
    /// - `ERROR_MARKET_ALREADY_REGISTERED`
    /// - `ERROR_MARKET_UNDERLYING_MISMATCH`: the market lends another asset
    /// - `ERROR_INVALID_DECIMALS`: decimals above 18 or different from the market's
    #[only_owner]
    #[endpoint(addMarket)]
    fn add_market(
        &self,
        underlying: EgldOrEsdtTokenIdentifier,
        market_address: ManagedAddress,
        pegged_token: TokenIdentifier,
        asset_decimals: usize,
    ) {
        require!(
            !self.markets().contains(&underlying),
            ERROR_MARKET_ALREADY_REGISTERED
        );
        require!(underlying.is_valid(), ERROR_INVALID_ASSET);
        require!(pegged_token.is_valid_esdt_identifier(), ERROR_INVALID_ASSET);
        self.require_non_zero_address(&market_address);
        self.require_valid_decimals(asset_decimals);

        require!(
            self.market_underlying(market_address.clone()).get() == underlying,
            ERROR_MARKET_UNDERLYING_MISMATCH
        );
        require!(
            self.market_asset_decimals(market_address.clone()).get() == asset_decimals,
            ERROR_INVALID_DECIMALS
        );

        self.market_config(&underlying).set(MarketConfig {
            market_address: market_address.clone(),
            pegged_token: pegged_token.clone(),
            asset_decimals,
        });
        self.pool_state(&underlying).set(PoolState::new(asset_decimals));
        self.markets().insert(underlying.clone());

        self.add_market_event(&underlying, &market_address, &pegged_token, asset_decimals);
    }

    /// Deregisters a market once nothing is borrowed from it and no user holds shares.
    /// Ledger entries are left in place, all of them are zero at that point.
    #[only_owner]
    #[endpoint(removeMarket)]
    fn remove_market(&self, underlying: EgldOrEsdtTokenIdentifier) {
        let config = self.require_market(&underlying);
        let pool = self.pool_state(&underlying).get();

        require!(
            !pool.has_free_shares() && self.is_zero(&self.vault_borrow(&config)),
            ERROR_MARKET_NOT_EMPTY
        );

        self.markets().swap_remove(&underlying);
        self.market_config(&underlying).clear();
        self.pool_state(&underlying).clear();
        self.pool_lock(&underlying).clear();

        self.remove_market_event(&underlying, &config.market_address);
    }

    /// Sets the primary feed and the TWAP fallback of an asset. A zero `twap_pair`
    /// leaves the asset without a fallback.
    #[only_owner]
    #[endpoint(setTokenOracle)]
    fn set_token_oracle(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        asset_decimals: usize,
        feed_address: ManagedAddress,
        max_stale_seconds: u64,
        twap_pair: ManagedAddress,
    ) {
        require!(asset.is_valid(), ERROR_INVALID_ASSET);
        self.require_valid_decimals(asset_decimals);
        self.require_non_zero_address(&feed_address);

        self.token_oracle(&asset).set(OracleConfig {
            feed_address,
            max_stale_seconds,
            twap_pair,
            asset_decimals,
        });
    }

    #[only_owner]
    #[endpoint(setLpOracle)]
    fn set_lp_oracle(
        &self,
        lp_token: EgldOrEsdtTokenIdentifier,
        pair_address: ManagedAddress,
        first_token: EgldOrEsdtTokenIdentifier,
        second_token: EgldOrEsdtTokenIdentifier,
        lp_decimals: usize,
    ) {
        require!(lp_token.is_esdt(), ERROR_INVALID_ASSET);
        require!(first_token != second_token, ERROR_INVALID_ASSET);
        self.require_non_zero_address(&pair_address);
        self.require_valid_decimals(lp_decimals);

        self.lp_oracle(&lp_token).set(LpOracleConfig {
            pair_address,
            first_token,
            second_token,
            lp_decimals,
        });
    }

    #[only_owner]
    #[endpoint(setBridgeToken)]
    fn set_bridge_token(&self, token: EgldOrEsdtTokenIdentifier) {
        require!(token.is_valid(), ERROR_INVALID_ASSET);
        self.bridge_token().set(token);
    }

    #[only_owner]
    #[endpoint(setSafePriceView)]
    fn set_safe_price_view(&self, address: ManagedAddress) {
        self.require_non_zero_address(&address);
        self.safe_price_view().set(address);
    }

    /// `limit_fraction` is WAD based and must lie strictly between 0 and 1.
    #[only_owner]
    #[endpoint(setCollateralLimit)]
    fn set_collateral_limit(&self, limit_fraction: BigUint) {
        let limit_fraction = self.to_decimal_wad(limit_fraction);
        self.require_valid_limit_fraction(&limit_fraction);
        self.limit_fraction().set(limit_fraction);
    }

    #[only_owner]
    #[endpoint(setCompoundDepth)]
    fn set_compound_depth(&self, depth: usize) {
        require!(depth <= MAX_COMPOUND_DEPTH, ERROR_COMPOUND_DEPTH_TOO_HIGH);
        self.compound_depth().set(depth);
    }

    #[only_owner]
    #[endpoint(setLoanToValue)]
    fn set_loan_to_value(&self, loan_to_value: BigUint) {
        let loan_to_value = self.to_decimal_wad(loan_to_value);
        require!(
            !self.is_zero(&loan_to_value) && loan_to_value <= self.wad(),
            ERROR_INVALID_LOAN_TO_VALUE
        );
        self.loan_to_value().set(loan_to_value);
    }

    /// Fee on minted market shares, in basis points.
    #[only_owner]
    #[endpoint(setDepositFee)]
    fn set_deposit_fee(&self, fee_bps: usize) {
        require!(fee_bps <= MAX_DEPOSIT_FEE_BPS, ERROR_INVALID_FEE);
        self.deposit_fee()
            .set(self.to_decimal_bps(BigUint::from(fee_bps)));
    }

    #[only_owner]
    #[endpoint(setFeeCollector)]
    fn set_fee_collector(&self, collector: ManagedAddress) {
        self.require_non_zero_address(&collector);
        self.fee_collector().set(collector);
    }

    #[only_owner]
    #[endpoint(setLoopLimits)]
    fn set_loop_limits(&self, withdraw_unwind: usize, deleverage: usize, repay_all: usize) {
        self.require_valid_loop_limit(withdraw_unwind);
        self.require_valid_loop_limit(deleverage);
        self.require_valid_loop_limit(repay_all);

        self.loop_limits().set(LoopLimits {
            withdraw_unwind,
            deleverage,
            repay_all,
        });
    }

    /// Smallest USD value (WAD) a single leverage step must be worth.
    #[only_owner]
    #[endpoint(setMinLeverageValue)]
    fn set_min_leverage_value(&self, value: BigUint) {
        self.min_leverage_value().set(self.to_decimal_wad(value));
    }

    #[only_owner]
    #[endpoint(setSwapRouter)]
    fn set_swap_router(&self, router: ManagedAddress) {
        self.require_non_zero_address(&router);
        self.swap_router().set(router);
    }
}
