multiversx_sc::imports!();

use common_constants::{MAX_ASSET_DECIMALS, TWAP_OFFSET_SECONDS, WAD_PRECISION};
use common_errors::{
    ERROR_ARITHMETIC_INVARIANT, ERROR_INVALID_ASSET, ERROR_STALE_OR_FAILED_PRICE_FEED,
};
use common_proxies::dex::{pair, safe_price};
use common_structs::{LpOracleConfig, OracleConfig, PriceQuote};

use crate::{cache::Cache, storage};

#[multiversx_sc::module]
pub trait OracleModule:
    storage::Storage
    + common_math::SharedMathModule
    + common_math::normalizer::DecimalNormalizerModule
{
    /// Value of `amount` raw units of `asset`, in USD or in the bridge asset.
    fn price_in_quote(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
        quote: PriceQuote,
        cache: &mut Cache<Self>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let config = self.require_oracle_config(asset, cache);
        let normalized = self.normalize(amount, config.asset_decimals);
        let unit_price = match quote {
            PriceQuote::Usd => self.get_usd_price(asset, cache),
            PriceQuote::Native => self.get_native_price(asset, cache),
        };

        self.mul_down(&normalized, &unit_price, WAD_PRECISION)
    }

    /// USD price of one whole unit of `asset`.
    ///
    /// Reads the primary feed and silently falls back to the TWAP quote through the
    /// bridge asset when the feed is unusable.
    fn get_usd_price(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        cache: &mut Cache<Self>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if let Some(price) = cache.get_cached_usd_price(asset) {
            return price;
        }

        let config = self.require_oracle_config(asset, cache);
        let price = match self.read_primary_price(&config, cache.current_timestamp) {
            Some(price) => price,
            None => {
                sc_print!(
                    "primary feed unusable at {}, using the TWAP fallback",
                    BigUint::from(cache.current_timestamp)
                );
                self.get_fallback_usd_price(asset, &config, cache)
            },
        };

        cache.usd_prices.put(asset, &price);
        price
    }

    /// Price of one whole unit of `asset` expressed in the bridge asset.
    fn get_native_price(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        cache: &mut Cache<Self>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if cache.is_bridge_token(asset) {
            return self.wad();
        }

        let asset_usd = self.get_usd_price(asset, cache);
        let bridge_usd = self.get_bridge_usd_price(cache);
        require!(!self.is_zero(&bridge_usd), ERROR_ARITHMETIC_INVARIANT);

        self.div_down(&asset_usd, &bridge_usd, WAD_PRECISION)
    }

    /// Fair value of `amount` raw LP tokens as `(native, usd)`.
    ///
    /// **Formula**: `2 * sqrt(r0 * r1) / supply * sqrt(p0) * sqrt(p1)` per LP token, which
    /// cannot be moved by skewing the pool reserves within one block.
    fn lp_price(
        &self,
        lp_token: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
        cache: &mut Cache<Self>,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        require!(lp_token.is_valid(), ERROR_INVALID_ASSET);
        let lp_mapper = self.lp_oracle(lp_token);
        require!(!lp_mapper.is_empty(), ERROR_INVALID_ASSET);
        let config: LpOracleConfig<Self::Api> = lp_mapper.get();

        let first_config = self.require_oracle_config(&config.first_token, cache);
        let second_config = self.require_oracle_config(&config.second_token, cache);

        let (first_reserve, second_reserve, total_supply) = self
            .pair_proxy(config.pair_address.clone())
            .get_reserves_and_total_supply()
            .returns(ReturnsResult)
            .sync_call_readonly()
            .into_tuple();

        let first_reserve = self.normalize(&first_reserve, first_config.asset_decimals);
        let second_reserve = self.normalize(&second_reserve, second_config.asset_decimals);
        let total_supply = self.normalize(&total_supply, config.lp_decimals);
        require!(!self.is_zero(&total_supply), ERROR_ARITHMETIC_INVARIANT);

        let constant_product = self.mul_down(&first_reserve, &second_reserve, WAD_PRECISION);
        let sqrt_k = self.div_down(
            &self.sqrt(&constant_product, WAD_PRECISION),
            &total_supply,
            WAD_PRECISION,
        );

        let first_price = self.get_native_price(&config.first_token, cache);
        let second_price = self.get_native_price(&config.second_token, cache);
        let root_prices = self.mul_down(
            &self.sqrt(&first_price, WAD_PRECISION),
            &self.sqrt(&second_price, WAD_PRECISION),
            WAD_PRECISION,
        );
        let half_value = self.mul_down(&sqrt_k, &root_prices, WAD_PRECISION);
        let unit_native = half_value.clone() + half_value;

        let amount = self.normalize(amount, config.lp_decimals);
        let native_value = self.mul_down(&amount, &unit_native, WAD_PRECISION);
        let bridge_usd = self.get_bridge_usd_price(cache);
        let usd_value = self.mul_down(&native_value, &bridge_usd, WAD_PRECISION);

        (native_value, usd_value)
    }

    fn get_bridge_usd_price(
        &self,
        cache: &mut Cache<Self>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let bridge = match &cache.bridge_token {
            Some(bridge) => bridge.clone(),
            None => sc_panic!(ERROR_STALE_OR_FAILED_PRICE_FEED),
        };

        self.get_usd_price(&bridge, cache)
    }

    /// `None` when the feed is unset, empty, paused, malformed or stale.
    ///
    /// A round reporting a price of zero is returned as is.
    fn read_primary_price(
        &self,
        config: &OracleConfig<Self::Api>,
        current_timestamp: u64,
    ) -> Option<ManagedDecimal<Self::Api, NumDecimals>> {
        if config.feed_address.is_zero() {
            return None;
        }

        if self.feed_paused_state(config.feed_address.clone()).get() {
            return None;
        }

        let round_mapper = self.feed_latest_round(config.feed_address.clone());
        if round_mapper.is_empty() {
            return None;
        }

        let round = round_mapper.get();
        let decimals = round.decimals as usize;
        if decimals > MAX_ASSET_DECIMALS {
            return None;
        }

        let age = current_timestamp.saturating_sub(round.timestamp);
        if age > config.max_stale_seconds {
            return None;
        }

        Some(self.normalize(&round.price, decimals))
    }

    fn get_fallback_usd_price(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        config: &OracleConfig<Self::Api>,
        cache: &mut Cache<Self>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let bridge = match &cache.bridge_token {
            Some(bridge) => bridge.clone(),
            None => sc_panic!(ERROR_STALE_OR_FAILED_PRICE_FEED),
        };
        let safe_price_view = match &cache.safe_price_view {
            Some(view) => view.clone(),
            None => sc_panic!(ERROR_STALE_OR_FAILED_PRICE_FEED),
        };

        // The bridge asset can only be priced by its own feed
        require!(
            asset != &bridge && asset.is_esdt() && !config.twap_pair.is_zero(),
            ERROR_STALE_OR_FAILED_PRICE_FEED
        );

        let one_unit = BigUint::from(10u64).pow(config.asset_decimals as u32);
        let quote: EsdtTokenPayment = self
            .safe_price_proxy(safe_price_view)
            .get_safe_price_by_timestamp_offset(
                config.twap_pair.clone(),
                TWAP_OFFSET_SECONDS,
                EsdtTokenPayment::new(asset.clone().unwrap_esdt(), 0, one_unit),
            )
            .returns(ReturnsResult)
            .sync_call_readonly();

        let quoted_token = EgldOrEsdtTokenIdentifier::esdt(quote.token_identifier.clone());
        require!(quoted_token == bridge, ERROR_STALE_OR_FAILED_PRICE_FEED);

        let bridge_config = match cache.get_cached_oracle(&bridge) {
            Some(bridge_config) => bridge_config,
            None => sc_panic!(ERROR_STALE_OR_FAILED_PRICE_FEED),
        };
        let price_in_bridge = self.normalize(&quote.amount, bridge_config.asset_decimals);
        let bridge_usd = self.get_usd_price(&bridge, cache);

        self.mul_down(&price_in_bridge, &bridge_usd, WAD_PRECISION)
    }

    fn require_oracle_config(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        cache: &mut Cache<Self>,
    ) -> OracleConfig<Self::Api> {
        require!(asset.is_valid(), ERROR_INVALID_ASSET);
        match cache.get_cached_oracle(asset) {
            Some(config) => config,
            None => sc_panic!(ERROR_INVALID_ASSET),
        }
    }

    #[proxy]
    fn safe_price_proxy(&self, sc_address: ManagedAddress) -> safe_price::ProxyTo<Self::Api>;

    #[proxy]
    fn pair_proxy(&self, sc_address: ManagedAddress) -> pair::ProxyTo<Self::Api>;
}
