use common_structs::OracleConfig;

multiversx_sc::imports!();

/// Per-call memo of oracle reads. Created at the start of an endpoint and dropped at
/// its end, so every asset is priced at most once per top-level call.
pub struct Cache<'a, C>
where
    C: crate::storage::Storage,
{
    sc_ref: &'a C,

    pub usd_prices: ManagedMapEncoded<
        C::Api,
        EgldOrEsdtTokenIdentifier<C::Api>,
        ManagedDecimal<C::Api, NumDecimals>,
    >,
    pub oracle_configs:
        ManagedMapEncoded<C::Api, EgldOrEsdtTokenIdentifier<C::Api>, OracleConfig<C::Api>>,
    pub bridge_token: Option<EgldOrEsdtTokenIdentifier<C::Api>>,
    pub safe_price_view: Option<ManagedAddress<C::Api>>,
    pub current_timestamp: u64,
}

impl<'a, C> Cache<'a, C>
where
    C: crate::storage::Storage,
{
    pub fn new(sc_ref: &'a C) -> Self {
        let bridge_mapper = sc_ref.bridge_token();
        let bridge_token = if bridge_mapper.is_empty() {
            None
        } else {
            Some(bridge_mapper.get())
        };

        let view_mapper = sc_ref.safe_price_view();
        let safe_price_view = if view_mapper.is_empty() {
            None
        } else {
            Some(view_mapper.get())
        };

        Cache {
            sc_ref,
            usd_prices: ManagedMapEncoded::new(),
            oracle_configs: ManagedMapEncoded::new(),
            bridge_token,
            safe_price_view,
            current_timestamp: sc_ref.blockchain().get_block_timestamp(),
        }
    }

    /// Oracle configuration of `asset`, `None` when the asset was never configured.
    pub fn get_cached_oracle(
        &mut self,
        asset: &EgldOrEsdtTokenIdentifier<C::Api>,
    ) -> Option<OracleConfig<C::Api>> {
        if self.oracle_configs.contains(asset) {
            return Some(self.oracle_configs.get(asset));
        }

        let mapper = self.sc_ref.token_oracle(asset);
        if mapper.is_empty() {
            return None;
        }

        let config = mapper.get();
        self.oracle_configs.put(asset, &config);
        Some(config)
    }

    pub fn get_cached_usd_price(
        &self,
        asset: &EgldOrEsdtTokenIdentifier<C::Api>,
    ) -> Option<ManagedDecimal<C::Api, NumDecimals>> {
        if self.usd_prices.contains(asset) {
            Some(self.usd_prices.get(asset))
        } else {
            None
        }
    }

    pub fn is_bridge_token(&self, asset: &EgldOrEsdtTokenIdentifier<C::Api>) -> bool {
        match &self.bridge_token {
            Some(bridge) => bridge == asset,
            None => false,
        }
    }
}
