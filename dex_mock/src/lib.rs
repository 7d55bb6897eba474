#![no_std]

use common_constants::WAD;

multiversx_sc::imports!();

pub static ERROR_NO_ROUTE: &[u8] = b"No route for this pair of tokens";
pub static ERROR_NO_SAFE_PRICE: &[u8] = b"No safe price recorded for this pair";
pub static ERROR_SLIPPAGE: &[u8] = b"Slippage exceeded";

/// Fixed-rate swap venue.
///
/// One deployment plays three roles: the router swapping reward income, the safe
/// price view quoting a TWAP per pair address, and a two-asset pair exposing its
/// reserves. Rates are WAD based: `out = in * rate / 1e18`, both sides in raw units.
#[multiversx_sc::contract]
pub trait DexMock {
    #[init]
    fn init(&self) {}

    #[upgrade]
    fn upgrade(&self) {}

    #[payable]
    #[endpoint(swapTokensFixedInput)]
    fn swap_tokens_fixed_input(
        &self,
        token_out: TokenIdentifier,
        amount_out_min: BigUint,
    ) -> EsdtTokenPayment {
        let payment = self.call_value().single_esdt();
        let rate_mapper = self.swap_rate(&payment.token_identifier, &token_out);
        require!(!rate_mapper.is_empty(), ERROR_NO_ROUTE);

        let amount_out = &payment.amount * &rate_mapper.get() / BigUint::from(WAD);
        require!(amount_out >= amount_out_min, ERROR_SLIPPAGE);

        let caller = self.blockchain().get_caller();
        let output = EsdtTokenPayment::new(token_out, 0, amount_out);
        self.tx()
            .to(&caller)
            .esdt(output.clone())
            .transfer_if_not_empty();

        output
    }

    #[view(getSafePriceByTimestampOffset)]
    fn get_safe_price_by_timestamp_offset(
        &self,
        pair_address: ManagedAddress,
        _timestamp_offset: u64,
        input_payment: EsdtTokenPayment,
    ) -> EsdtTokenPayment {
        let quote_mapper = self.safe_price(&pair_address, &input_payment.token_identifier);
        require!(!quote_mapper.is_empty(), ERROR_NO_SAFE_PRICE);

        let (token_out, rate) = quote_mapper.get();
        let amount_out = &input_payment.amount * &rate / BigUint::from(WAD);

        EsdtTokenPayment::new(token_out, 0, amount_out)
    }

    #[view(getReservesAndTotalSupply)]
    fn get_reserves_and_total_supply(&self) -> MultiValue3<BigUint, BigUint, BigUint> {
        let (first, second, total_supply) = self.reserves().get();
        (first, second, total_supply).into()
    }

    #[only_owner]
    #[endpoint(setSwapRate)]
    fn set_swap_rate(&self, token_in: TokenIdentifier, token_out: TokenIdentifier, rate: BigUint) {
        self.swap_rate(&token_in, &token_out).set(rate);
    }

    #[only_owner]
    #[endpoint(setSafePrice)]
    fn set_safe_price(
        &self,
        pair_address: ManagedAddress,
        token_in: TokenIdentifier,
        token_out: TokenIdentifier,
        rate: BigUint,
    ) {
        self.safe_price(&pair_address, &token_in)
            .set((token_out, rate));
    }

    #[only_owner]
    #[endpoint(setReserves)]
    fn set_reserves(&self, first_reserve: BigUint, second_reserve: BigUint, total_supply: BigUint) {
        self.reserves()
            .set((first_reserve, second_reserve, total_supply));
    }

    #[storage_mapper("swap_rate")]
    fn swap_rate(
        &self,
        token_in: &TokenIdentifier,
        token_out: &TokenIdentifier,
    ) -> SingleValueMapper<BigUint>;

    #[storage_mapper("safe_price")]
    fn safe_price(
        &self,
        pair_address: &ManagedAddress,
        token_in: &TokenIdentifier,
    ) -> SingleValueMapper<(TokenIdentifier, BigUint)>;

    #[storage_mapper("reserves")]
    fn reserves(&self) -> SingleValueMapper<(BigUint, BigUint, BigUint)>;
}
