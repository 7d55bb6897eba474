pub mod router {
    multiversx_sc::imports!();

    #[multiversx_sc::proxy]
    pub trait SwapRouter {
        #[endpoint(swapTokensFixedInput)]
        fn swap_tokens_fixed_input(
            &self,
            token_out: TokenIdentifier,
            amount_out_min: BigUint,
        ) -> EsdtTokenPayment;
    }
}

pub mod safe_price {
    multiversx_sc::imports!();

    #[multiversx_sc::proxy]
    pub trait SafePriceView {
        #[view(getSafePriceByTimestampOffset)]
        fn get_safe_price_by_timestamp_offset(
            &self,
            pair_address: ManagedAddress,
            timestamp_offset: u64,
            input_payment: EsdtTokenPayment,
        ) -> EsdtTokenPayment;
    }
}

pub mod pair {
    multiversx_sc::imports!();

    #[multiversx_sc::proxy]
    pub trait Pair {
        #[view(getReservesAndTotalSupply)]
        fn get_reserves_and_total_supply(&self) -> MultiValue3<BigUint, BigUint, BigUint>;
    }
}
