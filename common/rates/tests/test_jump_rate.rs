use common_math::SharedMathModule;
use common_rates::InterestRates;
use common_structs::RateModelParams;
use multiversx_sc::types::{BigUint, ManagedDecimal};
use multiversx_sc_scenario::api::StaticApi;

#[derive(Clone, Copy)]
pub struct RatesTester;

impl multiversx_sc::contract_base::ContractBase for RatesTester {
    type Api = StaticApi;
}

impl SharedMathModule for RatesTester {}
impl InterestRates for RatesTester {}

const ONE: u128 = 1_000_000_000_000_000_000;

fn wad(value_milli: u128) -> ManagedDecimal<StaticApi, usize> {
    ManagedDecimal::from_raw_units(BigUint::from(value_milli * ONE / 1_000), 18)
}

fn usdc(units: u128) -> ManagedDecimal<StaticApi, usize> {
    ManagedDecimal::from_raw_units(BigUint::from(units * 1_000_000), 6)
}

// base 1%, multiplier 10%, jump 100%, kink 80% (per block, readable on purpose)
fn params() -> RateModelParams<StaticApi> {
    RateModelParams {
        base_rate_per_block: wad(10),
        multiplier_per_block: wad(100),
        jump_multiplier_per_block: wad(1_000),
        kink: wad(800),
    }
}

#[test]
fn utilization_is_zero_without_borrows() {
    let tester = RatesTester;
    let util = tester.utilization_rate(&usdc(1_000), &usdc(0), &usdc(0));
    assert_eq!(util, wad(0));
}

#[test]
fn utilization_ignores_reserves_in_denominator() {
    let tester = RatesTester;
    // 400 / (700 + 400 - 100) = 0.4
    let util = tester.utilization_rate(&usdc(700), &usdc(400), &usdc(100));
    assert_eq!(util, wad(400));
}

#[test]
fn borrow_rate_below_kink() {
    let tester = RatesTester;
    let rate = tester.borrow_rate_per_block(&usdc(600), &usdc(400), &usdc(0), &params());
    // 0.4 * 0.1 + 0.01
    assert_eq!(rate, wad(50));
}

#[test]
fn borrow_rate_above_kink_jumps() {
    let tester = RatesTester;
    let rate = tester.borrow_rate_per_block(&usdc(100), &usdc(900), &usdc(0), &params());
    // 0.8 * 0.1 + 0.01 + (0.9 - 0.8) * 1.0
    assert_eq!(rate, wad(190));
}

#[test]
fn supply_rate_applies_reserve_factor() {
    let tester = RatesTester;
    let rate =
        tester.supply_rate_per_block(&usdc(600), &usdc(400), &usdc(0), &wad(100), &params());
    // 0.4 * 0.05 * 0.9
    assert_eq!(rate, wad(18));
}

#[test]
fn supply_rate_zero_when_idle() {
    let tester = RatesTester;
    let rate =
        tester.supply_rate_per_block(&usdc(600), &usdc(0), &usdc(0), &wad(100), &params());
    assert_eq!(rate, wad(0));
}

#[test]
fn exchange_rate_uses_initial_rate_for_empty_market() {
    let tester = RatesTester;
    let initial = wad(20);
    let rate = tester.exchange_rate(&usdc(0), &usdc(0), &usdc(0), &usdc(0), &initial);
    assert_eq!(rate, initial);

    // (600 + 400 - 0) / 500
    let rate = tester.exchange_rate(&usdc(600), &usdc(400), &usdc(0), &usdc(500), &initial);
    assert_eq!(rate, wad(2_000));
}

#[test]
fn accrual_grows_borrows_reserves_and_index() {
    let tester = RatesTester;
    let result = tester.simulate_accrual(
        &usdc(600),
        &usdc(400),
        &usdc(0),
        &wad(1_000),
        &wad(100),
        &params(),
        10,
    );

    // factor = 0.05 * 10 = 0.5
    assert_eq!(result.total_borrows, usdc(600));
    assert_eq!(result.total_reserves, usdc(20));
    assert_eq!(result.borrow_index, wad(1_500));
}

#[test]
fn accrual_is_a_no_op_in_the_same_block() {
    let tester = RatesTester;
    let result = tester.simulate_accrual(
        &usdc(600),
        &usdc(400),
        &usdc(3),
        &wad(1_200),
        &wad(100),
        &params(),
        0,
    );

    assert_eq!(result.total_borrows, usdc(400));
    assert_eq!(result.total_reserves, usdc(3));
    assert_eq!(result.borrow_index, wad(1_200));
}

#[test]
fn borrow_balance_follows_index() {
    let tester = RatesTester;
    let balance = tester.borrow_balance(&usdc(100), &wad(1_000), &wad(1_500));
    assert_eq!(balance, usdc(150));

    let none = tester.borrow_balance(&usdc(0), &wad(0), &wad(1_500));
    assert_eq!(none, usdc(0));
}
