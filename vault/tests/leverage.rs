use multiversx_sc_scenario::{api::StaticApi, imports::ExpectMessage};

pub mod setup;

use constants::*;
use setup::*;

use common_errors::*;

const DELEVERAGED_BORROW: u128 = 295_336_787_564_766_839_378;
const DELEVERAGED_SUPPLY: u128 = 1_295_336_787_564_766_839_378;

fn levered_state() -> VaultTestState {
    let mut state = VaultTestState::new();
    state.deposit(ALICE, tokens(1_000));
    state.leverage();
    state
}

#[test]
fn leverage_loops_until_step_is_marginal() {
    let mut state = levered_state();

    // 400, 160 and 64 are borrowed; the next 25.6 is below the 5% margin
    state.check_vault_position(milli_tokens(1_624_000), milli_tokens(624_000));
    state.check_total_free_shares(milli_tokens(1_000_000));
}

#[test]
fn leverage_keeps_ledger_untouched() {
    let mut state = levered_state();

    state.check_shares(ALICE, milli_tokens(995_000));
    state.check_principal(ALICE, milli_tokens(500_000));
    state
        .world
        .query()
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            let pool = sc.get_pool_state(token_id(TOKEN));
            assert_raw(&pool.last_known_free_underlying, milli_tokens(1_000_000));
        });
}

#[test]
fn leverage_respects_compound_depth() {
    let mut state = VaultTestState::new();
    state
        .world
        .tx()
        .from(OWNER_ADDRESS)
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            sc.set_compound_depth(1);
        });
    state.deposit(ALICE, tokens(1_000));

    state.leverage();

    state.check_vault_position(milli_tokens(1_400_000), milli_tokens(400_000));
}

#[test]
fn leverage_skips_steps_below_min_value() {
    let mut state = VaultTestState::new();
    state
        .world
        .tx()
        .from(OWNER_ADDRESS)
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            // first step would be worth 4000 USD
            sc.set_min_leverage_value(wad_milli(5_000_000));
        });
    state.deposit(ALICE, tokens(1_000));

    state.leverage();

    state.check_vault_position(milli_tokens(1_000_000), 0);
}

#[test]
fn leverage_all_covers_every_market() {
    let mut state = VaultTestState::new();
    state.deposit(ALICE, tokens(1_000));

    state
        .world
        .tx()
        .from(BOB)
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            sc.leverage_all();
        });

    state.check_vault_position(milli_tokens(1_624_000), milli_tokens(624_000));
}

#[test]
fn leverage_while_paused_error() {
    let mut state = VaultTestState::new();
    state.deposit(ALICE, tokens(1_000));
    state.pause();

    state.call_error(BOB, "leverage", b"Contract is paused");
}

#[test]
fn leverage_without_any_price_error() {
    let mut state = VaultTestState::new();
    state.deposit(ALICE, tokens(1_000));
    state.pause_feed(TOKEN_FEED_ADDRESS);
    state.pause_feed(BRIDGE_FEED_ADDRESS);

    state.call_error(BOB, "leverage", ERROR_STALE_OR_FAILED_PRICE_FEED);
}

#[test]
fn deleverage_is_noop_on_healthy_position() {
    let mut state = levered_state();

    state.deleverage();

    state.check_vault_position(milli_tokens(1_624_000), milli_tokens(624_000));
}

#[test]
fn deleverage_after_tighter_limit() {
    let mut state = levered_state();
    state.set_limit_fraction(300);

    state.deleverage();

    state
        .world
        .query()
        .to(MARKET_ADDRESS)
        .whitebox(market_mock::contract_obj, |sc| {
            let vault = VAULT_ADDRESS.to_managed_address();
            assert_raw_close(&sc.account_borrow(&vault), DELEVERAGED_BORROW, 10);
            assert_raw_close(&sc.account_supply(&vault), DELEVERAGED_SUPPLY, 10);
        });
    state
        .world
        .query()
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            assert_raw(&sc.get_deleverage_amount(token_id(TOKEN)), 0);
        });
}

#[test]
fn deleverage_all_after_tighter_limit() {
    let mut state = levered_state();
    state.set_limit_fraction(300);

    state
        .world
        .tx()
        .from(BOB)
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            sc.deleverage_all();
        });

    state
        .world
        .query()
        .to(MARKET_ADDRESS)
        .whitebox(market_mock::contract_obj, |sc| {
            let vault = VAULT_ADDRESS.to_managed_address();
            assert_raw_close(&sc.account_borrow(&vault), DELEVERAGED_BORROW, 10);
        });
}

#[test]
fn deleverage_works_while_paused() {
    let mut state = levered_state();
    state.set_limit_fraction(300);
    state.pause();

    state.deleverage();

    state
        .world
        .query()
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            assert_raw(&sc.get_deleverage_amount(token_id(TOKEN)), 0);
        });
}

#[test]
fn repay_all_clears_borrow_and_resupplies() {
    let mut state = levered_state();
    state.pause();

    state
        .world
        .tx()
        .from(OWNER_ADDRESS)
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            sc.repay_all(token_id(TOKEN));
        });

    state.check_vault_position(milli_tokens(1_000_000), 0);
}

#[test]
fn repay_all_requires_pause() {
    let mut state = levered_state();

    state
        .world
        .tx()
        .from(OWNER_ADDRESS)
        .to(VAULT_ADDRESS)
        .raw_call("repayAll")
        .argument(&token_id::<StaticApi>(TOKEN))
        .returns(ExpectMessage(core::str::from_utf8(ERROR_NOT_PAUSED).unwrap()))
        .run();
}

#[test]
fn withdraw_unwinds_leverage() {
    let mut state = levered_state();

    state.withdraw(ALICE, milli_tokens(995_000), milli_tokens(500_000));

    state.check_vault_position(milli_tokens(5_000), 0);
    state.check_token_balance(ALICE, milli_tokens(99_995_000));
    state.check_pegged_balance(ALICE, 0);
    state.check_shares(ALICE, 0);
}

#[test]
fn partial_withdraw_uses_safe_redeem_first() {
    let mut state = levered_state();

    // 1624 - 624 / 0.4 = 64 can leave without unwinding
    state.withdraw(ALICE, milli_tokens(50_000), milli_tokens(30_000));

    state.check_vault_position(milli_tokens(1_574_000), milli_tokens(624_000));
    state.check_shares(ALICE, milli_tokens(945_000));
}
