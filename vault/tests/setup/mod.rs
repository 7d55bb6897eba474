use crate::constants::*;

use common_constants::WAD_PRECISION;
use common_structs::{BorrowSnapshot, RateModelParams};
use multiversx_sc::{
    api::ManagedTypeApi,
    types::{
        BigUint, EgldOrEsdtTokenIdentifier, EsdtLocalRole, EsdtTokenPayment, ManagedAddress,
        ManagedDecimal, NumDecimals, TestAddress, TestSCAddress, TestTokenIdentifier,
    },
};
use multiversx_sc_scenario::{api::StaticApi, imports::ExpectMessage, ScenarioWorld};

pub use dex_mock::DexMock;
pub use feed_mock::FeedMock;
pub use market_mock::{storage::Storage as MarketStorage, MarketMock};
pub use multiversx_sc_scenario::{ScenarioTxRun, ScenarioTxWhitebox};

pub use vault::{
    Vault,
    config::ConfigModule,
    ledger::LedgerModule,
    market::MarketModule,
    positions::{
        deposit::DepositModule, leverage::LeverageModule, pool::PoolModule,
        withdraw::WithdrawModule,
    },
    storage::Storage,
    views::ViewsModule,
};
pub use multiversx_sc_modules::pause::PauseModule;

pub static PEGGED_ROLES: &[EsdtLocalRole] = &[EsdtLocalRole::Mint, EsdtLocalRole::Burn];

pub fn world() -> ScenarioWorld {
    let mut blockchain = ScenarioWorld::new();

    blockchain.register_contract(VAULT_PATH, vault::ContractBuilder);
    blockchain.register_contract(MARKET_PATH, market_mock::ContractBuilder);
    blockchain.register_contract(FEED_PATH, feed_mock::ContractBuilder);
    blockchain.register_contract(DEX_PATH, dex_mock::ContractBuilder);

    blockchain
}

/// Whole tokens in raw units.
pub fn tokens<M: ManagedTypeApi>(units: u64) -> BigUint<M> {
    BigUint::from(units) * BigUint::from(10u64).pow(TOKEN_DECIMALS as u32)
}

/// Thousandths of a token in raw units.
pub fn milli_tokens(milli: u64) -> u128 {
    milli as u128 * 10u128.pow(TOKEN_DECIMALS as u32 - 3)
}

/// Thousandths expressed as a WAD fraction.
pub fn wad_milli<M: ManagedTypeApi>(milli: u64) -> BigUint<M> {
    BigUint::from(milli) * BigUint::from(10u64).pow(WAD_PRECISION as u32 - 3)
}

pub fn usd_price<M: ManagedTypeApi>(usd: u64) -> BigUint<M> {
    BigUint::from(usd) * BigUint::from(10u64).pow(PRICE_DECIMALS as u32)
}

pub fn token_id<M: ManagedTypeApi>(token: TestTokenIdentifier) -> EgldOrEsdtTokenIdentifier<M> {
    EgldOrEsdtTokenIdentifier::esdt(token.to_token_identifier())
}

pub fn flat_rate_model<M: ManagedTypeApi>() -> RateModelParams<M> {
    let zero = || ManagedDecimal::<M, NumDecimals>::from_raw_units(BigUint::zero(), WAD_PRECISION);
    RateModelParams {
        base_rate_per_block: zero(),
        multiplier_per_block: zero(),
        jump_multiplier_per_block: zero(),
        kink: ManagedDecimal::from_raw_units(wad_milli(800), WAD_PRECISION),
    }
}

pub fn assert_raw<M: ManagedTypeApi>(actual: &ManagedDecimal<M, NumDecimals>, expected: u128) {
    assert_eq!(
        actual.into_raw_units(),
        &BigUint::<M>::from(expected),
        "unexpected raw amount"
    );
}

pub fn assert_raw_close<M: ManagedTypeApi>(
    actual: &ManagedDecimal<M, NumDecimals>,
    expected: u128,
    tolerance: u128,
) {
    let actual = actual.into_raw_units();
    let low = BigUint::<M>::from(expected.saturating_sub(tolerance));
    let high = BigUint::<M>::from(expected + tolerance);
    assert!(
        actual >= &low && actual <= &high,
        "raw amount outside of the expected range"
    );
}

pub struct VaultTestState {
    pub world: ScenarioWorld,
}

impl VaultTestState {
    pub fn new() -> Self {
        let mut world = world();
        world
            .current_block()
            .block_nonce(START_BLOCK)
            .block_timestamp(START_TIMESTAMP);

        setup_accounts(&mut world);
        setup_market(&mut world);
        setup_feeds(&mut world);
        setup_dex(&mut world);
        setup_vault(&mut world);

        Self { world }
    }

    pub fn advance_blocks(&mut self, blocks: u64) {
        self.world
            .current_block()
            .block_nonce(START_BLOCK + blocks)
            .block_timestamp(START_TIMESTAMP + blocks * 6);
    }

    pub fn deposit(&mut self, from: TestAddress, amount: BigUint<StaticApi>) {
        self.world
            .tx()
            .from(from)
            .to(VAULT_ADDRESS)
            .esdt(EsdtTokenPayment::new(TOKEN.to_token_identifier(), 0, amount))
            .whitebox(vault::contract_obj, |sc| {
                sc.deposit(token_id(TOKEN));
            });
    }

    pub fn deposit_error(
        &mut self,
        from: TestAddress,
        paid_token: TestTokenIdentifier,
        underlying: TestTokenIdentifier,
        amount: BigUint<StaticApi>,
        error_message: &[u8],
    ) {
        self.world
            .tx()
            .from(from)
            .to(VAULT_ADDRESS)
            .raw_call("deposit")
            .argument(&token_id::<StaticApi>(underlying))
            .esdt(EsdtTokenPayment::new(paid_token.to_token_identifier(), 0, amount))
            .returns(ExpectMessage(core::str::from_utf8(error_message).unwrap()))
            .run();
    }

    /// `pegged` raw units of the pegged token go along with the call, none when zero.
    pub fn withdraw(&mut self, from: TestAddress, shares: u128, pegged: u128) {
        if pegged == 0 {
            self.world
                .tx()
                .from(from)
                .to(VAULT_ADDRESS)
                .whitebox(vault::contract_obj, |sc| {
                    sc.withdraw(token_id(TOKEN), BigUint::from(shares));
                });
            return;
        }

        self.world
            .tx()
            .from(from)
            .to(VAULT_ADDRESS)
            .esdt(EsdtTokenPayment::new(
                PEGGED_TOKEN.to_token_identifier(),
                0,
                BigUint::from(pegged),
            ))
            .whitebox(vault::contract_obj, |sc| {
                sc.withdraw(token_id(TOKEN), BigUint::from(shares));
            });
    }

    pub fn withdraw_error(
        &mut self,
        from: TestAddress,
        shares: u128,
        pegged: u128,
        error_message: &[u8],
    ) {
        self.world
            .tx()
            .from(from)
            .to(VAULT_ADDRESS)
            .raw_call("withdraw")
            .argument(&token_id::<StaticApi>(TOKEN))
            .argument(&BigUint::<StaticApi>::from(shares))
            .esdt(EsdtTokenPayment::new(
                PEGGED_TOKEN.to_token_identifier(),
                0,
                BigUint::from(pegged),
            ))
            .returns(ExpectMessage(core::str::from_utf8(error_message).unwrap()))
            .run();
    }

    pub fn leverage(&mut self) {
        self.world
            .tx()
            .from(BOB)
            .to(VAULT_ADDRESS)
            .whitebox(vault::contract_obj, |sc| {
                sc.leverage(token_id(TOKEN));
            });
    }

    pub fn deleverage(&mut self) {
        self.world
            .tx()
            .from(BOB)
            .to(VAULT_ADDRESS)
            .whitebox(vault::contract_obj, |sc| {
                sc.deleverage(token_id(TOKEN));
            });
    }

    pub fn call_error(&mut self, from: TestAddress, endpoint: &str, error_message: &[u8]) {
        self.world
            .tx()
            .from(from)
            .to(VAULT_ADDRESS)
            .raw_call(endpoint)
            .argument(&token_id::<StaticApi>(TOKEN))
            .returns(ExpectMessage(core::str::from_utf8(error_message).unwrap()))
            .run();
    }

    pub fn pause(&mut self) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(VAULT_ADDRESS)
            .whitebox(vault::contract_obj, |sc| {
                sc.pause_endpoint();
            });
    }

    pub fn set_limit_fraction(&mut self, milli: u64) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(VAULT_ADDRESS)
            .whitebox(vault::contract_obj, |sc| {
                sc.set_collateral_limit(wad_milli(milli));
            });
    }

    pub fn set_loop_limits(&mut self, withdraw_unwind: usize, deleverage: usize, repay_all: usize) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(VAULT_ADDRESS)
            .whitebox(vault::contract_obj, |sc| {
                sc.set_loop_limits(withdraw_unwind, deleverage, repay_all);
            });
    }

    pub fn set_market_borrow_paused(&mut self, paused: bool) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(MARKET_ADDRESS)
            .whitebox(market_mock::contract_obj, |sc| {
                sc.set_borrow_paused(paused);
            });
    }

    pub fn check_shares(&mut self, account: TestAddress, expected: u128) {
        self.world
            .query()
            .to(VAULT_ADDRESS)
            .whitebox(vault::contract_obj, |sc| {
                let entry = sc.get_account(token_id(TOKEN), account.to_managed_address());
                assert_raw(&entry.share_balance, expected);
            });
    }

    pub fn check_principal(&mut self, account: TestAddress, expected: u128) {
        self.world
            .query()
            .to(VAULT_ADDRESS)
            .whitebox(vault::contract_obj, |sc| {
                let entry = sc.get_account(token_id(TOKEN), account.to_managed_address());
                assert_raw(&entry.principal, expected);
            });
    }

    pub fn check_total_free_shares(&mut self, expected: u128) {
        self.world
            .query()
            .to(VAULT_ADDRESS)
            .whitebox(vault::contract_obj, |sc| {
                let pool = sc.get_pool_state(token_id(TOKEN));
                assert_raw(&pool.total_free_shares, expected);
            });
    }

    /// Borrow and supply of the vault as the market itself reports them.
    pub fn check_vault_position(&mut self, expected_supply: u128, expected_borrow: u128) {
        self.world
            .query()
            .to(MARKET_ADDRESS)
            .whitebox(market_mock::contract_obj, |sc| {
                let vault = VAULT_ADDRESS.to_managed_address();
                assert_raw(&sc.account_supply(&vault), expected_supply);
                assert_raw(&sc.account_borrow(&vault), expected_borrow);
            });
    }

    pub fn check_token_balance(&mut self, account: TestAddress, expected: u128) {
        self.world
            .check_account(account)
            .esdt_balance(TOKEN, BigUint::<StaticApi>::from(expected));
    }

    pub fn check_pegged_balance(&mut self, account: TestAddress, expected: u128) {
        self.world
            .check_account(account)
            .esdt_balance(PEGGED_TOKEN, BigUint::<StaticApi>::from(expected));
    }

    /// Books `amount` of bad debt on the vault: its borrow grows while the exchange
    /// rate of the market stays where it was.
    pub fn book_vault_bad_debt(&mut self, amount: u128) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(MARKET_ADDRESS)
            .whitebox(market_mock::contract_obj, |sc| {
                let vault = VAULT_ADDRESS.to_managed_address();
                let debt = ManagedDecimal::from_raw_units(BigUint::from(amount), TOKEN_DECIMALS);

                let balance = sc.account_borrow(&vault) + debt.clone();
                sc.borrow_snapshot(&vault).set(BorrowSnapshot {
                    principal: balance,
                    interest_index: sc.borrow_index().get(),
                });
                sc.total_borrows().update(|total| *total += debt.clone());
                sc.total_reserves().update(|reserves| *reserves += debt);
            });
    }

    /// Moves `amount` of the market's cash into a borrow of the supplier, leaving the
    /// exchange rate untouched.
    pub fn lend_out_market_cash(&mut self, amount: u128) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(MARKET_ADDRESS)
            .whitebox(market_mock::contract_obj, |sc| {
                let lent = ManagedDecimal::from_raw_units(BigUint::from(amount), TOKEN_DECIMALS);

                sc.borrow_snapshot(&SUPPLIER.to_managed_address()).set(BorrowSnapshot {
                    principal: lent.clone(),
                    interest_index: sc.borrow_index().get(),
                });
                sc.total_borrows().update(|total| *total += lent.clone());
                sc.cash().update(|cash| *cash -= lent);
            });
    }

    pub fn pause_feed(&mut self, feed: TestSCAddress) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(feed)
            .whitebox(feed_mock::contract_obj, |sc| {
                sc.pause_endpoint();
            });
    }

    /// Publishes a fresh round stamped with the current block timestamp.
    pub fn submit_price(&mut self, feed: TestSCAddress, usd_milli: u64) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(feed)
            .whitebox(feed_mock::contract_obj, |sc| {
                sc.submit_round(
                    BigUint::from(usd_milli) * BigUint::from(10u64).pow(PRICE_DECIMALS as u32 - 3),
                    PRICE_DECIMALS,
                );
            });
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.world.current_block().block_timestamp(timestamp);
    }

    /// Streams `speed` whole reward tokens per block to the market's suppliers.
    pub fn enable_market_rewards(&mut self, speed: u64) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(MARKET_ADDRESS)
            .whitebox(market_mock::contract_obj, |sc| {
                sc.set_reward_config(
                    REWARD_TOKEN.to_token_identifier(),
                    TOKEN_DECIMALS,
                    tokens(speed),
                    BigUint::zero(),
                );
            });
    }
}

pub fn setup_accounts(world: &mut ScenarioWorld) {
    world
        .account(OWNER_ADDRESS)
        .nonce(1)
        .esdt_balance(TOKEN, tokens::<StaticApi>(USER_BALANCE))
        .esdt_balance(REWARD_TOKEN, tokens::<StaticApi>(USER_BALANCE));

    for user in [ALICE, BOB, SUPPLIER] {
        world
            .account(user)
            .nonce(1)
            .esdt_balance(TOKEN, tokens::<StaticApi>(USER_BALANCE))
            .esdt_balance(OTHER_TOKEN, tokens::<StaticApi>(USER_BALANCE));
    }

    world.account(FEE_COLLECTOR).nonce(1);
}

/// Zero-rate market with a collateral factor of 0.8, seeded by the supplier.
pub fn setup_market(world: &mut ScenarioWorld) {
    world
        .tx()
        .from(OWNER_ADDRESS)
        .raw_deploy()
        .code(MARKET_PATH)
        .new_address(MARKET_ADDRESS)
        .whitebox(market_mock::contract_obj, |sc| {
            sc.init(
                token_id(TOKEN),
                TOKEN_DECIMALS,
                wad_milli(1_000),
                flat_rate_model(),
                BigUint::zero(),
                wad_milli(COLLATERAL_FACTOR_MILLI),
            );
        });

    world
        .tx()
        .from(SUPPLIER)
        .to(MARKET_ADDRESS)
        .esdt(EsdtTokenPayment::new(
            TOKEN.to_token_identifier(),
            0,
            tokens(MARKET_LIQUIDITY),
        ))
        .whitebox(market_mock::contract_obj, |sc| {
            assert_eq!(sc.supply(), market_mock::SUCCESS);
        });

    // Liquidity mining payouts
    world.set_esdt_balance(
        MARKET_ADDRESS.to_managed_address::<StaticApi>(),
        REWARD_TOKEN.as_bytes(),
        tokens::<StaticApi>(1_000),
    );
}

pub fn setup_feeds(world: &mut ScenarioWorld) {
    deploy_feed(world, TOKEN_FEED_ADDRESS, TOKEN_PRICE_USD);
    deploy_feed(world, BRIDGE_FEED_ADDRESS, BRIDGE_PRICE_USD);
}

pub fn deploy_feed(
    world: &mut ScenarioWorld,
    address: TestSCAddress,
    price: u64,
) {
    world
        .tx()
        .from(OWNER_ADDRESS)
        .raw_deploy()
        .code(FEED_PATH)
        .new_address(address)
        .whitebox(feed_mock::contract_obj, |sc| {
            sc.init();
        });

    world
        .tx()
        .from(OWNER_ADDRESS)
        .to(address)
        .whitebox(feed_mock::contract_obj, |sc| {
            sc.submit_round(usd_price(price), PRICE_DECIMALS);
        });
}

/// TWAP of half a bridge token per token, rewards sold at two tokens each, and a
/// 1000 TOKEN / 500 WEGLD pool with 100 LP tokens outstanding.
pub fn setup_dex(world: &mut ScenarioWorld) {
    world
        .tx()
        .from(OWNER_ADDRESS)
        .raw_deploy()
        .code(DEX_PATH)
        .new_address(DEX_ADDRESS)
        .whitebox(dex_mock::contract_obj, |sc| {
            sc.init();
            sc.set_safe_price(
                DEX_ADDRESS.to_managed_address(),
                TOKEN.to_token_identifier(),
                BRIDGE_TOKEN.to_token_identifier(),
                wad_milli(500),
            );
            sc.set_swap_rate(
                REWARD_TOKEN.to_token_identifier(),
                TOKEN.to_token_identifier(),
                wad_milli(2_000),
            );
            sc.set_reserves(tokens(1_000), tokens(500), tokens(100));
        });

    world.set_esdt_balance(
        DEX_ADDRESS.to_managed_address::<StaticApi>(),
        TOKEN.as_bytes(),
        tokens::<StaticApi>(1_000),
    );
}

pub fn setup_vault(world: &mut ScenarioWorld) {
    world
        .tx()
        .from(OWNER_ADDRESS)
        .raw_deploy()
        .code(VAULT_PATH)
        .new_address(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            sc.init(
                wad_milli(LIMIT_FRACTION_MILLI),
                COMPOUND_DEPTH,
                wad_milli(LOAN_TO_VALUE_MILLI),
                FEE_COLLECTOR.to_managed_address(),
            );
        });

    world.set_esdt_local_roles(
        VAULT_ADDRESS.to_managed_address::<StaticApi>(),
        PEGGED_TOKEN.as_bytes(),
        PEGGED_ROLES,
    );

    world
        .tx()
        .from(OWNER_ADDRESS)
        .to(VAULT_ADDRESS)
        .whitebox(vault::contract_obj, |sc| {
            sc.add_market(
                token_id(TOKEN),
                MARKET_ADDRESS.to_managed_address(),
                PEGGED_TOKEN.to_token_identifier(),
                TOKEN_DECIMALS,
            );
            sc.set_token_oracle(
                token_id(TOKEN),
                TOKEN_DECIMALS,
                TOKEN_FEED_ADDRESS.to_managed_address(),
                MAX_STALE_SECONDS,
                DEX_ADDRESS.to_managed_address(),
            );
            sc.set_token_oracle(
                token_id(BRIDGE_TOKEN),
                TOKEN_DECIMALS,
                BRIDGE_FEED_ADDRESS.to_managed_address(),
                MAX_STALE_SECONDS,
                ManagedAddress::zero(),
            );
            sc.set_bridge_token(token_id(BRIDGE_TOKEN));
            sc.set_safe_price_view(DEX_ADDRESS.to_managed_address());
            sc.set_swap_router(DEX_ADDRESS.to_managed_address());
        });
}
