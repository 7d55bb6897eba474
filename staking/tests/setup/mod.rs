use crate::constants::*;

use common_structs::PoolKind;
use multiversx_sc::{
    api::ManagedTypeApi,
    types::{
        BigUint, EsdtTokenPayment, ManagedDecimal, NumDecimals, TestAddress, TestTokenIdentifier,
    },
};
use multiversx_sc_scenario::{api::StaticApi, imports::ExpectMessage, ScenarioWorld};

pub use farm_mock::FarmMock;
pub use multiversx_sc_scenario::{ScenarioTxRun, ScenarioTxWhitebox};

pub use multiversx_sc_modules::pause::PauseModule;
pub use staking::{
    compound::CompoundModule, config::ConfigModule, positions::PositionsModule,
    storage::Storage, views::ViewsModule, Staking,
};

pub fn world() -> ScenarioWorld {
    let mut blockchain = ScenarioWorld::new();

    blockchain.register_contract(STAKING_PATH, staking::ContractBuilder);
    blockchain.register_contract(FARM_PATH, farm_mock::ContractBuilder);

    blockchain
}

pub fn tokens<M: ManagedTypeApi>(units: u64) -> BigUint<M> {
    BigUint::from(units) * BigUint::from(10u64).pow(TOKEN_DECIMALS as u32)
}

pub fn milli_tokens(milli: u64) -> u128 {
    milli as u128 * 10u128.pow(TOKEN_DECIMALS as u32 - 3)
}

pub fn assert_raw<M: ManagedTypeApi>(actual: &ManagedDecimal<M, NumDecimals>, expected: u128) {
    assert_eq!(
        actual.into_raw_units(),
        &BigUint::<M>::from(expected),
        "unexpected raw amount"
    );
}

pub struct StakingTestState {
    pub world: ScenarioWorld,
}

impl StakingTestState {
    pub fn new(kind: PoolKind) -> Self {
        let mut world = world();
        world.current_block().block_nonce(START_BLOCK);

        setup_accounts(&mut world);
        setup_farm(&mut world);
        setup_staking(&mut world, kind);

        Self { world }
    }

    pub fn set_block(&mut self, blocks_after_start: u64) {
        self.world
            .current_block()
            .block_nonce(START_BLOCK + blocks_after_start);
    }

    pub fn deposit(&mut self, from: TestAddress, token: TestTokenIdentifier, amount: u64) {
        self.world
            .tx()
            .from(from)
            .to(STAKING_ADDRESS)
            .esdt(EsdtTokenPayment::new(
                token.to_token_identifier(),
                0,
                tokens(amount),
            ))
            .whitebox(staking::contract_obj, |sc| {
                sc.deposit();
            });
    }

    pub fn deposit_error(
        &mut self,
        from: TestAddress,
        token: TestTokenIdentifier,
        amount: u64,
        error_message: &[u8],
    ) {
        self.world
            .tx()
            .from(from)
            .to(STAKING_ADDRESS)
            .raw_call("deposit")
            .esdt(EsdtTokenPayment::new(
                token.to_token_identifier(),
                0,
                tokens(amount),
            ))
            .returns(ExpectMessage(core::str::from_utf8(error_message).unwrap()))
            .run();
    }

    pub fn withdraw(&mut self, from: TestAddress, amount: u128) {
        self.world
            .tx()
            .from(from)
            .to(STAKING_ADDRESS)
            .whitebox(staking::contract_obj, |sc| {
                sc.withdraw(BigUint::from(amount));
            });
    }

    pub fn withdraw_error(&mut self, from: TestAddress, amount: u128, error_message: &[u8]) {
        self.world
            .tx()
            .from(from)
            .to(STAKING_ADDRESS)
            .raw_call("withdraw")
            .argument(&BigUint::<StaticApi>::from(amount))
            .returns(ExpectMessage(core::str::from_utf8(error_message).unwrap()))
            .run();
    }

    pub fn compound(&mut self, from: TestAddress) {
        self.world
            .tx()
            .from(from)
            .to(STAKING_ADDRESS)
            .whitebox(staking::contract_obj, |sc| {
                sc.compound();
            });
    }

    pub fn compound_error(&mut self, from: TestAddress, error_message: &[u8]) {
        self.world
            .tx()
            .from(from)
            .to(STAKING_ADDRESS)
            .raw_call("compound")
            .returns(ExpectMessage(core::str::from_utf8(error_message).unwrap()))
            .run();
    }

    pub fn pause(&mut self) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(STAKING_ADDRESS)
            .whitebox(staking::contract_obj, |sc| {
                sc.pause_endpoint();
            });
    }

    pub fn set_caller_incentive(&mut self, incentive_bps: usize) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(STAKING_ADDRESS)
            .whitebox(staking::contract_obj, |sc| {
                sc.set_caller_incentive(incentive_bps);
            });
    }

    pub fn check_staked(&mut self, account: TestAddress, expected: u128) {
        self.world
            .query()
            .to(STAKING_ADDRESS)
            .whitebox(staking::contract_obj, |sc| {
                let position = sc.get_staker(account.to_managed_address());
                assert_raw(&position.amount, expected);
            });
    }

    /// Reward index and unclaimed rewards, in raw units.
    pub fn check_state(&mut self, total_staked: u128, reward_index: u128, unclaimed: u128) {
        self.world
            .query()
            .to(STAKING_ADDRESS)
            .whitebox(staking::contract_obj, |sc| {
                let state = sc.staking_state().get();
                assert_raw(&state.total_staked, total_staked);
                assert_raw(&state.reward_index, reward_index);
                assert_raw(&state.unclaimed_rewards, unclaimed);
            });
    }

    pub fn check_pending(&mut self, account: TestAddress, expected: u128) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(STAKING_ADDRESS)
            .whitebox(staking::contract_obj, |sc| {
                let pending = sc.get_user_pending_rewards(account.to_managed_address());
                assert_raw(&pending, expected);
            });
    }

    pub fn check_farm_stake(&mut self, pool_id: u32, expected: u128) {
        self.world
            .query()
            .to(FARM_ADDRESS)
            .whitebox(farm_mock::contract_obj, |sc| {
                let stake = sc
                    .user_stake(pool_id, &STAKING_ADDRESS.to_managed_address())
                    .get();
                assert_eq!(stake, BigUint::from(expected));
            });
    }

    pub fn check_balance(
        &mut self,
        account: TestAddress,
        token: TestTokenIdentifier,
        expected: u128,
    ) {
        self.world
            .check_account(account)
            .esdt_balance(token, BigUint::<StaticApi>::from(expected));
    }
}

pub fn setup_accounts(world: &mut ScenarioWorld) {
    world
        .account(OWNER_ADDRESS)
        .nonce(1)
        .esdt_balance(REWARD_TOKEN, tokens::<StaticApi>(FARM_RESERVE));

    for user in [ALICE, BOB] {
        world
            .account(user)
            .nonce(1)
            .esdt_balance(REWARD_TOKEN, tokens::<StaticApi>(USER_BALANCE))
            .esdt_balance(LP_TOKEN, tokens::<StaticApi>(USER_BALANCE))
            .esdt_balance(OTHER_TOKEN, tokens::<StaticApi>(USER_BALANCE));
    }
}

/// Base pool stakes the reward token, the LP pool stakes `LP_TOKEN`.
pub fn setup_farm(world: &mut ScenarioWorld) {
    world
        .tx()
        .from(OWNER_ADDRESS)
        .raw_deploy()
        .code(FARM_PATH)
        .new_address(FARM_ADDRESS)
        .whitebox(farm_mock::contract_obj, |sc| {
            sc.init(REWARD_TOKEN.to_token_identifier());
        });

    world
        .tx()
        .from(OWNER_ADDRESS)
        .to(FARM_ADDRESS)
        .whitebox(farm_mock::contract_obj, |sc| {
            sc.add_pool(
                BASE_POOL_ID,
                REWARD_TOKEN.to_token_identifier(),
                BigUint::from(milli_tokens(BASE_REWARD_PER_BLOCK_MILLI)),
            );
            sc.add_pool(
                LP_POOL_ID,
                LP_TOKEN.to_token_identifier(),
                BigUint::from(milli_tokens(LP_REWARD_PER_BLOCK_MILLI)),
            );
        });

    // Emission payouts
    world.set_esdt_balance(
        FARM_ADDRESS.to_managed_address::<StaticApi>(),
        REWARD_TOKEN.as_bytes(),
        tokens::<StaticApi>(FARM_RESERVE),
    );
}

pub fn setup_staking(world: &mut ScenarioWorld, kind: PoolKind) {
    let (staked_token, farm_pool_id) = match kind {
        PoolKind::Single => (REWARD_TOKEN, BASE_POOL_ID),
        PoolKind::Lp => (LP_TOKEN, LP_POOL_ID),
    };

    world
        .tx()
        .from(OWNER_ADDRESS)
        .raw_deploy()
        .code(STAKING_PATH)
        .new_address(STAKING_ADDRESS)
        .whitebox(staking::contract_obj, |sc| {
            sc.init(
                kind,
                staked_token.to_token_identifier(),
                REWARD_TOKEN.to_token_identifier(),
                FARM_ADDRESS.to_managed_address(),
                farm_pool_id,
                BASE_POOL_ID,
                TOKEN_DECIMALS,
                TOKEN_DECIMALS,
            );
        });
}
