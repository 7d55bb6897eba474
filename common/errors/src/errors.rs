#![no_std]

pub static ERROR_INVALID_ASSET: &[u8] = b"Invalid asset.";

pub static ERROR_ZERO_AMOUNT: &[u8] = b"Amount must be greater than zero.";

pub static ERROR_INSUFFICIENT_BALANCE: &[u8] = b"Insufficient share balance.";

pub static ERROR_INSUFFICIENT_LIQUIDITY: &[u8] = b"Insufficient liquidity to complete the operation.";

pub static ERROR_STALE_OR_FAILED_PRICE_FEED: &[u8] = b"Price feed stale or unavailable.";

pub static ERROR_EXTERNAL_CALL_FAILED: &[u8] = b"External market call failed.";

pub static ERROR_ARITHMETIC_INVARIANT: &[u8] = b"Arithmetic invariant violated.";

pub static ERROR_MARKET_ALREADY_REGISTERED: &[u8] = b"Market already registered.";

pub static ERROR_MARKET_NOT_REGISTERED: &[u8] = b"Market not registered.";

pub static ERROR_MARKET_NOT_EMPTY: &[u8] = b"Market still holds borrow or free shares.";

pub static ERROR_MARKET_UNDERLYING_MISMATCH: &[u8] = b"Market underlying does not match the asset.";

pub static ERROR_INVALID_DECIMALS: &[u8] = b"Invalid asset decimals.";

pub static ERROR_INVALID_LIMIT_FRACTION: &[u8] = b"Limit fraction must be strictly between 0 and 1.";

pub static ERROR_INVALID_LOAN_TO_VALUE: &[u8] = b"Loan to value must be greater than 0 and at most 1.";

pub static ERROR_COMPOUND_DEPTH_TOO_HIGH: &[u8] = b"Compound depth above the allowed ceiling.";

pub static ERROR_INVALID_FEE: &[u8] = b"Fee above the allowed ceiling.";

pub static ERROR_INVALID_LOOP_LIMIT: &[u8] = b"Loop limit must be between 1 and the allowed ceiling.";

pub static ERROR_NOT_PAUSED: &[u8] = b"Vault must be paused.";

pub static ERROR_POOL_LOCKED: &[u8] = b"Pool is locked by an ongoing action.";

pub static ERROR_WRONG_PAYMENT_TOKEN: &[u8] = b"Wrong payment token.";

pub static ERROR_PEGGED_PAYMENT_TOO_SMALL: &[u8] = b"Pegged token payment does not cover the liability.";

pub static ERROR_SWAP_ROUTER_NOT_SET: &[u8] = b"Swap router not set.";

pub static ERROR_INVALID_ADDRESS: &[u8] = b"Invalid address.";

pub static ERROR_INVALID_CALLER_INCENTIVE: &[u8] = b"Caller incentive above the allowed ceiling.";

pub static ERROR_NOTHING_STAKED: &[u8] = b"Nothing staked.";

pub static ERROR_INVALID_POOL_CONFIG: &[u8] = b"Pool kind does not match the staked and reward tokens.";

pub static ERROR_INSUFFICIENT_STAKE: &[u8] = b"Amount exceeds the staked balance.";
