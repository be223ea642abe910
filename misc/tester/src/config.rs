use concordium_smart_contract_testing::{AccountAddress, Amount, Energy};

pub const TARGET_DIR: &str = "../../target/concordium/wasm32-unknown-unknown/release/";

pub const MODULE_TOKEN: &str = "ico_token";
pub const MODULE_SALE: &str = "ico_crowdsale";

pub const CONTRACT_TOKEN: &str = "ico_token";
pub const CONTRACT_SALE: &str = "ico_crowdsale";

// `[0u8; 32]` is the null account, the token refuses to pay it.
pub const ACC_ADDR_OWNER: AccountAddress = AccountAddress([1u8; 32]);
pub const ACC_ADDR_BUYER: AccountAddress = AccountAddress([2u8; 32]);
pub const ACC_ADDR_OTHER: AccountAddress = AccountAddress([3u8; 32]);
pub const AMOUNT_INIT: Amount = Amount::from_ccd(1000);

pub const ENERGY: Energy = Energy { energy: 10000 };

pub const TOKEN_NAME: &str = "Next Gen";
pub const TOKEN_SYMBOL: &str = "NXG";
pub const TOKEN_DECIMALS: u8 = 6;
pub const TOKEN_METADATA_URL: &str = "https://example.com/nxg.json";
pub const MAX_SUPPLY: u64 = 1_000_000;

/// MicroCCD per token unit.
pub const PRICE: u64 = 1;
