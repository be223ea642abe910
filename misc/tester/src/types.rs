use concordium_cis2::TokenAmountU64;
use concordium_std::{ContractAddress, SchemaType, Serialize};

// ------------------------------------------------------
// params
// ------------------------------------------------------

/// Init parameter of `ico_token`.
#[derive(Serialize, SchemaType)]
pub struct TokenInitParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub metadata_url: String,
    pub max_supply: TokenAmountU64,
}

/// Init parameter of `ico_crowdsale`.
#[derive(Serialize, SchemaType)]
pub struct SaleInitParams {
    pub token: ContractAddress,
    pub price: u64,
    pub max_tokens: TokenAmountU64,
}
