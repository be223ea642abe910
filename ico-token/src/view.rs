use crate::state::{State, *};
use concordium_std::*;

#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ViewResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub max_supply: ContractTokenAmount,
    pub total_supply: ContractTokenAmount,
}

#[receive(contract = "ico_token", name = "view", return_value = "ViewResponse")]
pub(crate) fn contract_view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ViewResponse> {
    let state = host.state();

    Ok(ViewResponse {
        name: state.name.clone(),
        symbol: state.symbol.clone(),
        decimals: state.decimals,
        max_supply: state.max_supply,
        total_supply: state.total_supply,
    })
}

// ------------------------------------------

type ViewHoldersResponse = Vec<(Address, ContractTokenAmount)>;

/// Every holder with a non-zero balance.
#[receive(
    contract = "ico_token",
    name = "viewHolders",
    return_value = "ViewHoldersResponse"
)]
pub(crate) fn contract_view_holders<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ViewHoldersResponse> {
    let state = host.state();

    let mut ret: Vec<(Address, ContractTokenAmount)> = Vec::new();
    for (addr, balance) in state.balances.iter() {
        if balance.0 > 0 {
            ret.push((*addr, *balance));
        }
    }

    Ok(ret)
}
