use crate::state::{State, *};
use concordium_std::*;

#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ViewResponse {
    pub owner: AccountAddress,
    pub token: ContractAddress,
    pub price: MicroCcd,
    pub max_tokens: ContractTokenAmount,
    pub tokens_sold: ContractTokenAmount,
    pub status: SaleStatus,
}

#[receive(
    contract = "ico_crowdsale",
    name = "view",
    return_value = "ViewResponse"
)]
pub(crate) fn contract_view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ViewResponse> {
    let state = host.state();

    Ok(ViewResponse {
        owner: state.owner,
        token: state.token,
        price: state.price,
        max_tokens: state.max_tokens,
        tokens_sold: state.tokens_sold,
        status: state.status,
    })
}

// ------------------------------------------

#[receive(
    contract = "ico_crowdsale",
    name = "isWhitelisted",
    parameter = "Address",
    return_value = "bool"
)]
pub(crate) fn contract_is_whitelisted<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<bool> {
    let user: Address = ctx.parameter_cursor().get()?;
    Ok(host.state().is_whitelisted(&user))
}

type ViewWhitelistResponse = Vec<Address>;

/// Addresses currently allowed to buy.
#[receive(
    contract = "ico_crowdsale",
    name = "viewWhitelist",
    return_value = "ViewWhitelistResponse"
)]
pub(crate) fn contract_view_whitelist<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ViewWhitelistResponse> {
    Ok(host.state().whitelisted())
}

// ------------------------------------------

#[receive(contract = "ico_crowdsale", name = "price", return_value = "MicroCcd")]
pub(crate) fn contract_price<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<MicroCcd> {
    Ok(host.state().price)
}

#[receive(
    contract = "ico_crowdsale",
    name = "maxTokens",
    return_value = "ContractTokenAmount"
)]
pub(crate) fn contract_max_tokens<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ContractTokenAmount> {
    Ok(host.state().max_tokens)
}

#[receive(
    contract = "ico_crowdsale",
    name = "tokensSold",
    return_value = "ContractTokenAmount"
)]
pub(crate) fn contract_tokens_sold<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ContractTokenAmount> {
    Ok(host.state().tokens_sold)
}

#[receive(
    contract = "ico_crowdsale",
    name = "token",
    return_value = "ContractAddress"
)]
pub(crate) fn contract_token<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ContractAddress> {
    Ok(host.state().token)
}

#[receive(
    contract = "ico_crowdsale",
    name = "owner",
    return_value = "AccountAddress"
)]
pub(crate) fn contract_owner<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<AccountAddress> {
    Ok(host.state().owner)
}
