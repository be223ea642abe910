//! Sells units of a CIS-2 token at a fixed CCD price to whitelisted accounts.
//! The sale holds the tokens it sells, collected CCD stays in the contract
//! until the owner finalizes the sale.
#[cfg(any(feature = "wasm-test", test))]
mod sctest;
mod state;
mod view;

use concordium_cis2::{
    AdditionalData, BalanceOfQuery, BalanceOfQueryParams, BalanceOfQueryResponse,
    OnReceivingCis2Params, Receiver, TokenIdUnit, Transfer, TransferParams,
};
use concordium_std::*;
use sale_utils::{BuyEvent, CrowdsaleEvent, FinalizeEvent};
use state::{State, *};

/// The parameter schema for `init` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Token contract whose units are sold
    pub token: ContractAddress,
    /// MicroCCD to pay per token unit
    pub price: MicroCcd,
    /// Cap shown to buyers
    pub max_tokens: ContractTokenAmount,
}

/// # Init Function
/// The instantiating account becomes the owner of the sale.
/// Tokens are expected to be transferred in afterwards through `onReceivingCIS2`.
#[init(contract = "ico_crowdsale", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;

    Ok(State::new(
        state_builder,
        ctx.init_origin(),
        params.token,
        params.price,
        params.max_tokens,
    ))
}

// ==============================================
// For the owner
// ==========================================

/// Allow an account to buy. Adding an account twice has no effect.
///
/// Caller: sale owner only
/// Reject if:
/// - The sender is not the sale owner
/// - Fails to parse parameter
/// - The address is a contract
#[receive(
    contract = "ico_crowdsale",
    name = "addToWhitelist",
    parameter = "Address",
    error = "ContractError",
    mutable
)]
fn contract_add_to_whitelist<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    ensure!(
        ctx.sender().matches_account(&host.state().owner),
        ContractError::Unauthorized
    );

    let user: Address = ctx.parameter_cursor().get()?;
    if let Address::Account(_) = user {
        host.state_mut().set_whitelisted(&user, true);
    } else {
        // purchased tokens can only be paid out to accounts
        bail!(CustomContractError::AccountOnly.into())
    };

    Ok(())
}

/// Revoke the right to buy. Tokens already bought are not affected.
///
/// Caller: sale owner only
/// Reject if:
/// - The sender is not the sale owner
/// - Fails to parse parameter
#[receive(
    contract = "ico_crowdsale",
    name = "removeFromWhitelist",
    parameter = "Address",
    error = "ContractError",
    mutable
)]
fn contract_remove_from_whitelist<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    ensure!(
        ctx.sender().matches_account(&host.state().owner),
        ContractError::Unauthorized
    );

    let user: Address = ctx.parameter_cursor().get()?;
    host.state_mut().set_whitelisted(&user, false);

    Ok(())
}

/// Replace the price per token unit.
///
/// Caller: sale owner only
/// Reject if:
/// - The sender is not the sale owner
/// - Fails to parse parameter
#[receive(
    contract = "ico_crowdsale",
    name = "setPrice",
    parameter = "MicroCcd",
    error = "ContractError",
    mutable
)]
fn contract_set_price<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    ensure!(
        ctx.sender().matches_account(&host.state().owner),
        ContractError::Unauthorized
    );

    let price: MicroCcd = ctx.parameter_cursor().get()?;
    host.state_mut().price = price;

    Ok(())
}

/// Close the sale and hand the unsold tokens and all collected CCD to the owner.
/// Calling it again sweeps whatever arrived since, usually nothing.
///
/// Caller: sale owner only
/// Reject if:
/// - The sender is not the sale owner
/// - The balance query or the transfer on the token contract fails
/// - Fails to transfer CCD to the owner
#[receive(
    contract = "ico_crowdsale",
    name = "finalize",
    error = "ContractError",
    enable_logger,
    mutable
)]
fn contract_finalize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let owner = host.state().owner;
    ensure!(
        ctx.sender().matches_account(&owner),
        ContractError::Unauthorized
    );

    let token = host.state().token;
    let self_address = Address::from(ctx.self_address());

    let query = BalanceOfQueryParams {
        queries: vec![BalanceOfQuery {
            token_id: TokenIdUnit(),
            address: self_address,
        }],
    };
    let return_value = host
        .invoke_contract(
            &token,
            &query,
            EntrypointName::new_unchecked("balanceOf"),
            Amount::zero(),
        )?
        .1;
    let remaining_tokens = match return_value {
        Some(mut rv) => {
            let BalanceOfQueryResponse(balances): BalanceOfQueryResponse<ContractTokenAmount> =
                rv.get()?;
            balances
                .first()
                .copied()
                .ok_or(ContractError::from(CustomContractError::InvokeContractError))?
        },
        None => bail!(CustomContractError::InvokeContractError.into()),
    };
    let remaining_value = host.self_balance();

    if remaining_tokens.0 > 0 {
        let transfer = Transfer {
            from: self_address,
            to: Receiver::from_account(owner),
            token_id: TokenIdUnit(),
            amount: remaining_tokens,
            data: AdditionalData::empty(),
        };
        host.invoke_contract(
            &token,
            &TransferParams::from(vec![transfer]),
            EntrypointName::new_unchecked("transfer"),
            Amount::zero(),
        )
        .map_err(from_token_transfer)?;
    }

    if remaining_value > Amount::zero() {
        let transfer_result = host.invoke_transfer(&owner, remaining_value);
        ensure!(
            transfer_result.is_ok(),
            CustomContractError::TransferError.into()
        );
    }

    host.state_mut().status = SaleStatus::Finalized;

    logger.log(&CrowdsaleEvent::Finalize(FinalizeEvent {
        remaining_tokens,
        remaining_value,
    }))?;

    Ok(())
}

// ==============================================
// For the token contract
// ==========================================

/// Hook the token contract calls when units are transferred to the sale.
///
/// Caller: the configured token contract only
/// Reject if:
/// - The sender is any other address
/// - Fails to parse parameter
#[receive(
    contract = "ico_crowdsale",
    name = "onReceivingCIS2",
    parameter = "OnReceivingCis2Params<ContractTokenId, ContractTokenAmount>",
    error = "ContractError"
)]
fn contract_on_receiving_cis2<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    let sender = if let Address::Contract(contract) = ctx.sender() {
        contract
    } else {
        bail!(ContractError::Unauthorized)
    };
    ensure!(sender == host.state().token, ContractError::Unauthorized);

    let _params: OnReceivingCis2Params<ContractTokenId, ContractTokenAmount> =
        ctx.parameter_cursor().get()?;

    Ok(())
}

// ==============================================
// For buyers
// ==========================================

/// Buy `amount` token units, paying with the attached CCD.
/// Paying more than `amount * price` is accepted, the excess is not refunded.
///
/// Caller: whitelisted accounts
/// Reject if:
/// - Fails to parse parameter
/// - The sender is not whitelisted
/// - The sale is finalized
/// - `amount` is zero
/// - The attached CCD is less than `amount * price`
/// - The sale holds less than `amount` tokens
#[receive(
    contract = "ico_crowdsale",
    name = "buyTokens",
    parameter = "ContractTokenAmount",
    error = "ContractError",
    enable_logger,
    mutable,
    payable
)]
fn contract_buy_tokens<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let requested: ContractTokenAmount = ctx.parameter_cursor().get()?;
    purchase(ctx, host, amount, Some(requested), logger)
}

/// Plain CCD sent to the sale buys as many units as it pays for.
/// Runs the same checks as `buyTokens`.
///
/// Caller: whitelisted accounts
/// Reject if:
/// - A parameter is attached
/// - The price is zero
/// - Any `buyTokens` rejection
#[receive(
    contract = "ico_crowdsale",
    fallback,
    error = "ContractError",
    enable_logger,
    mutable,
    payable
)]
fn contract_buy_with_value<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    ensure!(
        ctx.parameter_cursor().size() == 0,
        CustomContractError::ParseParams.into()
    );
    purchase(ctx, host, amount, None, logger)
}

/// All checks happen in `check_purchase` before anything is written,
/// the token transfer is the only external call.
fn purchase<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    value: Amount,
    requested: Option<ContractTokenAmount>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let Purchase {
        buyer,
        amount,
        token,
        tokens_sold,
    } = host
        .state()
        .check_purchase(&ctx.sender(), value, requested)?;

    let transfer = Transfer {
        from: Address::from(ctx.self_address()),
        to: Receiver::from_account(buyer),
        token_id: TokenIdUnit(),
        amount,
        data: AdditionalData::empty(),
    };
    host.invoke_contract(
        &token,
        &TransferParams::from(vec![transfer]),
        EntrypointName::new_unchecked("transfer"),
        Amount::zero(),
    )
    .map_err(from_token_transfer)?;

    host.state_mut().tokens_sold = tokens_sold;

    logger.log(&CrowdsaleEvent::Buy(BuyEvent { amount, buyer }))?;

    Ok(())
}
