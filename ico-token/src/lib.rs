//! Fixed supply CIS-2 token backing the ICO sale.
//! The whole supply is issued to the instantiating account at init,
//! afterwards tokens are only moved, never minted or burned.
#[cfg(any(feature = "wasm-test", test))]
mod sctest;
mod state;
mod view;

use concordium_cis2::*;
use concordium_std::*;
use state::{State, *};

/// List of supported standards by this contract address.
const SUPPORTS_STANDARDS: [StandardIdentifier<'static>; 2] =
    [CIS0_STANDARD_IDENTIFIER, CIS2_STANDARD_IDENTIFIER];

pub type TransferParameter = TransferParams<ContractTokenId, ContractTokenAmount>;
pub type ContractBalanceOfQueryParams = BalanceOfQueryParams<ContractTokenId>;
pub type ContractBalanceOfQueryResponse = BalanceOfQueryResponse<ContractTokenAmount>;
pub type ContractTokenMetadataQueryParams = TokenMetadataQueryParams<ContractTokenId>;

/// The parameter schema for `init` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Display data of the token
    pub info: TokenInfo,
    /// Units issued to the instantiating account
    pub max_supply: ContractTokenAmount,
}

/// # Init Function
/// Issues `max_supply` to the instantiating account.
#[init(contract = "ico_token", parameter = "InitParams", enable_logger)]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
    logger: &mut impl HasLogger,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;
    let issuer = Address::Account(ctx.init_origin());
    let metadata_url = MetadataUrl {
        url: params.info.metadata_url.clone(),
        hash: None,
    };

    let state = State::new(state_builder, params.info, params.max_supply, issuer);

    logger
        .log(&Cis2Event::Mint(MintEvent {
            token_id: TokenIdUnit(),
            amount: params.max_supply,
            owner: issuer,
        }))
        .map_err(CustomContractError::from)?;
    logger
        .log(&Cis2Event::TokenMetadata::<_, ContractTokenAmount>(
            TokenMetadataEvent {
                token_id: TokenIdUnit(),
                metadata_url,
            },
        ))
        .map_err(CustomContractError::from)?;

    Ok(state)
}

/// Execute a list of token transfers, in the order of the list.
/// If the receiver is a contract, its hook is invoked after the balances moved.
///
/// Caller: the owner of the tokens or one of its operators
/// Reject if:
/// - Fails to parse parameter
/// - The sender is neither `from` nor an operator of `from`
/// - `from` holds less than `amount`
/// - The receiver is the null account
/// - Crediting the receiver overflows
/// - The receiving contract rejects the hook
#[receive(
    contract = "ico_token",
    name = "transfer",
    parameter = "TransferParameter",
    error = "ContractError",
    enable_logger,
    mutable
)]
fn contract_transfer<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let TransferParams(transfers): TransferParameter = ctx.parameter_cursor().get()?;
    let sender = ctx.sender();

    for Transfer {
        token_id,
        amount,
        from,
        to,
        data,
    } in transfers
    {
        ensure!(
            from == sender || host.state().is_operator(&sender, &from),
            ContractError::Unauthorized
        );

        let to_address = to.address();
        host.state_mut().transfer(amount, &from, &to_address)?;

        logger.log(&Cis2Event::Transfer(TransferEvent {
            token_id,
            amount,
            from,
            to: to_address,
        }))?;

        if let Receiver::Contract(address, function) = to {
            let parameter = OnReceivingCis2Params {
                token_id,
                amount,
                from,
                data,
            };
            host.invoke_contract(
                &address,
                &parameter,
                function.as_entrypoint_name(),
                Amount::zero(),
            )?;
        }
    }

    Ok(())
}

/// Add or remove operators of the sender's tokens.
///
/// Caller: Anyone
/// Reject if:
/// - Fails to parse parameter
#[receive(
    contract = "ico_token",
    name = "updateOperator",
    parameter = "UpdateOperatorParams",
    error = "ContractError",
    enable_logger,
    mutable
)]
fn contract_update_operator<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let UpdateOperatorParams(params) = ctx.parameter_cursor().get()?;
    let sender = ctx.sender();

    let state = host.state_mut();
    for param in params {
        match param.update {
            OperatorUpdate::Add => state.add_operator(&sender, &param.operator),
            OperatorUpdate::Remove => state.remove_operator(&sender, &param.operator),
        }

        logger.log(
            &Cis2Event::<ContractTokenId, ContractTokenAmount>::UpdateOperator(
                UpdateOperatorEvent {
                    owner: sender,
                    operator: param.operator,
                    update: param.update,
                },
            ),
        )?;
    }

    Ok(())
}

/// Query the token balance of a list of addresses.
#[receive(
    contract = "ico_token",
    name = "balanceOf",
    parameter = "ContractBalanceOfQueryParams",
    return_value = "ContractBalanceOfQueryResponse",
    error = "ContractError"
)]
fn contract_balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractBalanceOfQueryResponse> {
    let params: ContractBalanceOfQueryParams = ctx.parameter_cursor().get()?;

    let mut response = Vec::with_capacity(params.queries.len());
    for query in params.queries {
        response.push(host.state().balance(&query.address));
    }

    Ok(BalanceOfQueryResponse::from(response))
}

/// Whether the given addresses are operators of the given owners.
#[receive(
    contract = "ico_token",
    name = "operatorOf",
    parameter = "OperatorOfQueryParams",
    return_value = "OperatorOfQueryResponse",
    error = "ContractError"
)]
fn contract_operator_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<OperatorOfQueryResponse> {
    let params: OperatorOfQueryParams = ctx.parameter_cursor().get()?;

    let mut response = Vec::with_capacity(params.queries.len());
    for query in params.queries {
        response.push(host.state().is_operator(&query.address, &query.owner));
    }

    Ok(OperatorOfQueryResponse::from(response))
}

#[receive(
    contract = "ico_token",
    name = "tokenMetadata",
    parameter = "ContractTokenMetadataQueryParams",
    return_value = "TokenMetadataQueryResponse",
    error = "ContractError"
)]
fn contract_token_metadata<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<TokenMetadataQueryResponse> {
    let params: ContractTokenMetadataQueryParams = ctx.parameter_cursor().get()?;

    let mut response = Vec::with_capacity(params.queries.len());
    for _ in params.queries {
        response.push(MetadataUrl {
            url: host.state().metadata_url.clone(),
            hash: None,
        });
    }

    Ok(TokenMetadataQueryResponse::from(response))
}

/// CIS-0 discovery of the standards this contract implements.
#[receive(
    contract = "ico_token",
    name = "supports",
    parameter = "SupportsQueryParams",
    return_value = "SupportsQueryResponse",
    error = "ContractError"
)]
fn contract_supports<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<SupportsQueryResponse> {
    let params: SupportsQueryParams = ctx.parameter_cursor().get()?;

    let mut response = Vec::with_capacity(params.queries.len());
    for std_id in params.queries {
        if SUPPORTS_STANDARDS.contains(&std_id.as_standard_identifier()) {
            response.push(SupportResult::Support);
        } else {
            response.push(SupportResult::NoSupport);
        }
    }

    Ok(SupportsQueryResponse::from(response))
}
