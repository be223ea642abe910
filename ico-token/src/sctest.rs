use crate::{view::*, *};
use concordium_cis2::*;
use concordium_std::test_infrastructure::*;

const ISSUER_ACC: AccountAddress = AccountAddress([1u8; 32]);
const ISSUER: Address = Address::Account(ISSUER_ACC);
const ALICE_ACC: AccountAddress = AccountAddress([2u8; 32]);
const ALICE: Address = Address::Account(ALICE_ACC);
const BOB: Address = Address::Account(AccountAddress([3u8; 32]));
const SELF_ADDRESS: ContractAddress = ContractAddress {
    index: 1,
    subindex: 0,
};
const SALE_CONTRACT: ContractAddress = ContractAddress {
    index: 2,
    subindex: 0,
};
const MAX_SUPPLY: u64 = 1_000_000;

fn init_parameter() -> InitParams {
    InitParams {
        info: TokenInfo {
            name: "Next Gen".to_string(),
            symbol: "NXG".to_string(),
            decimals: 6,
            metadata_url: "https://example.com/nxg.json".to_string(),
        },
        max_supply: MAX_SUPPLY.into(),
    }
}

fn initial_host() -> TestHost<State<TestStateApi>> {
    let mut state_builder = TestStateBuilder::new();
    let state = State::new(
        &mut state_builder,
        init_parameter().info,
        MAX_SUPPLY.into(),
        ISSUER,
    );
    TestHost::new(state, state_builder)
}

fn receive_context(sender: Address, parameter_bytes: &[u8]) -> TestReceiveContext {
    let mut ctx = TestReceiveContext::empty();
    ctx.set_self_address(SELF_ADDRESS);
    ctx.set_sender(sender);
    ctx.set_parameter(parameter_bytes);
    ctx
}

fn single_transfer(from: Address, to: Receiver, amount: u64) -> TransferParameter {
    TransferParams::from(vec![Transfer {
        from,
        to,
        token_id: TokenIdUnit(),
        amount: ContractTokenAmount::from(amount),
        data: AdditionalData::empty(),
    }])
}

fn sale_hook() -> OwnedEntrypointName {
    OwnedEntrypointName::new_unchecked("onReceivingCIS2".into())
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_init() {
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(ISSUER_ACC);
        let params_byte = to_bytes(&init_parameter());
        ctx.set_parameter(&params_byte);

        let mut builder = TestStateBuilder::new();
        let mut logger = TestLogger::init();
        let result = contract_init(&ctx, &mut builder, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
        let state = result.unwrap();

        claim_eq!(state.balance(&ISSUER), ContractTokenAmount::from(MAX_SUPPLY));
        claim_eq!(state.total_supply, state.max_supply);
        claim_eq!(state.circulating(), MAX_SUPPLY);

        claim_eq!(logger.logs.len(), 2, "Mint and metadata should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&Cis2Event::Mint(MintEvent {
                token_id: TokenIdUnit(),
                amount: ContractTokenAmount::from(MAX_SUPPLY),
                owner: ISSUER,
            }))
        );
        claim_eq!(
            logger.logs[1],
            to_bytes(&Cis2Event::TokenMetadata::<_, ContractTokenAmount>(
                TokenMetadataEvent {
                    token_id: TokenIdUnit(),
                    metadata_url: MetadataUrl {
                        url: "https://example.com/nxg.json".to_string(),
                        hash: None,
                    },
                }
            ))
        );
    }

    #[concordium_test]
    fn test_transfer_account() {
        let mut host = initial_host();
        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_account(ALICE_ACC),
            400,
        ));
        let ctx = receive_context(ISSUER, &params_byte);
        let mut logger = TestLogger::init();

        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");

        claim_eq!(
            host.state().balance(&ISSUER),
            ContractTokenAmount::from(MAX_SUPPLY - 400)
        );
        claim_eq!(host.state().balance(&ALICE), ContractTokenAmount::from(400));
        claim_eq!(host.state().circulating(), MAX_SUPPLY);
        claim_eq!(
            logger.logs,
            vec![to_bytes(&Cis2Event::Transfer(TransferEvent {
                token_id: TokenIdUnit(),
                amount: ContractTokenAmount::from(400),
                from: ISSUER,
                to: ALICE,
            }))]
        );
    }

    #[concordium_test]
    fn test_transfer_not_owner() {
        let mut host = initial_host();
        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_account(ALICE_ACC),
            400,
        ));
        let ctx = receive_context(ALICE, &params_byte);
        let mut logger = TestLogger::init();

        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim_eq!(ret, Err(ContractError::Unauthorized));
        claim_eq!(
            host.state().balance(&ISSUER),
            ContractTokenAmount::from(MAX_SUPPLY)
        );
        claim!(logger.logs.is_empty(), "Nothing should be logged");
    }

    #[concordium_test]
    fn test_transfer_insufficient_funds() {
        let mut host = initial_host();
        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_account(ALICE_ACC),
            MAX_SUPPLY + 1,
        ));
        let ctx = receive_context(ISSUER, &params_byte);
        let mut logger = TestLogger::init();

        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim_eq!(ret, Err(ContractError::InsufficientFunds));
        claim_eq!(host.state().balance(&ALICE), ContractTokenAmount::from(0));
    }

    #[concordium_test]
    fn test_transfer_null_recipient() {
        let mut host = initial_host();
        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_account(NULL_ACCOUNT),
            1,
        ));
        let ctx = receive_context(ISSUER, &params_byte);
        let mut logger = TestLogger::init();

        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidRecipient))
        );
        claim_eq!(
            host.state().balance(&ISSUER),
            ContractTokenAmount::from(MAX_SUPPLY)
        );
    }

    #[concordium_test]
    fn test_transfer_by_operator() {
        let mut host = initial_host();

        // issuer makes alice an operator
        let params_byte = to_bytes(&UpdateOperatorParams(vec![UpdateOperator {
            update: OperatorUpdate::Add,
            operator: ALICE,
        }]));
        let ctx = receive_context(ISSUER, &params_byte);
        let mut logger = TestLogger::init();
        let ret: ContractResult<()> = contract_update_operator(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");
        claim_eq!(
            logger.logs[0],
            to_bytes(
                &Cis2Event::<ContractTokenId, ContractTokenAmount>::UpdateOperator(
                    UpdateOperatorEvent {
                        owner: ISSUER,
                        operator: ALICE,
                        update: OperatorUpdate::Add,
                    }
                )
            )
        );

        // alice moves the issuer's tokens to bob
        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_account(AccountAddress([3u8; 32])),
            250,
        ));
        let ctx = receive_context(ALICE, &params_byte);
        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");
        claim_eq!(host.state().balance(&BOB), ContractTokenAmount::from(250));

        // after removal alice is rejected again
        let params_byte = to_bytes(&UpdateOperatorParams(vec![UpdateOperator {
            update: OperatorUpdate::Remove,
            operator: ALICE,
        }]));
        let ctx = receive_context(ISSUER, &params_byte);
        let ret: ContractResult<()> = contract_update_operator(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");

        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_account(AccountAddress([3u8; 32])),
            250,
        ));
        let ctx = receive_context(ALICE, &params_byte);
        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim_eq!(ret, Err(ContractError::Unauthorized));
        claim_eq!(host.state().balance(&BOB), ContractTokenAmount::from(250));
    }

    #[concordium_test]
    fn test_transfer_to_contract_calls_hook() {
        let mut host = initial_host();
        host.setup_mock_entrypoint(SALE_CONTRACT, sale_hook(), MockFn::returning_ok(()));

        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_contract(SALE_CONTRACT, sale_hook()),
            MAX_SUPPLY,
        ));
        let ctx = receive_context(ISSUER, &params_byte);
        let mut logger = TestLogger::init();

        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");
        claim_eq!(
            host.state().balance(&Address::Contract(SALE_CONTRACT)),
            ContractTokenAmount::from(MAX_SUPPLY)
        );
        claim_eq!(host.state().balance(&ISSUER), ContractTokenAmount::from(0));
    }

    #[concordium_test]
    fn test_transfer_to_contract_hook_rejects() {
        let mut host = initial_host();
        host.setup_mock_entrypoint(
            SALE_CONTRACT,
            sale_hook(),
            MockFn::new_v1(|_parameter, _amount, _balance, _state| {
                Err(CallContractError::<()>::LogicReject {
                    reason: -1,
                    return_value: (),
                })
            }),
        );

        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_contract(SALE_CONTRACT, sale_hook()),
            10,
        ));
        let ctx = receive_context(ISSUER, &params_byte);
        let mut logger = TestLogger::init();

        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim_eq!(
            ret,
            Err(ContractError::Custom(
                CustomContractError::InvokeContractError
            ))
        );
    }

    #[concordium_test]
    fn test_balance_of() {
        let mut host = initial_host();
        let params_byte = to_bytes(&single_transfer(
            ISSUER,
            Receiver::from_account(ALICE_ACC),
            10,
        ));
        let ctx = receive_context(ISSUER, &params_byte);
        let mut logger = TestLogger::init();
        let ret: ContractResult<()> = contract_transfer(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");

        let params_byte = to_bytes(&BalanceOfQueryParams {
            queries: vec![
                BalanceOfQuery {
                    token_id: TokenIdUnit(),
                    address: ISSUER,
                },
                BalanceOfQuery {
                    token_id: TokenIdUnit(),
                    address: ALICE,
                },
                BalanceOfQuery {
                    token_id: TokenIdUnit(),
                    address: BOB,
                },
            ],
        });
        let ctx = receive_context(BOB, &params_byte);
        let ret = contract_balance_of(&ctx, &host);
        claim!(ret.is_ok(), "Results in rejection");
        claim_eq!(
            to_bytes(&ret.unwrap()),
            to_bytes(&BalanceOfQueryResponse::from(vec![
                ContractTokenAmount::from(MAX_SUPPLY - 10),
                ContractTokenAmount::from(10),
                ContractTokenAmount::from(0),
            ]))
        );
    }

    #[concordium_test]
    fn test_operator_of() {
        let mut host = initial_host();
        host.state_mut().add_operator(&ISSUER, &ALICE);

        let params_byte = to_bytes(&OperatorOfQueryParams {
            queries: vec![
                OperatorOfQuery {
                    owner: ISSUER,
                    address: ALICE,
                },
                OperatorOfQuery {
                    owner: ALICE,
                    address: ISSUER,
                },
            ],
        });
        let ctx = receive_context(BOB, &params_byte);
        let ret = contract_operator_of(&ctx, &host);
        claim!(ret.is_ok(), "Results in rejection");
        claim_eq!(
            to_bytes(&ret.unwrap()),
            to_bytes(&OperatorOfQueryResponse::from(vec![true, false]))
        );
    }

    #[concordium_test]
    fn test_supports() {
        let host = initial_host();
        let params_byte = to_bytes(&SupportsQueryParams {
            queries: vec![
                StandardIdentifierOwned::new_unchecked("CIS-0".to_string()),
                StandardIdentifierOwned::new_unchecked("CIS-2".to_string()),
                StandardIdentifierOwned::new_unchecked("CIS-3".to_string()),
            ],
        });
        let ctx = receive_context(BOB, &params_byte);
        let ret = contract_supports(&ctx, &host);
        claim!(ret.is_ok(), "Results in rejection");
        claim_eq!(
            to_bytes(&ret.unwrap()),
            to_bytes(&SupportsQueryResponse::from(vec![
                SupportResult::Support,
                SupportResult::Support,
                SupportResult::NoSupport,
            ]))
        );
    }

    #[concordium_test]
    fn test_view() {
        let host = initial_host();
        let ctx = receive_context(BOB, &[]);
        let ret = contract_view(&ctx, &host);
        claim_eq!(
            ret,
            Ok(ViewResponse {
                name: "Next Gen".to_string(),
                symbol: "NXG".to_string(),
                decimals: 6,
                max_supply: ContractTokenAmount::from(MAX_SUPPLY),
                total_supply: ContractTokenAmount::from(MAX_SUPPLY),
            })
        );
    }
}
