use concordium_std::concordium_cfg_test;

#[concordium_cfg_test]
mod tests {
    use crate::{sctest::*, view::*};

    #[concordium_test]
    fn test_init() {
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(OWNER_ACC);
        let params_byte = to_bytes(&init_parameter(3));
        ctx.set_parameter(&params_byte);

        let mut state_builder = TestStateBuilder::new();
        let result = contract_init(&ctx, &mut state_builder);
        claim!(result.is_ok(), "Results in rejection");
        let state = result.unwrap();

        claim_eq!(state.owner, OWNER_ACC);
        claim_eq!(state.token, TOKEN);
        claim_eq!(state.price, 3);
        claim_eq!(state.max_tokens, ContractTokenAmount::from(1_000_000));
        claim_eq!(state.tokens_sold, ContractTokenAmount::from(0));
        claim_eq!(state.status, SaleStatus::Active);
        claim!(state.whitelisted().is_empty());
    }

    #[concordium_test]
    fn test_add_to_whitelist() {
        let mut host = initial_host(1);
        let user = Address::Account(AccountAddress([20u8; 32]));
        let params_byte = to_bytes(&user);

        let ctx = receive_context(OWNER, &params_byte);
        let ret: ContractResult<()> = contract_add_to_whitelist(&ctx, &mut host);
        claim!(ret.is_ok(), "Results in rejection");
        // adding twice changes nothing
        let ret: ContractResult<()> = contract_add_to_whitelist(&ctx, &mut host);
        claim!(ret.is_ok(), "Results in rejection");

        claim!(host.state().is_whitelisted(&user));
        claim_eq!(host.state().whitelisted().len(), 2);

        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_add_to_whitelist(&ctx, &mut host);
        claim_eq!(ret, Err(ContractError::Unauthorized));
    }

    #[concordium_test]
    fn test_add_contract_to_whitelist() {
        let mut host = initial_host(1);
        let contract = Address::Contract(ContractAddress::new(7, 0));
        let params_byte = to_bytes(&contract);

        let ctx = receive_context(OWNER, &params_byte);
        let ret: ContractResult<()> = contract_add_to_whitelist(&ctx, &mut host);
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::AccountOnly))
        );
        claim!(!host.state().is_whitelisted(&contract));
    }

    #[concordium_test]
    fn test_remove_from_whitelist() {
        let mut host = initial_host(1);
        let params_byte = to_bytes(&BUYER);

        let ctx = receive_context(STRANGER, &params_byte);
        let ret: ContractResult<()> = contract_remove_from_whitelist(&ctx, &mut host);
        claim_eq!(ret, Err(ContractError::Unauthorized));
        claim!(host.state().is_whitelisted(&BUYER));

        let ctx = receive_context(OWNER, &params_byte);
        let ret: ContractResult<()> = contract_remove_from_whitelist(&ctx, &mut host);
        claim!(ret.is_ok(), "Results in rejection");

        let ret = contract_is_whitelisted(&ctx, &host);
        claim_eq!(ret, Ok(false));
        claim!(host.state().whitelisted().is_empty());
    }

    #[concordium_test]
    fn test_set_price() {
        let mut host = initial_host(1);
        let params_byte = to_bytes(&5_000_000u64);

        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_set_price(&ctx, &mut host);
        claim_eq!(ret, Err(ContractError::Unauthorized));
        claim_eq!(host.state().price, 1);

        let ctx = receive_context(OWNER, &params_byte);
        let ret: ContractResult<()> = contract_set_price(&ctx, &mut host);
        claim!(ret.is_ok(), "Results in rejection");

        let ret = contract_price(&ctx, &host);
        claim_eq!(ret, Ok(5_000_000));
    }

    #[concordium_test]
    fn test_finalize() {
        let mut host = initial_host(1);
        mock_token_balance(&mut host, 400);
        mock_token_transfer(&mut host);
        host.set_self_balance(Amount::from_micro_ccd(600));
        let mut logger = TestLogger::init();

        let ctx = receive_context(OWNER, &[]);
        let ret: ContractResult<()> = contract_finalize(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");

        claim_eq!(host.state().status, SaleStatus::Finalized);
        claim!(host.transfer_occurred(&OWNER_ACC, Amount::from_micro_ccd(600)));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&CrowdsaleEvent::Finalize(FinalizeEvent {
                remaining_tokens: 400.into(),
                remaining_value: Amount::from_micro_ccd(600),
            }))]
        );
    }

    #[concordium_test]
    fn test_finalize_twice() {
        let mut host = initial_host(1);
        mock_token_balance(&mut host, 400);
        mock_token_transfer(&mut host);
        host.set_self_balance(Amount::from_micro_ccd(600));
        let mut logger = TestLogger::init();

        let ctx = receive_context(OWNER, &[]);
        let ret: ContractResult<()> = contract_finalize(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");

        // everything was swept
        mock_token_balance(&mut host, 0);
        host.set_self_balance(Amount::zero());
        let ret: ContractResult<()> = contract_finalize(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");

        claim_eq!(host.state().status, SaleStatus::Finalized);
        claim_eq!(
            logger.logs[1],
            to_bytes(&CrowdsaleEvent::Finalize(FinalizeEvent {
                remaining_tokens: 0.into(),
                remaining_value: Amount::zero(),
            }))
        );
    }

    #[concordium_test]
    fn test_finalize_empty_sale() {
        // no transfer is mocked, calling it would fail the test
        let mut host = initial_host(1);
        mock_token_balance(&mut host, 0);
        host.set_self_balance(Amount::zero());
        let mut logger = TestLogger::init();

        let ctx = receive_context(OWNER, &[]);
        let ret: ContractResult<()> = contract_finalize(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");
        claim_eq!(host.state().status, SaleStatus::Finalized);
    }

    #[concordium_test]
    fn test_finalize_not_owner() {
        let mut host = initial_host(1);
        let mut logger = TestLogger::init();

        let ctx = receive_context(BUYER, &[]);
        let ret: ContractResult<()> = contract_finalize(&ctx, &mut host, &mut logger);
        claim_eq!(ret, Err(ContractError::Unauthorized));
        claim_eq!(host.state().status, SaleStatus::Active);
        claim!(logger.logs.is_empty(), "Nothing should be logged");
    }

    #[concordium_test]
    fn test_view() {
        let mut host = initial_host(2);
        host.state_mut().tokens_sold = 30.into();

        let ctx = receive_context(STRANGER, &[]);
        let ret = contract_view(&ctx, &host);
        claim_eq!(
            ret,
            Ok(ViewResponse {
                owner: OWNER_ACC,
                token: TOKEN,
                price: 2,
                max_tokens: 1_000_000.into(),
                tokens_sold: 30.into(),
                status: SaleStatus::Active,
            })
        );

        claim_eq!(contract_owner(&ctx, &host), Ok(OWNER_ACC));
        claim_eq!(contract_token(&ctx, &host), Ok(TOKEN));
        claim_eq!(
            contract_max_tokens(&ctx, &host),
            Ok(ContractTokenAmount::from(1_000_000))
        );
        claim_eq!(
            contract_tokens_sold(&ctx, &host),
            Ok(ContractTokenAmount::from(30))
        );
        claim_eq!(contract_view_whitelist(&ctx, &host), Ok(vec![BUYER]));
    }
}
