use concordium_std::concordium_cfg_test;

#[concordium_cfg_test]
mod tests {
    use crate::{sctest::*, view::*};

    #[concordium_test]
    /// Test that buyTokens hands out tokens and counts them.
    fn test_buy_tokens() {
        let mut host = initial_host(1);
        mock_token_transfer(&mut host);
        let mut logger = TestLogger::init();

        let params_byte = to_bytes(&ContractTokenAmount::from(10));
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim!(ret.is_ok(), "Results in rejection");

        let params_byte = to_bytes(&ContractTokenAmount::from(5));
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(5),
            &mut logger,
        );
        claim!(ret.is_ok(), "Results in rejection");

        claim_eq!(host.state().tokens_sold, ContractTokenAmount::from(15));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&CrowdsaleEvent::Buy(BuyEvent {
                    amount: 10.into(),
                    buyer: BUYER_ACC,
                })),
                to_bytes(&CrowdsaleEvent::Buy(BuyEvent {
                    amount: 5.into(),
                    buyer: BUYER_ACC,
                })),
            ]
        );
    }

    #[concordium_test]
    fn test_buy_tokens_not_whitelisted() {
        let mut host = initial_host(1);
        mock_token_transfer(&mut host);
        let mut logger = TestLogger::init();

        let params_byte = to_bytes(&ContractTokenAmount::from(10));
        let ctx = receive_context(STRANGER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(1_000),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::NotWhitelisted))
        );

        // removed buyers are treated the same way
        host.state_mut().set_whitelisted(&BUYER, false);
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(1_000),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::NotWhitelisted))
        );

        claim_eq!(host.state().tokens_sold, ContractTokenAmount::from(0));
        claim!(logger.logs.is_empty(), "Nothing should be logged");
    }

    #[concordium_test]
    fn test_buy_tokens_insufficient_value() {
        let mut host = initial_host(3);
        mock_token_transfer(&mut host);
        let mut logger = TestLogger::init();

        let params_byte = to_bytes(&ContractTokenAmount::from(10));
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(29),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InsufficientValue))
        );
        claim_eq!(host.state().tokens_sold, ContractTokenAmount::from(0));
    }

    #[concordium_test]
    fn test_buy_zero_tokens() {
        let mut host = initial_host(1);
        mock_token_transfer(&mut host);
        let mut logger = TestLogger::init();

        let params_byte = to_bytes(&ContractTokenAmount::from(0));
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidInput))
        );
    }

    #[concordium_test]
    fn test_buy_tokens_after_finalize() {
        let mut host = initial_host(1);
        mock_token_transfer(&mut host);
        host.state_mut().status = SaleStatus::Finalized;
        let mut logger = TestLogger::init();

        let params_byte = to_bytes(&ContractTokenAmount::from(1));
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(1),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::SaleFinalized))
        );
    }

    #[concordium_test]
    /// The sale has no tokens left, the token contract rejection is passed on.
    fn test_buy_tokens_sold_out() {
        let mut host = initial_host(1);
        mock_token_transfer_insufficient(&mut host);
        let mut logger = TestLogger::init();

        let params_byte = to_bytes(&ContractTokenAmount::from(10));
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim_eq!(ret, Err(ContractError::InsufficientFunds));
        claim_eq!(host.state().tokens_sold, ContractTokenAmount::from(0));
        claim!(logger.logs.is_empty(), "Nothing should be logged");
    }

    #[concordium_test]
    fn test_buy_tokens_token_missing() {
        let mut host = initial_host(1);
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::returning_err::<()>(CallContractError::MissingContract),
        );
        let mut logger = TestLogger::init();

        let params_byte = to_bytes(&ContractTokenAmount::from(10));
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::MissingContract))
        );
    }

    #[concordium_test]
    fn test_buy_with_value() {
        let mut host = initial_host(2);
        mock_token_transfer(&mut host);
        let mut logger = TestLogger::init();

        let ctx = receive_context(BUYER, &[]);
        let ret: ContractResult<()> = contract_buy_with_value(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(9),
            &mut logger,
        );
        claim!(ret.is_ok(), "Results in rejection");

        claim_eq!(host.state().tokens_sold, ContractTokenAmount::from(4));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&CrowdsaleEvent::Buy(BuyEvent {
                amount: 4.into(),
                buyer: BUYER_ACC,
            }))]
        );
    }

    #[concordium_test]
    fn test_buy_with_value_rejections() {
        let mut host = initial_host(2);
        mock_token_transfer(&mut host);
        let mut logger = TestLogger::init();

        // not enough for a single unit
        let ctx = receive_context(BUYER, &[]);
        let ret: ContractResult<()> = contract_buy_with_value(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(1),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidInput))
        );

        let params_byte = to_bytes(&ContractTokenAmount::from(1));
        let ctx = receive_context(BUYER, &params_byte);
        let ret: ContractResult<()> = contract_buy_with_value(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::ParseParams))
        );

        let ctx = receive_context(STRANGER, &[]);
        let ret: ContractResult<()> = contract_buy_with_value(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::NotWhitelisted))
        );

        host.state_mut().price = 0;
        let ctx = receive_context(BUYER, &[]);
        let ret: ContractResult<()> = contract_buy_with_value(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidArithmetic))
        );

        claim_eq!(host.state().tokens_sold, ContractTokenAmount::from(0));
    }

    #[concordium_test]
    fn test_is_whitelisted() {
        let host = initial_host(1);

        let params_byte = to_bytes(&BUYER);
        let ctx = receive_context(STRANGER, &params_byte);
        claim_eq!(contract_is_whitelisted(&ctx, &host), Ok(true));

        let params_byte = to_bytes(&STRANGER);
        let ctx = receive_context(STRANGER, &params_byte);
        claim_eq!(contract_is_whitelisted(&ctx, &host), Ok(false));
    }

    #[concordium_test]
    fn test_on_receiving_cis2() {
        let host = initial_host(1);
        let params_byte = to_bytes(&OnReceivingCis2Params {
            token_id: TokenIdUnit(),
            amount: ContractTokenAmount::from(1_000_000),
            from: OWNER,
            data: AdditionalData::empty(),
        });

        let ctx = receive_context(Address::Contract(TOKEN), &params_byte);
        let ret: ContractResult<()> = contract_on_receiving_cis2(&ctx, &host);
        claim!(ret.is_ok(), "Results in rejection");

        let ctx = receive_context(Address::Contract(ContractAddress::new(9, 0)), &params_byte);
        let ret: ContractResult<()> = contract_on_receiving_cis2(&ctx, &host);
        claim_eq!(ret, Err(ContractError::Unauthorized));

        let ctx = receive_context(OWNER, &params_byte);
        let ret: ContractResult<()> = contract_on_receiving_cis2(&ctx, &host);
        claim_eq!(ret, Err(ContractError::Unauthorized));
    }
}
