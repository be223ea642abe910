use crate::{test_infrastructure::*, *};
use concordium_cis2::{BalanceOfQueryResponse, TokenAmountU64};
use sale_utils::error::CIS2_INSUFFICIENT_FUNDS;

const OWNER_ACC: AccountAddress = AccountAddress([1u8; 32]);
const OWNER: Address = Address::Account(OWNER_ACC);
const BUYER_ACC: AccountAddress = AccountAddress([10u8; 32]);
const BUYER: Address = Address::Account(BUYER_ACC);
const STRANGER: Address = Address::Account(AccountAddress([11u8; 32]));
const TOKEN: ContractAddress = ContractAddress {
    index: 1,
    subindex: 0,
};
const SELF_ADDRESS: ContractAddress = ContractAddress {
    index: 2,
    subindex: 0,
};

pub(crate) fn init_parameter(price: MicroCcd) -> InitParams {
    InitParams {
        token: TOKEN,
        price,
        max_tokens: 1_000_000.into(),
    }
}

/// A running sale with `BUYER` on the whitelist.
fn initial_host(price: MicroCcd) -> TestHost<State<TestStateApi>> {
    let params = init_parameter(price);
    let mut state_builder = TestStateBuilder::new();
    let mut state = State::new(
        &mut state_builder,
        OWNER_ACC,
        params.token,
        params.price,
        params.max_tokens,
    );
    state.set_whitelisted(&BUYER, true);
    TestHost::new(state, state_builder)
}

fn receive_context(sender: Address, parameter_bytes: &[u8]) -> TestReceiveContext {
    let mut ctx = TestReceiveContext::empty();
    ctx.set_self_address(SELF_ADDRESS);
    ctx.set_owner(OWNER_ACC);
    ctx.set_sender(sender);
    ctx.set_parameter(parameter_bytes);
    ctx
}

fn mock_token_transfer(host: &mut TestHost<State<TestStateApi>>) {
    host.setup_mock_entrypoint(
        TOKEN,
        OwnedEntrypointName::new_unchecked("transfer".into()),
        MockFn::returning_ok(()),
    );
}

/// The token contract rejects the transfer because the sale ran out of tokens.
fn mock_token_transfer_insufficient(host: &mut TestHost<State<TestStateApi>>) {
    host.setup_mock_entrypoint(
        TOKEN,
        OwnedEntrypointName::new_unchecked("transfer".into()),
        MockFn::new_v1(|_parameter, _amount, _balance, _state| {
            Err(CallContractError::<()>::LogicReject {
                reason: CIS2_INSUFFICIENT_FUNDS,
                return_value: (),
            })
        }),
    );
}

fn mock_token_balance(host: &mut TestHost<State<TestStateApi>>, balance: u64) {
    host.setup_mock_entrypoint(
        TOKEN,
        OwnedEntrypointName::new_unchecked("balanceOf".into()),
        MockFn::new_v1(move |_parameter, _amount, _balance, _state| {
            Ok((false, BalanceOfQueryResponse::from(vec![TokenAmountU64(balance)])))
        }),
    );
}

mod owner;
mod participant;

#[concordium_cfg_test]
mod test_sale {
    use super::*;

    /// Buy, get rejected, then finalize, as a buyer and the owner would see it.
    #[concordium_test]
    fn test_sale_lifecycle() {
        let mut host = initial_host(1);
        mock_token_transfer(&mut host);
        let mut logger = TestLogger::init();

        // buy 10 for 10
        let params_byte = to_bytes(&ContractTokenAmount::from(10));
        let ctx = receive_context(BUYER, &params_byte);
        host.set_self_balance(Amount::from_micro_ccd(10));
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim!(ret.is_ok(), "Results in rejection");
        claim_eq!(host.state().tokens_sold, ContractTokenAmount::from(10));

        // nothing attached
        let ret: ContractResult<()> =
            contract_buy_tokens(&ctx, &mut host, Amount::zero(), &mut logger);
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InsufficientValue))
        );

        // not on the whitelist
        let ctx = receive_context(STRANGER, &params_byte);
        let ret: ContractResult<()> = contract_buy_tokens(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(10),
            &mut logger,
        );
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::NotWhitelisted))
        );
        claim_eq!(host.state().tokens_sold, ContractTokenAmount::from(10));

        // the owner sweeps what is left
        mock_token_balance(&mut host, 999_990);
        let ctx = receive_context(OWNER, &[]);
        let ret: ContractResult<()> = contract_finalize(&ctx, &mut host, &mut logger);
        claim!(ret.is_ok(), "Results in rejection");
        claim!(host.transfer_occurred(&OWNER_ACC, Amount::from_micro_ccd(10)));

        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&CrowdsaleEvent::Buy(BuyEvent {
                    amount: 10.into(),
                    buyer: BUYER_ACC,
                })),
                to_bytes(&CrowdsaleEvent::Finalize(FinalizeEvent {
                    remaining_tokens: 999_990.into(),
                    remaining_value: Amount::from_micro_ccd(10),
                })),
            ]
        );
    }
}
