use concordium_smart_contract_testing::{Address, Amount};
use sale_utils::{
    error::{ContractError, CustomContractError},
    types::NULL_ACCOUNT,
    BuyEvent, CrowdsaleEvent, FinalizeEvent,
};
use tester::{
    chain::{events_of, reject_code, std_account, SaleChain},
    config::*,
    init_logger,
};

// The scenarios load the wasm modules, build them first with
// `cargo concordium build` in `ico-token` and `ico-crowdsale`, then run
// `cargo test -- --ignored`.

/// Deployed contracts with the whole supply handed to the sale.
fn funded_sale() -> SaleChain {
    init_logger();
    assert!(
        tester::chain::modules_built(),
        "contract modules not found in {}",
        TARGET_DIR
    );

    let mut sale = SaleChain::setup().expect("Deploying the contracts should succeed");
    sale.fund_sale(MAX_SUPPLY)
        .expect("Funding the sale should succeed");
    sale
}

/// Code a rejection with `err` carries on chain.
fn code_of(err: ContractError) -> Option<i32> {
    Some(concordium_std::Reject::from(err).error_code.get())
}

fn buy_ten(sale: &mut SaleChain) {
    sale.add_to_whitelist(ACC_ADDR_BUYER)
        .unwrap()
        .expect("Whitelisting should succeed");
    let update = sale
        .buy_tokens(ACC_ADDR_BUYER, 10, Amount::from_micro_ccd(10))
        .unwrap()
        .expect("Purchase should succeed");

    assert_eq!(
        events_of(&update, sale.sale),
        vec![concordium_std::to_bytes(&CrowdsaleEvent::Buy(BuyEvent {
            amount: 10.into(),
            buyer: std_account(ACC_ADDR_BUYER),
        }))]
    );
}

#[test]
#[ignore = "needs the modules from cargo concordium build"]
fn scenario_a_sale_holds_the_supply() {
    let sale = funded_sale();

    assert_eq!(
        sale.token_balance(Address::Contract(sale.sale)).unwrap(),
        MAX_SUPPLY
    );
    assert_eq!(
        sale.token_balance(Address::Account(ACC_ADDR_OWNER)).unwrap(),
        0
    );
}

#[test]
#[ignore = "needs the modules from cargo concordium build"]
fn scenario_b_whitelisted_purchase() {
    let mut sale = funded_sale();

    buy_ten(&mut sale);

    assert_eq!(
        sale.token_balance(Address::Account(ACC_ADDR_BUYER)).unwrap(),
        10
    );
    assert_eq!(
        sale.token_balance(Address::Contract(sale.sale)).unwrap(),
        MAX_SUPPLY - 10
    );
    assert_eq!(sale.tokens_sold().unwrap(), 10);
    assert_eq!(sale.sale_value().unwrap(), Amount::from_micro_ccd(10));
}

#[test]
#[ignore = "needs the modules from cargo concordium build"]
fn scenario_c_purchase_without_value() {
    let mut sale = funded_sale();
    buy_ten(&mut sale);

    let ret = sale
        .buy_tokens(ACC_ADDR_BUYER, 10, Amount::zero())
        .unwrap();
    assert_eq!(
        ret.err().as_ref().and_then(reject_code),
        code_of(ContractError::Custom(CustomContractError::InsufficientValue))
    );

    assert_eq!(
        sale.token_balance(Address::Account(ACC_ADDR_BUYER)).unwrap(),
        10
    );
    assert_eq!(sale.tokens_sold().unwrap(), 10);
    assert_eq!(sale.sale_value().unwrap(), Amount::from_micro_ccd(10));
}

#[test]
#[ignore = "needs the modules from cargo concordium build"]
fn scenario_d_purchase_not_whitelisted() {
    let mut sale = funded_sale();

    let ret = sale
        .buy_tokens(ACC_ADDR_OTHER, 10, Amount::from_micro_ccd(10))
        .unwrap();
    assert_eq!(
        ret.err().as_ref().and_then(reject_code),
        code_of(ContractError::Custom(CustomContractError::NotWhitelisted))
    );

    assert_eq!(
        sale.token_balance(Address::Account(ACC_ADDR_OTHER)).unwrap(),
        0
    );
    assert_eq!(
        sale.token_balance(Address::Contract(sale.sale)).unwrap(),
        MAX_SUPPLY
    );
    assert_eq!(sale.tokens_sold().unwrap(), 0);
    assert_eq!(sale.sale_value().unwrap(), Amount::zero());
}

#[test]
#[ignore = "needs the modules from cargo concordium build"]
fn scenario_e_finalize_sweeps_the_sale() {
    let mut sale = funded_sale();
    buy_ten(&mut sale);

    let ret = sale.finalize(ACC_ADDR_BUYER).unwrap();
    assert_eq!(
        ret.err().as_ref().and_then(reject_code),
        code_of(ContractError::Unauthorized)
    );

    let update = sale
        .finalize(ACC_ADDR_OWNER)
        .unwrap()
        .expect("Finalize should succeed");

    assert_eq!(
        events_of(&update, sale.sale),
        vec![concordium_std::to_bytes(&CrowdsaleEvent::Finalize(
            FinalizeEvent {
                remaining_tokens: (MAX_SUPPLY - 10).into(),
                remaining_value: concordium_std::Amount::from_micro_ccd(10),
            }
        ))]
    );
    assert_eq!(
        sale.token_balance(Address::Contract(sale.sale)).unwrap(),
        0
    );
    assert_eq!(
        sale.token_balance(Address::Account(ACC_ADDR_OWNER)).unwrap(),
        MAX_SUPPLY - 10
    );
    assert_eq!(sale.sale_value().unwrap(), Amount::zero());

    // the sale is closed for good
    let ret = sale
        .buy_tokens(ACC_ADDR_BUYER, 1, Amount::from_micro_ccd(1))
        .unwrap();
    assert_eq!(
        ret.err().as_ref().and_then(reject_code),
        code_of(ContractError::Custom(CustomContractError::SaleFinalized))
    );
}

#[test]
fn accounts_are_not_null() {
    for account in [ACC_ADDR_OWNER, ACC_ADDR_BUYER, ACC_ADDR_OTHER] {
        assert_ne!(account.0, NULL_ACCOUNT.0);
    }
}

#[test]
fn reject_codes_follow_declaration_order() {
    assert_eq!(
        code_of(ContractError::Custom(CustomContractError::NotWhitelisted)),
        Some(-16)
    );
    assert_eq!(
        code_of(ContractError::Custom(CustomContractError::InsufficientValue)),
        Some(-17)
    );
    assert_eq!(code_of(ContractError::Unauthorized), Some(-42000003));
}
