use crate::{config::*, types::*};
use anyhow::anyhow;
use concordium_cis2::{
    AdditionalData, BalanceOfQuery, BalanceOfQueryParams, BalanceOfQueryResponse, Receiver,
    TokenAmountU64, TokenIdUnit, Transfer, TransferParams,
};
use concordium_smart_contract_testing::*;
use sale_utils::types::NULL_ACCOUNT;
use std::path::Path;

fn module_path(module: &str) -> String {
    format!("{}{}.wasm.v1", TARGET_DIR, module)
}

/// Both contract modules have been built with `cargo concordium build`.
pub fn modules_built() -> bool {
    [MODULE_TOKEN, MODULE_SALE]
        .iter()
        .all(|module| Path::new(&module_path(module)).exists())
}

pub fn generate_chain(accounts: Vec<(AccountAddress, Amount)>) -> Chain {
    let mut chain = Chain::new();
    for acc in accounts {
        chain.create_account(Account::new(acc.0, acc.1));
    }
    chain
}

pub fn deploy_module(module: &str, chain: &mut Chain) -> anyhow::Result<ModuleDeploySuccess> {
    let module_file = module_path(module);
    let wasm_module = module_load_v1(&module_file)
        .map_err(|e| anyhow!("could not load {}: {:?}", module_file, e))?;

    chain
        .module_deploy_v1(Signer::with_one_key(), ACC_ADDR_OWNER, wasm_module)
        .map_err(|e| anyhow!("could not deploy {}: {:?}", module, e))
}

// Parameters are serialized with `concordium-std`, whose address types are
// distinct from the ones the simulated chain uses.

pub fn std_account(account: AccountAddress) -> concordium_std::AccountAddress {
    concordium_std::AccountAddress(account.0)
}

pub fn std_contract(contract: ContractAddress) -> concordium_std::ContractAddress {
    concordium_std::ContractAddress::new(contract.index, contract.subindex)
}

pub fn std_address(address: Address) -> concordium_std::Address {
    match address {
        Address::Account(account) => concordium_std::Address::Account(std_account(account)),
        Address::Contract(contract) => concordium_std::Address::Contract(std_contract(contract)),
    }
}

fn parameter(bytes: Vec<u8>) -> anyhow::Result<OwnedParameter> {
    OwnedParameter::try_from(bytes).map_err(|e| anyhow!("parameter too large: {:?}", e))
}

/// Reject code of a contract that refused the update, `None` for any other failure.
pub fn reject_code(err: &ContractInvokeError) -> Option<i32> {
    match &err.kind {
        ContractInvokeErrorKind::ExecutionError {
            failure_kind: InvokeFailure::ContractReject { code, .. },
            ..
        } => Some(*code),
        _ => None,
    }
}

/// Event bytes logged by `address` during an update, in order.
pub fn events_of(update: &ContractInvokeSuccess, address: ContractAddress) -> Vec<Vec<u8>> {
    let mut ret = Vec::new();
    for element in update.trace_elements.iter() {
        if let DebugTraceElement::Regular { trace_element, .. } = element {
            match trace_element {
                ContractTraceElement::Interrupted {
                    address: from,
                    events,
                } if *from == address => {
                    ret.extend(events.iter().map(|event| event.as_ref().to_vec()));
                },
                ContractTraceElement::Updated { data } if data.address == address => {
                    ret.extend(data.events.iter().map(|event| event.as_ref().to_vec()));
                },
                _ => {},
            }
        }
    }
    ret
}

// ------------------------

/// The token and the sale deployed side by side, with the whole supply
/// still held by the owner.
pub struct SaleChain {
    pub chain: Chain,
    pub token: ContractAddress,
    pub sale: ContractAddress,
}

impl SaleChain {
    pub fn setup() -> anyhow::Result<Self> {
        anyhow::ensure!(
            ACC_ADDR_OWNER.0 != NULL_ACCOUNT.0,
            "the owner must not be the null account"
        );
        let mut chain = generate_chain(vec![
            (ACC_ADDR_OWNER, AMOUNT_INIT),
            (ACC_ADDR_BUYER, AMOUNT_INIT),
            (ACC_ADDR_OTHER, AMOUNT_INIT),
        ]);

        let token_module = deploy_module(MODULE_TOKEN, &mut chain)?;
        let sale_module = deploy_module(MODULE_SALE, &mut chain)?;

        let token = initialize(
            &mut chain,
            &token_module,
            CONTRACT_TOKEN,
            concordium_std::to_bytes(&TokenInitParams {
                name: TOKEN_NAME.to_string(),
                symbol: TOKEN_SYMBOL.to_string(),
                decimals: TOKEN_DECIMALS,
                metadata_url: TOKEN_METADATA_URL.to_string(),
                max_supply: TokenAmountU64(MAX_SUPPLY),
            }),
        )?;
        let sale = initialize(
            &mut chain,
            &sale_module,
            CONTRACT_SALE,
            concordium_std::to_bytes(&SaleInitParams {
                token: std_contract(token),
                price: PRICE,
                max_tokens: TokenAmountU64(MAX_SUPPLY),
            }),
        )?;

        Ok(SaleChain { chain, token, sale })
    }

    pub fn update(
        &mut self,
        invoker: AccountAddress,
        address: ContractAddress,
        receive_name: &str,
        message: Vec<u8>,
        amount: Amount,
    ) -> anyhow::Result<Result<ContractInvokeSuccess, ContractInvokeError>> {
        log::info!("=============== Receive::{} ===============", receive_name);

        let ret = self.chain.contract_update(
            Signer::with_one_key(),
            invoker,
            Address::Account(invoker),
            ENERGY,
            UpdateContractPayload {
                amount,
                address,
                receive_name: OwnedReceiveName::new_unchecked(receive_name.to_string()),
                message: parameter(message)?,
            },
        );
        match &ret {
            Ok(update) => log::debug!("energy used: {:?}", update.energy_used),
            Err(e) => log::info!("rejected: {:?}", e.kind),
        }
        Ok(ret)
    }

    fn invoke(
        &self,
        address: ContractAddress,
        receive_name: &str,
        message: Vec<u8>,
    ) -> anyhow::Result<Vec<u8>> {
        let invoke = self
            .chain
            .contract_invoke(
                ACC_ADDR_OWNER,
                Address::Account(ACC_ADDR_OWNER),
                ENERGY,
                UpdateContractPayload {
                    amount: Amount::zero(),
                    address,
                    receive_name: OwnedReceiveName::new_unchecked(receive_name.to_string()),
                    message: parameter(message)?,
                },
            )
            .map_err(|e| anyhow!("{} failed: {:?}", receive_name, e.kind))?;
        Ok(invoke.return_value)
    }

    /// Owner moves tokens to the sale through its `onReceivingCIS2` hook.
    pub fn fund_sale(&mut self, amount: u64) -> anyhow::Result<ContractInvokeSuccess> {
        let transfer = Transfer {
            from: concordium_std::Address::Account(std_account(ACC_ADDR_OWNER)),
            to: Receiver::from_contract(
                std_contract(self.sale),
                concordium_std::OwnedEntrypointName::new_unchecked("onReceivingCIS2".into()),
            ),
            token_id: TokenIdUnit(),
            amount: TokenAmountU64(amount),
            data: AdditionalData::empty(),
        };
        let message = concordium_std::to_bytes(&TransferParams::from(vec![transfer]));
        let token = self.token;
        self.update(
            ACC_ADDR_OWNER,
            token,
            &format!("{}.transfer", CONTRACT_TOKEN),
            message,
            Amount::zero(),
        )?
        .map_err(|e| anyhow!("funding the sale failed: {:?}", e.kind))
    }

    pub fn add_to_whitelist(
        &mut self,
        user: AccountAddress,
    ) -> anyhow::Result<Result<ContractInvokeSuccess, ContractInvokeError>> {
        let message =
            concordium_std::to_bytes(&concordium_std::Address::Account(std_account(user)));
        let sale = self.sale;
        self.update(
            ACC_ADDR_OWNER,
            sale,
            &format!("{}.addToWhitelist", CONTRACT_SALE),
            message,
            Amount::zero(),
        )
    }

    pub fn buy_tokens(
        &mut self,
        buyer: AccountAddress,
        amount: u64,
        value: Amount,
    ) -> anyhow::Result<Result<ContractInvokeSuccess, ContractInvokeError>> {
        let message = concordium_std::to_bytes(&TokenAmountU64(amount));
        let sale = self.sale;
        self.update(
            buyer,
            sale,
            &format!("{}.buyTokens", CONTRACT_SALE),
            message,
            value,
        )
    }

    pub fn finalize(
        &mut self,
        invoker: AccountAddress,
    ) -> anyhow::Result<Result<ContractInvokeSuccess, ContractInvokeError>> {
        let sale = self.sale;
        self.update(
            invoker,
            sale,
            &format!("{}.finalize", CONTRACT_SALE),
            Vec::new(),
            Amount::zero(),
        )
    }

    pub fn token_balance(&self, owner: Address) -> anyhow::Result<u64> {
        let query = BalanceOfQueryParams {
            queries: vec![BalanceOfQuery {
                token_id: TokenIdUnit(),
                address: std_address(owner),
            }],
        };
        let return_value = self.invoke(
            self.token,
            &format!("{}.balanceOf", CONTRACT_TOKEN),
            concordium_std::to_bytes(&query),
        )?;
        let BalanceOfQueryResponse(balances): BalanceOfQueryResponse<TokenAmountU64> =
            concordium_std::from_bytes(&return_value)
                .map_err(|e| anyhow!("unexpected balanceOf response: {:?}", e))?;

        balances
            .first()
            .map(|balance| balance.0)
            .ok_or_else(|| anyhow!("empty balanceOf response"))
    }

    pub fn tokens_sold(&self) -> anyhow::Result<u64> {
        let return_value = self.invoke(
            self.sale,
            &format!("{}.tokensSold", CONTRACT_SALE),
            Vec::new(),
        )?;
        let sold: TokenAmountU64 = concordium_std::from_bytes(&return_value)
            .map_err(|e| anyhow!("unexpected tokensSold response: {:?}", e))?;
        Ok(sold.0)
    }

    pub fn sale_value(&self) -> anyhow::Result<Amount> {
        self.chain
            .contract_balance(self.sale)
            .ok_or_else(|| anyhow!("sale instance missing"))
    }
}

fn initialize(
    chain: &mut Chain,
    module: &ModuleDeploySuccess,
    contract_name: &str,
    param: Vec<u8>,
) -> anyhow::Result<ContractAddress> {
    let func_name = format!("init_{}", contract_name);
    log::info!("===== Init::{:?} =====", func_name);

    let it = chain
        .contract_init(
            Signer::with_one_key(),
            ACC_ADDR_OWNER,
            ENERGY,
            InitContractPayload {
                amount: Amount::zero(),
                mod_ref: module.module_reference,
                init_name: OwnedContractName::new_unchecked(func_name),
                param: parameter(param)?,
            },
        )
        .map_err(|e| anyhow!("init_{} failed: {:?}", contract_name, e))?;

    log::info!("{} at {:?}", contract_name, it.contract_address);
    Ok(it.contract_address)
}
