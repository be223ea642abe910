use concordium_cis2::TokenAmountU64;
use concordium_std::{SchemaType, Serialize, *};
pub use sale_utils::{
    error::{ContractError, ContractResult, CustomContractError},
    types::*,
};

/// The contract state
#[derive(Debug, Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Display name of the token
    pub(crate) name: String,
    /// Ticker symbol of the token
    pub(crate) symbol: String,
    /// Number of fractional digits wallets should display
    pub(crate) decimals: u8,
    /// Url of the CIS-2 token metadata
    pub(crate) metadata_url: String,
    /// Upper bound on issued units
    pub(crate) max_supply: ContractTokenAmount,
    /// Units issued so far
    pub(crate) total_supply: ContractTokenAmount,
    /// Balance of every holder, a missing entry means zero
    pub(crate) balances: StateMap<Address, ContractTokenAmount, S>,
    /// Pairs of (owner, operator) allowed to move the owner's tokens
    pub(crate) operators: StateSet<(Address, Address), S>,
}

/// Display data of the token, fixed at init.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub metadata_url: String,
}

impl<S: HasStateApi> State<S> {
    /// Issues the whole `max_supply` to `issuer`.
    pub(crate) fn new(
        state_builder: &mut StateBuilder<S>,
        info: TokenInfo,
        max_supply: ContractTokenAmount,
        issuer: Address,
    ) -> Self {
        let mut state = State {
            name: info.name,
            symbol: info.symbol,
            decimals: info.decimals,
            metadata_url: info.metadata_url,
            max_supply,
            total_supply: max_supply,
            balances: state_builder.new_map(),
            operators: state_builder.new_set(),
        };
        state.balances.insert(issuer, max_supply);
        state
    }

    pub(crate) fn balance(&self, address: &Address) -> ContractTokenAmount {
        self.balances
            .get(address)
            .map(|balance| *balance)
            .unwrap_or(TokenAmountU64(0))
    }

    pub(crate) fn is_operator(&self, address: &Address, owner: &Address) -> bool {
        self.operators.contains(&(*owner, *address))
    }

    /// Moves `amount` from `from` to `to`.
    /// Nothing is written unless every check passes.
    pub(crate) fn transfer(
        &mut self,
        amount: ContractTokenAmount,
        from: &Address,
        to: &Address,
    ) -> ContractResult<()> {
        let from_balance = self.balance(from);
        ensure!(from_balance >= amount, ContractError::InsufficientFunds);
        ensure!(!is_null(to), CustomContractError::InvalidRecipient.into());

        if amount.0 == 0 || from == to {
            return Ok(());
        }

        let to_balance = checked_add(self.balance(to), amount)?;
        self.balances
            .insert(*from, TokenAmountU64(from_balance.0 - amount.0));
        self.balances.insert(*to, to_balance);

        Ok(())
    }

    pub(crate) fn add_operator(&mut self, owner: &Address, operator: &Address) {
        self.operators.insert((*owner, *operator));
    }

    pub(crate) fn remove_operator(&mut self, owner: &Address, operator: &Address) {
        self.operators.remove(&(*owner, *operator));
    }

    /// Sum of all balances, equal to `total_supply` at all times.
    #[cfg(any(feature = "wasm-test", test))]
    pub(crate) fn circulating(&self) -> u64 {
        self.balances.iter().map(|(_, balance)| balance.0).sum()
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const ISSUER: Address = Address::Account(AccountAddress([1u8; 32]));
    const ALICE: Address = Address::Account(AccountAddress([2u8; 32]));
    const BOB: Address = Address::Account(AccountAddress([3u8; 32]));

    fn token_info() -> TokenInfo {
        TokenInfo {
            name: "Next Gen".to_string(),
            symbol: "NXG".to_string(),
            decimals: 6,
            metadata_url: "https://example.com/nxg.json".to_string(),
        }
    }

    #[concordium_test]
    fn test_new_issues_everything() {
        let mut state_builder = TestStateBuilder::new();
        let state = State::new(&mut state_builder, token_info(), 1_000_000.into(), ISSUER);

        claim_eq!(state.balance(&ISSUER), TokenAmountU64(1_000_000));
        claim_eq!(state.balance(&ALICE), TokenAmountU64(0));
        claim_eq!(state.total_supply, state.max_supply);
        claim_eq!(state.circulating(), 1_000_000);
    }

    #[concordium_test]
    fn test_transfer_conserves_supply() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, token_info(), 1_000.into(), ISSUER);

        let steps = [
            (ISSUER, ALICE, 400),
            (ALICE, BOB, 150),
            (BOB, BOB, 150),
            (ALICE, ISSUER, 250),
            (BOB, ALICE, 0),
        ];
        for (from, to, amount) in steps {
            let ret = state.transfer(TokenAmountU64(amount), &from, &to);
            claim!(ret.is_ok(), "Results in rejection");
            claim_eq!(state.circulating(), state.total_supply.0);
        }

        claim_eq!(state.balance(&ISSUER), TokenAmountU64(850));
        claim_eq!(state.balance(&ALICE), TokenAmountU64(0));
        claim_eq!(state.balance(&BOB), TokenAmountU64(150));
    }

    #[concordium_test]
    fn test_transfer_insufficient_funds() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, token_info(), 100.into(), ISSUER);

        let ret = state.transfer(TokenAmountU64(101), &ISSUER, &ALICE);
        claim_eq!(ret, Err(ContractError::InsufficientFunds));
        let ret = state.transfer(TokenAmountU64(1), &ALICE, &ISSUER);
        claim_eq!(ret, Err(ContractError::InsufficientFunds));

        claim_eq!(state.balance(&ISSUER), TokenAmountU64(100));
        claim_eq!(state.balance(&ALICE), TokenAmountU64(0));
    }

    #[concordium_test]
    fn test_transfer_to_null_account() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, token_info(), 100.into(), ISSUER);

        let ret = state.transfer(TokenAmountU64(1), &ISSUER, &Address::Account(NULL_ACCOUNT));
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidRecipient))
        );
        claim_eq!(state.balance(&ISSUER), TokenAmountU64(100));
    }

    #[concordium_test]
    /// An overdrawn transfer to the null account reports the missing funds.
    fn test_transfer_insufficient_funds_to_null_account() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, token_info(), 100.into(), ISSUER);

        let ret = state.transfer(TokenAmountU64(101), &ISSUER, &Address::Account(NULL_ACCOUNT));
        claim_eq!(ret, Err(ContractError::InsufficientFunds));
        claim_eq!(state.balance(&ISSUER), TokenAmountU64(100));
    }

    #[concordium_test]
    fn test_transfer_overflow() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, token_info(), 10.into(), ISSUER);
        // a balance that cannot come from a transfer, only from a corrupted state
        state.balances.insert(ALICE, TokenAmountU64(u64::MAX));

        let ret = state.transfer(TokenAmountU64(1), &ISSUER, &ALICE);
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidArithmetic))
        );
        claim_eq!(state.balance(&ISSUER), TokenAmountU64(10));
    }

    #[concordium_test]
    fn test_operators() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, token_info(), 10.into(), ISSUER);

        claim!(!state.is_operator(&ALICE, &ISSUER));
        state.add_operator(&ISSUER, &ALICE);
        state.add_operator(&ISSUER, &ALICE);
        claim!(state.is_operator(&ALICE, &ISSUER));
        claim!(!state.is_operator(&ISSUER, &ALICE), "operators are not symmetric");

        state.remove_operator(&ISSUER, &ALICE);
        claim!(!state.is_operator(&ALICE, &ISSUER));
    }
}
