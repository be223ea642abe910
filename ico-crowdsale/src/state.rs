use concordium_std::{SchemaType, Serialize, *};
pub use sale_utils::{
    error::{from_token_transfer, ContractError, ContractResult, CustomContractError},
    types::*,
};

/// The contract state
#[derive(Debug, Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Account that instantiated the sale, receives everything on finalize
    pub(crate) owner: AccountAddress,
    /// Token contract whose units are sold
    pub(crate) token: ContractAddress,
    /// MicroCCD to pay per token unit
    pub(crate) price: MicroCcd,
    /// Cap shown to buyers, not enforced
    pub(crate) max_tokens: ContractTokenAmount,
    /// Units handed out through purchases
    pub(crate) tokens_sold: ContractTokenAmount,
    /// Enum for sale status
    pub(crate) status: SaleStatus,
    /// Accounts allowed to buy, removal keeps the key with `false`
    pub(crate) whitelist: StateMap<Address, bool, S>,
}

/// Everything a purchase needs to know, copied out of the state
/// before the token contract is called.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Purchase {
    pub(crate) buyer: AccountAddress,
    pub(crate) amount: ContractTokenAmount,
    pub(crate) token: ContractAddress,
    pub(crate) tokens_sold: ContractTokenAmount,
}

impl<S: HasStateApi> State<S> {
    pub(crate) fn new(
        state_builder: &mut StateBuilder<S>,
        owner: AccountAddress,
        token: ContractAddress,
        price: MicroCcd,
        max_tokens: ContractTokenAmount,
    ) -> Self {
        State {
            owner,
            token,
            price,
            max_tokens,
            tokens_sold: ContractTokenAmount::from(0),
            status: SaleStatus::Active,
            whitelist: state_builder.new_map(),
        }
    }

    pub(crate) fn is_whitelisted(&self, user: &Address) -> bool {
        self.whitelist.get(user).map(|flag| *flag).unwrap_or(false)
    }

    pub(crate) fn set_whitelisted(&mut self, user: &Address, flag: bool) {
        self.whitelist.insert(*user, flag);
    }

    /// Runs every check of a purchase without touching the state.
    /// `requested` is `None` for purchases that only attach CCD,
    /// in that case as many units as `value` pays for are bought.
    pub(crate) fn check_purchase(
        &self,
        sender: &Address,
        value: Amount,
        requested: Option<ContractTokenAmount>,
    ) -> ContractResult<Purchase> {
        let buyer = match sender {
            Address::Account(account) if self.is_whitelisted(sender) => *account,
            _ => bail!(CustomContractError::NotWhitelisted.into()),
        };

        ensure_eq!(
            self.status,
            SaleStatus::Active,
            CustomContractError::SaleFinalized.into()
        );

        let amount = match requested {
            Some(amount) => amount,
            None => tokens_for(value, self.price)?,
        };
        ensure!(amount.0 > 0, CustomContractError::InvalidInput.into());

        let required = value_of(amount, self.price)?;
        ensure!(
            value >= required,
            CustomContractError::InsufficientValue.into()
        );

        let tokens_sold = checked_add(self.tokens_sold, amount)?;

        Ok(Purchase {
            buyer,
            amount,
            token: self.token,
            tokens_sold,
        })
    }

    pub(crate) fn whitelisted(&self) -> Vec<Address> {
        self.whitelist
            .iter()
            .filter(|(_, flag)| **flag)
            .map(|(user, _)| *user)
            .collect()
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const TOKEN: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const BUYER_ACC: AccountAddress = AccountAddress([10u8; 32]);
    const BUYER: Address = Address::Account(BUYER_ACC);

    fn active_state(state_builder: &mut TestStateBuilder, price: MicroCcd) -> State<TestStateApi> {
        let mut state = State::new(state_builder, OWNER, TOKEN, price, 1_000.into());
        state.set_whitelisted(&BUYER, true);
        state
    }

    #[concordium_test]
    fn test_whitelist_flags() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, OWNER, TOKEN, 1, 1_000.into());
        let other = Address::Account(AccountAddress([11u8; 32]));

        claim!(!state.is_whitelisted(&BUYER));
        state.set_whitelisted(&BUYER, true);
        state.set_whitelisted(&BUYER, true);
        state.set_whitelisted(&other, true);
        claim!(state.is_whitelisted(&BUYER));

        state.set_whitelisted(&other, false);
        claim!(!state.is_whitelisted(&other));
        claim_eq!(state.whitelisted(), vec![BUYER]);
    }

    #[concordium_test]
    fn test_check_purchase() {
        let mut state_builder = TestStateBuilder::new();
        let state = active_state(&mut state_builder, 3);

        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(30), Some(10.into()));
        claim_eq!(
            ret,
            Ok(Purchase {
                buyer: BUYER_ACC,
                amount: 10.into(),
                token: TOKEN,
                tokens_sold: 10.into(),
            })
        );

        // overpayment is accepted
        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(31), Some(10.into()));
        claim!(ret.is_ok(), "Results in rejection");

        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(29), Some(10.into()));
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InsufficientValue))
        );

        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(30), Some(0.into()));
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidInput))
        );
    }

    #[concordium_test]
    fn test_check_purchase_implicit_amount() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = active_state(&mut state_builder, 3);

        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(11), None);
        claim_eq!(ret.map(|purchase| purchase.amount), Ok(3.into()));

        // less than the price of one unit
        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(2), None);
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidInput))
        );

        state.price = 0;
        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(2), None);
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidArithmetic))
        );
    }

    #[concordium_test]
    fn test_check_purchase_rejections() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = active_state(&mut state_builder, 1);

        let stranger = Address::Account(AccountAddress([12u8; 32]));
        let ret = state.check_purchase(&stranger, Amount::from_micro_ccd(10), Some(1.into()));
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::NotWhitelisted))
        );

        let contract = Address::Contract(ContractAddress::new(5, 0));
        let ret = state.check_purchase(&contract, Amount::from_micro_ccd(10), Some(1.into()));
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::NotWhitelisted))
        );

        state.tokens_sold = u64::MAX.into();
        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(10), Some(1.into()));
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidArithmetic))
        );

        state.price = u64::MAX;
        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(10), Some(2.into()));
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::InvalidArithmetic))
        );

        state.status = SaleStatus::Finalized;
        let ret = state.check_purchase(&BUYER, Amount::from_micro_ccd(10), Some(1.into()));
        claim_eq!(
            ret,
            Err(ContractError::Custom(CustomContractError::SaleFinalized))
        );
    }
}
