use crate::error::CustomContractError;
use concordium_cis2::{TokenAmountU64, TokenIdUnit};
use concordium_std::*;

pub type ContractTokenId = TokenIdUnit;
pub type ContractTokenAmount = TokenAmountU64;
pub type MicroCcd = u64;

/// Nobody holds the keys to this account, tokens sent here are lost.
pub const NULL_ACCOUNT: AccountAddress = AccountAddress([0u8; 32]);

pub fn is_null(address: &Address) -> bool {
    matches!(address, Address::Account(account) if *account == NULL_ACCOUNT)
}

#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub enum SaleStatus {
    Active,
    Finalized,
}

// Quantities never wrap, overflow rejects the whole call.

pub fn checked_add(
    a: ContractTokenAmount,
    b: ContractTokenAmount,
) -> Result<ContractTokenAmount, CustomContractError> {
    a.0.checked_add(b.0)
        .map(TokenAmountU64)
        .ok_or(CustomContractError::InvalidArithmetic)
}

/// Value in microCCD to pay for `amount` tokens at `price`.
pub fn value_of(
    amount: ContractTokenAmount,
    price: MicroCcd,
) -> Result<Amount, CustomContractError> {
    amount
        .0
        .checked_mul(price)
        .map(Amount::from_micro_ccd)
        .ok_or(CustomContractError::InvalidArithmetic)
}

/// Whole number of tokens `value` pays for at `price`.
pub fn tokens_for(
    value: Amount,
    price: MicroCcd,
) -> Result<ContractTokenAmount, CustomContractError> {
    value
        .micro_ccd
        .checked_div(price)
        .map(TokenAmountU64)
        .ok_or(CustomContractError::InvalidArithmetic)
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_null_identity() {
        claim!(is_null(&Address::Account(NULL_ACCOUNT)));
        claim!(!is_null(&Address::Account(AccountAddress([1u8; 32]))));
        claim!(!is_null(&Address::Contract(ContractAddress::new(0, 0))));
    }

    #[concordium_test]
    fn test_overflow_is_rejected() {
        claim_eq!(
            checked_add(TokenAmountU64(u64::MAX), TokenAmountU64(1)),
            Err(CustomContractError::InvalidArithmetic)
        );
        claim_eq!(
            value_of(TokenAmountU64(u64::MAX), 2),
            Err(CustomContractError::InvalidArithmetic)
        );
        claim_eq!(
            checked_add(TokenAmountU64(10), TokenAmountU64(5)),
            Ok(TokenAmountU64(15))
        );
    }

    #[concordium_test]
    fn test_price_conversions() {
        claim_eq!(value_of(TokenAmountU64(10), 1), Ok(Amount::from_micro_ccd(10)));
        claim_eq!(value_of(TokenAmountU64(10), 3), Ok(Amount::from_micro_ccd(30)));
        claim_eq!(tokens_for(Amount::from_micro_ccd(10), 3), Ok(TokenAmountU64(3)));
        claim_eq!(
            tokens_for(Amount::from_micro_ccd(10), 0),
            Err(CustomContractError::InvalidArithmetic),
            "a zero price cannot be divided by"
        );
    }
}
