use concordium_cis2::Cis2Error;
use concordium_std::{
    num, CallContractError, LogError, ParseError, Reject, SchemaType, Serialize, TransferError,
    UnwrapAbort,
};
use core::num::TryFromIntError;

pub type ContractResult<A> = Result<A, ContractError>;

pub type ContractError = Cis2Error<CustomContractError>;

/// Reject code a CIS-2 contract uses for `InsufficientFunds`.
pub const CIS2_INSUFFICIENT_FUNDS: i32 = -42000002;

/// The different errors the contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    #[from(ParseError)]
    ParseParams, //1
    LogFull,             //
    LogMalformed,        //
    InvokeContractError, //
    AmountTooLarge,      //5
    MissingAccount,      //
    MissingContract,     //
    MissingEntrypoint,   //
    MessageFailed,       //
    Trap,                //10
    TransferError,       //
    AccountOnly,         //
    InvalidInput,        //
    InvalidRecipient,    //
    InvalidArithmetic,   //15
    NotWhitelisted,      //
    InsufficientValue,   //
    SaleFinalized,       //
}

impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis2Error::Custom(c)
    }
}

impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(cce: CallContractError<T>) -> Self {
        match cce {
            CallContractError::AmountTooLarge => Self::AmountTooLarge,
            CallContractError::MissingAccount => Self::MissingAccount,
            CallContractError::MissingContract => Self::MissingContract,
            CallContractError::MissingEntrypoint => Self::MissingEntrypoint,
            CallContractError::MessageFailed => Self::MessageFailed,
            CallContractError::Trap => Self::Trap,
            CallContractError::LogicReject {
                reason: _,
                return_value: _,
            } => Self::InvokeContractError,
        }
    }
}

impl From<TransferError> for CustomContractError {
    #[inline(always)]
    fn from(_: TransferError) -> Self {
        Self::TransferError
    }
}

impl From<TryFromIntError> for CustomContractError {
    #[inline(always)]
    fn from(_: TryFromIntError) -> Self {
        Self::InvalidArithmetic
    }
}

/// Maps a failed `transfer` call on the token contract.
/// Running out of tokens keeps its CIS-2 meaning, everything else is a call failure.
pub fn from_token_transfer<T>(cce: CallContractError<T>) -> ContractError {
    match cce {
        CallContractError::LogicReject { reason, .. } if reason == CIS2_INSUFFICIENT_FUNDS => {
            ContractError::InsufficientFunds
        },
        other => CustomContractError::from(other).into(),
    }
}
