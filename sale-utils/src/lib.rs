use concordium_std::{
    collections::BTreeMap, fmt::Debug, schema, AccountAddress, Amount, SchemaType, Serial, Write,
};
use types::ContractTokenAmount;

pub mod error;
pub mod types;

// ---------------------------------------

/// Tag for the Buy event.
pub const BUY_EVENT_TAG: u8 = 1u8;
/// Tag for the Finalize event.
pub const FINALIZE_EVENT_TAG: u8 = 2u8;

/// Logged for every successful purchase.
#[derive(Serial, SchemaType, Debug, PartialEq, Eq)]
pub struct BuyEvent {
    pub amount: ContractTokenAmount,
    pub buyer: AccountAddress,
}

/// Logged when the owner sweeps the sale.
/// Both quantities are measured before the sweep.
#[derive(Serial, SchemaType, Debug, PartialEq, Eq)]
pub struct FinalizeEvent {
    pub remaining_tokens: ContractTokenAmount,
    pub remaining_value: Amount,
}

/// Tagged events to be serialized for the event log.
#[derive(Debug, PartialEq, Eq)]
pub enum CrowdsaleEvent {
    Buy(BuyEvent),
    Finalize(FinalizeEvent),
}

impl Serial for CrowdsaleEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            CrowdsaleEvent::Buy(event) => {
                out.write_u8(BUY_EVENT_TAG)?;
                event.serial(out)
            },
            CrowdsaleEvent::Finalize(event) => {
                out.write_u8(FINALIZE_EVENT_TAG)?;
                event.serial(out)
            },
        }
    }
}

impl schema::SchemaType for CrowdsaleEvent {
    fn get_type() -> schema::Type {
        let mut event_map = BTreeMap::new();
        event_map.insert(
            BUY_EVENT_TAG,
            (
                "Buy".to_string(),
                schema::Fields::Named(vec![
                    (String::from("amount"), ContractTokenAmount::get_type()),
                    (String::from("buyer"), AccountAddress::get_type()),
                ]),
            ),
        );
        event_map.insert(
            FINALIZE_EVENT_TAG,
            (
                "Finalize".to_string(),
                schema::Fields::Named(vec![
                    (
                        String::from("remaining_tokens"),
                        ContractTokenAmount::get_type(),
                    ),
                    (String::from("remaining_value"), Amount::get_type()),
                ]),
            ),
        );
        schema::Type::TaggedEnum(event_map)
    }
}
