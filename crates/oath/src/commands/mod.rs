//! Typed OATH commands
//!
//! Each command knows how to build its APDU and how to decode the payload of
//! a successful response. Status words are checked by the session before a
//! payload ever reaches [`OathCommand::parse_response`].
//!
//! Commands use short APDU framing, so the whole data field is capped at
//! [`MAX_DATA_LEN`] bytes. Names therefore top out below the 255 bytes a
//! single TLV record allows once the other records of a command are added.

pub mod calculate;
pub mod calculate_all;
pub mod delete;
pub mod list;
pub mod put;
pub mod reset;
pub mod select;

use bytes::Bytes;

use nexum_apdu_core::Command;

use crate::constants::{CLA_OATH, MAX_DATA_LEN};
use crate::tlv::Tlv;
use crate::{Error, Result};

pub use calculate::CalculateCommand;
pub use calculate_all::CalculateAllCommand;
pub use delete::DeleteCommand;
pub use list::ListCommand;
pub use put::PutCommand;
pub use reset::ResetCommand;
pub use select::SelectCommand;

/// A command understood by the OATH applet
pub trait OathCommand {
    /// Decoded success payload
    type Output;

    /// Build the APDU for this command
    fn to_command(&self) -> Result<Command>;

    /// Decode the payload of a `9000` response
    fn parse_response(&self, payload: Bytes) -> Result<Self::Output>;
}

/// Build an OATH command whose data field is a sequence of TLV records
pub(crate) fn tlv_command(ins: u8, p1: u8, p2: u8, records: &[Tlv]) -> Result<Command> {
    let data = crate::tlv::encode(records);
    if data.len() > MAX_DATA_LEN {
        return Err(Error::InvalidInput(
            "command data exceeds 255 bytes of short APDU framing",
        ));
    }
    Ok(Command::new_with_data(CLA_OATH, ins, p1, p2, data))
}

/// Check that a credential name fits a TLV record
pub(crate) fn name_record(name: &str) -> Result<Tlv> {
    if name.is_empty() {
        return Err(Error::InvalidInput("credential name is empty"));
    }
    Tlv::name(name).map_err(|_| Error::InvalidInput("credential name exceeds 255 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_limits_under_short_framing() {
        // NAME header (2) + name + CHALLENGE record (10)
        let command = CalculateCommand::new("n".repeat(243), 1)
            .to_command()
            .unwrap();
        assert_eq!(command.data.as_ref().map(Bytes::len), Some(MAX_DATA_LEN));
        assert!(matches!(
            CalculateCommand::new("n".repeat(244), 1).to_command(),
            Err(Error::InvalidInput(_))
        ));

        // NAME header (2) + name
        let command = DeleteCommand::new("n".repeat(253)).to_command().unwrap();
        assert_eq!(command.data.as_ref().map(Bytes::len), Some(MAX_DATA_LEN));
        assert!(matches!(
            DeleteCommand::new("n".repeat(254)).to_command(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_name_record_bounds() {
        assert!(matches!(name_record(""), Err(Error::InvalidInput(_))));
        assert!(name_record(&"n".repeat(255)).is_ok());
        assert!(matches!(
            name_record(&"n".repeat(256)),
            Err(Error::InvalidInput(_))
        ));
    }
}
