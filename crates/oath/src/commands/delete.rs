use bytes::Bytes;
use nexum_apdu_core::Command;

use crate::Result;
use crate::constants::ins;

use super::{OathCommand, name_record, tlv_command};

/// DELETE a credential by name
#[derive(Debug, Clone)]
pub struct DeleteCommand {
    name: String,
}

impl DeleteCommand {
    /// Create a DELETE command for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl OathCommand for DeleteCommand {
    type Output = bool;

    fn to_command(&self) -> Result<Command> {
        tlv_command(ins::DELETE, 0x00, 0x00, &[name_record(&self.name)?])
    }

    fn parse_response(&self, _payload: Bytes) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use nexum_apdu_core::ApduCommand;

    use super::*;

    #[test]
    fn test_delete_bytes() {
        let command = DeleteCommand::new("foo").to_command().unwrap();
        assert_eq!(
            hex::encode(command.to_bytes()),
            "00020000057103666f6f"
        );
    }
}
