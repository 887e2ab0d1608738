use bytes::Bytes;
use nexum_apdu_core::Command;

use crate::Result;
use crate::constants::{CLA_OATH, RESET_CONFIRMATION, ins};

use super::OathCommand;

/// RESET the applet, wiping every credential
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetCommand;

impl OathCommand for ResetCommand {
    type Output = bool;

    fn to_command(&self) -> Result<Command> {
        let [p1, p2] = RESET_CONFIRMATION;
        Ok(Command::new(CLA_OATH, ins::RESET, p1, p2))
    }

    fn parse_response(&self, _payload: Bytes) -> Result<bool> {
        Ok(true)
    }
}
