use bytes::Bytes;
use nexum_apdu_core::Command;

use crate::Result;
use crate::constants::{CLA_OATH, OATH_AID, ins};
use crate::types::ApplicationInfo;

use super::OathCommand;

/// SELECT the OATH applet by AID
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectCommand;

impl OathCommand for SelectCommand {
    type Output = ApplicationInfo;

    fn to_command(&self) -> Result<Command> {
        Ok(Command::new_with_data(
            CLA_OATH,
            ins::SELECT,
            0x04,
            0x00,
            Bytes::from_static(OATH_AID),
        ))
    }

    fn parse_response(&self, payload: Bytes) -> Result<ApplicationInfo> {
        ApplicationInfo::try_from(payload.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use nexum_apdu_core::ApduCommand;

    use super::*;

    #[test]
    fn test_select_bytes() {
        let bytes = SelectCommand.to_command().unwrap().to_bytes();
        assert_eq!(hex::encode(bytes), "00a4040007a0000005272101");
    }

    #[test]
    fn test_select_response() {
        let payload = Bytes::from(hex::decode("7903050403710401020304").unwrap());
        let info = SelectCommand.parse_response(payload).unwrap();
        assert_eq!(info.version.to_string(), "5.4.3");
        assert_eq!(info.device_id(), "01020304");
    }
}
