use bytes::Bytes;
use nexum_apdu_core::Command;

use crate::constants::{CLA_OATH, ins, tags};
use crate::tlv::TlvIter;
use crate::types::{Credential, CredentialKind, CredentialList};
use crate::{ProtocolError, Result};

use super::OathCommand;

/// LIST stored credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCommand;

impl OathCommand for ListCommand {
    type Output = CredentialList;

    fn to_command(&self) -> Result<Command> {
        Ok(Command::new(CLA_OATH, ins::LIST, 0x00, 0x00))
    }

    fn parse_response(&self, payload: Bytes) -> Result<CredentialList> {
        TlvIter::new(&payload)
            .map(|record| -> Result<Credential> {
                let record = record?.expect_tag(tags::NAME_LIST)?;
                let (kind, name) = record.value().split_first().ok_or(
                    ProtocolError::InvalidLength {
                        field: "name list entry",
                        len: 0,
                    },
                )?;
                let name = String::from_utf8(name.to_vec())
                    .map_err(|_| ProtocolError::InvalidData("credential name is not UTF-8"))?;
                Ok(Credential {
                    name,
                    kind: CredentialKind::try_from(*kind)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use nexum_apdu_core::ApduCommand;

    use super::*;
    use crate::Error;
    use crate::types::{HashAlgorithm, OathType};

    #[test]
    fn test_list_bytes() {
        let bytes = ListCommand.to_command().unwrap().to_bytes();
        assert_eq!(hex::encode(bytes), "00a10000");
    }

    #[test]
    fn test_parse_entries_in_order() {
        let payload = Bytes::from(hex::decode("7204226162637202116a").unwrap());
        let list = ListCommand.parse_response(payload).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "abc");
        assert_eq!(
            list[0].kind,
            CredentialKind::new(OathType::Totp, HashAlgorithm::Sha256)
        );
        assert_eq!(list[1].name, "j");
        assert_eq!(
            list[1].kind,
            CredentialKind::new(OathType::Hotp, HashAlgorithm::Sha1)
        );
    }

    #[test]
    fn test_parse_empty_store() {
        assert!(ListCommand.parse_response(Bytes::new()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_unknown_algorithm() {
        let payload = Bytes::from(hex::decode("720427616263").unwrap());
        assert!(matches!(
            ListCommand.parse_response(payload),
            Err(Error::UnsupportedAlgorithm(0x27))
        ));
    }

    #[test]
    fn test_parse_wrong_tag() {
        let payload = Bytes::from(hex::decode("710161").unwrap());
        assert!(matches!(
            ListCommand.parse_response(payload),
            Err(Error::Protocol(ProtocolError::UnexpectedTag { .. }))
        ));
    }
}
