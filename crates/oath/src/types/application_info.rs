use std::fmt;

use bytes::Bytes;

use crate::constants::tags;
use crate::tlv::TlvIter;
use crate::{Error, ProtocolError, Result};

use super::{HashAlgorithm, Version};

/// Application info returned by SELECT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    /// Applet version
    pub version: Version,
    /// Device salt, used to derive the access code key
    pub salt: Bytes,
    /// Access code challenge, present only when an access code is set
    pub challenge: Option<Bytes>,
    /// Algorithm the access code key uses
    pub algorithm: Option<HashAlgorithm>,
}

impl ApplicationInfo {
    /// Whether an access code protects the applet
    pub const fn has_access_code(&self) -> bool {
        self.challenge.is_some()
    }

    /// Salt rendered as hex, which doubles as a device identifier
    pub fn device_id(&self) -> String {
        hex::encode(&self.salt)
    }
}

impl TryFrom<&[u8]> for ApplicationInfo {
    type Error = Error;

    fn try_from(payload: &[u8]) -> Result<Self> {
        let mut version = None;
        let mut salt = Bytes::new();
        let mut challenge = None;
        let mut algorithm = None;

        for record in TlvIter::new(payload) {
            let record = record?;
            match record.tag() {
                tags::VERSION => version = Some(Version::try_from(&record)?),
                tags::NAME => salt = Bytes::copy_from_slice(record.value()),
                tags::CHALLENGE => challenge = Some(Bytes::copy_from_slice(record.value())),
                tags::ALGORITHM => {
                    let byte = record.value().first().copied().ok_or(
                        ProtocolError::InvalidLength {
                            field: "algorithm",
                            len: 0,
                        },
                    )?;
                    algorithm = Some(
                        HashAlgorithm::from_nibble(byte)
                            .ok_or(Error::UnsupportedAlgorithm(byte))?,
                    );
                }
                _ => {}
            }
        }

        let version = version.ok_or(ProtocolError::InvalidData("SELECT response lacks a version"))?;

        Ok(Self {
            version,
            salt,
            challenge,
            algorithm,
        })
    }
}

impl fmt::Display for ApplicationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OATH Application:")?;
        writeln!(f, "  Version: {}", self.version)?;
        writeln!(f, "  Device ID: {}", self.device_id())?;
        write!(
            f,
            "  Access code: {}",
            if self.has_access_code() { "set" } else { "not set" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_access_code() {
        let payload = hex::decode("790305040371081122334455667788").unwrap();
        let info = ApplicationInfo::try_from(payload.as_slice()).unwrap();

        assert_eq!(info.version, Version::from((5, 4, 3)));
        assert_eq!(info.device_id(), "1122334455667788");
        assert!(!info.has_access_code());
        assert_eq!(info.algorithm, None);
    }

    #[test]
    fn test_parse_with_access_code() {
        let payload = hex::decode(concat!(
            "790305040371081122334455667788",
            "74080102030405060708",
            "7b0101"
        ))
        .unwrap();

        let info = ApplicationInfo::try_from(payload.as_slice()).unwrap();
        assert!(info.has_access_code());
        assert_eq!(info.algorithm, Some(HashAlgorithm::Sha1));
    }

    #[test]
    fn test_missing_version() {
        let payload = hex::decode("71021122").unwrap();
        assert!(matches!(
            ApplicationInfo::try_from(payload.as_slice()),
            Err(Error::Protocol(ProtocolError::InvalidData(_)))
        ));
    }
}
