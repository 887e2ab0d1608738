use derive_more::{Display, From, Into};

use crate::ProtocolError;
use crate::constants::tags;
use crate::tlv::Tlv;

/// Applet version (major.minor.patch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, From, Into)]
#[display("{}.{}.{}", major, minor, patch)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl TryFrom<&Tlv> for Version {
    type Error = ProtocolError;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        if tlv.tag() != tags::VERSION {
            return Err(ProtocolError::UnexpectedTag {
                expected: tags::VERSION,
                actual: tlv.tag(),
            });
        }

        match *tlv.value() {
            [major, minor, patch] => Ok(Self {
                major,
                minor,
                patch,
            }),
            _ => Err(ProtocolError::InvalidLength {
                field: "version",
                len: tlv.value().len(),
            }),
        }
    }
}
