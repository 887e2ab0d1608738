//! OATH meaning of the failure status words

use derive_more::Display;
use nexum_apdu_core::StatusWord;

use crate::constants::status;

/// Symbolic meaning of the failure status words the OATH applet uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StatusKind {
    /// The referenced credential does not exist (6A 82)
    NoSuchObject,
    /// The credential store is full (65 81)
    NoSpace,
    /// Malformed data or length (67 00, 6A 80)
    WrongSyntax,
}

impl StatusKind {
    /// Map a status word onto the applet's symbolic failure kinds
    pub const fn from_status(status: StatusWord) -> Option<Self> {
        match status.to_u16() {
            status::SW_NOT_FOUND => Some(Self::NoSuchObject),
            status::SW_NO_SPACE => Some(Self::NoSpace),
            status::SW_WRONG_LENGTH | status::SW_WRONG_DATA => Some(Self::WrongSyntax),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_kinds() {
        let kind = |sw: u16| StatusKind::from_status(StatusWord::from_u16(sw));
        assert_eq!(kind(0x6A82), Some(StatusKind::NoSuchObject));
        assert_eq!(kind(0x6581), Some(StatusKind::NoSpace));
        assert_eq!(kind(0x6700), Some(StatusKind::WrongSyntax));
        assert_eq!(kind(0x6A80), Some(StatusKind::WrongSyntax));
        assert_eq!(kind(0x6F00), None);
        assert_eq!(kind(0x9000), None);
    }
}
