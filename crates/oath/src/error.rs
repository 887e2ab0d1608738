use std::fmt;

use thiserror::Error;

use nexum_apdu_core::StatusWord;

use crate::status::StatusKind;

/// Result type for OATH operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for OATH operations
#[derive(Debug, Error)]
pub enum Error {
    /// Transport and framing errors from the APDU layer. Fatal to the session.
    #[error(transparent)]
    Apdu(nexum_apdu_core::Error),

    /// Malformed or unparseable response
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Non-success status word
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Unknown credential type or hash algorithm byte
    #[error("Unsupported algorithm or credential type: {0:#04x}")]
    UnsupportedAlgorithm(u8),

    /// Operation attempted before the applet was selected
    #[error("OATH applet not selected")]
    NotSelected,

    /// Argument rejected before anything was sent to the card
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),
}

impl Error {
    /// Symbolic kind of the status word, if this is a known status error
    pub const fn status_kind(&self) -> Option<StatusKind> {
        match self {
            Self::Status(e) => e.kind(),
            _ => None,
        }
    }

    /// Whether the card reported that the named credential does not exist
    pub const fn is_no_such_object(&self) -> bool {
        matches!(self.status_kind(), Some(StatusKind::NoSuchObject))
    }

    /// Whether this error came from the transport
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Apdu(_))
    }
}

impl From<nexum_apdu_core::Error> for Error {
    fn from(err: nexum_apdu_core::Error) -> Self {
        let mut cause = &err;
        while let nexum_apdu_core::Error::Context { source, .. } = cause {
            cause = source;
        }
        match cause {
            nexum_apdu_core::Error::ChainLimitExceeded => {
                Self::Protocol(ProtocolError::ChainLimitExceeded)
            }
            nexum_apdu_core::Error::ParseError(what) => {
                Self::Protocol(ProtocolError::InvalidData(*what))
            }
            _ => Self::Apdu(err),
        }
    }
}

/// Errors raised while decoding card responses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// TLV header or value runs past the end of the buffer
    #[error("Truncated TLV record")]
    TruncatedTlv,

    /// TLV value longer than a single length byte can describe
    #[error("TLV value too long: {0} bytes")]
    ValueTooLong(usize),

    /// Tag outside the OATH tag table
    #[error("Unknown TLV tag: {0:#04x}")]
    UnknownTag(u8),

    /// Known tag in a position where another was expected
    #[error("Unexpected TLV tag {actual:#04x}, expected {expected:#04x}")]
    UnexpectedTag {
        /// Tag the decoder expected
        expected: u8,
        /// Tag found in the payload
        actual: u8,
    },

    /// A record value has the wrong size
    #[error("Invalid length for {field}: {len} bytes")]
    InvalidLength {
        /// Field being decoded
        field: &'static str,
        /// Length found
        len: usize,
    },

    /// Card kept signalling more data past the continuation limit
    #[error("Response chain exceeded the continuation limit")]
    ChainLimitExceeded,

    /// Any other malformed value
    #[error("Invalid data: {0}")]
    InvalidData(&'static str),
}

/// Error for a terminal status word other than 90 00
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub struct StatusError {
    /// Status word that caused the error
    pub status: StatusWord,
}

impl StatusError {
    /// Create a new status error
    pub const fn new(status: StatusWord) -> Self {
        Self { status }
    }

    /// Raw status code
    pub const fn code(&self) -> u16 {
        self.status.to_u16()
    }

    /// Symbolic kind, where the status word has one
    pub const fn kind(&self) -> Option<StatusKind> {
        StatusKind::from_status(self.status)
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status error {:04X}", self.code())?;
        match self.kind() {
            Some(kind) => write!(f, ": {kind}"),
            None => write!(f, ": {}", self.status.description()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = StatusError::new(StatusWord::from_u16(0x6A82));
        assert_eq!(err.to_string(), "Status error 6A82: NoSuchObject");
        assert_eq!(err.code(), 0x6A82);

        let err = StatusError::new(StatusWord::from_u16(0x6D00));
        assert_eq!(
            err.to_string(),
            "Status error 6D00: Instruction code not supported or invalid"
        );
    }

    #[test]
    fn test_error_kind_helpers() {
        let err = Error::from(StatusError::new(StatusWord::from_u16(0x6A82)));
        assert!(err.is_no_such_object());
        assert!(!err.is_transport());

        let err = Error::from(StatusError::new(StatusWord::from_u16(0x6581)));
        assert_eq!(err.status_kind(), Some(StatusKind::NoSpace));

        assert_eq!(Error::NotSelected.status_kind(), None);
        assert!(Error::from(nexum_apdu_core::Error::TransmissionError).is_transport());
    }

    #[test]
    fn test_apdu_error_classification() {
        let chained = nexum_apdu_core::Error::ChainLimitExceeded
            .with_context("Error in processor pipeline");
        assert!(matches!(
            Error::from(chained),
            Error::Protocol(ProtocolError::ChainLimitExceeded)
        ));

        let lost = nexum_apdu_core::Error::ConnectionError.with_context("Transport error");
        assert!(Error::from(lost).is_transport());
    }
}
