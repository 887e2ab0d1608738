use derive_more::Display;

use crate::{Error, Result};

/// HMAC hash algorithm of a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum HashAlgorithm {
    /// HMAC-SHA1
    #[display("SHA1")]
    Sha1,
    /// HMAC-SHA256
    #[default]
    #[display("SHA256")]
    Sha256,
    /// HMAC-SHA512
    #[display("SHA512")]
    Sha512,
}

impl HashAlgorithm {
    /// Low nibble of the type/algorithm byte
    pub const fn to_nibble(self) -> u8 {
        match self {
            Self::Sha1 => 0x01,
            Self::Sha256 => 0x02,
            Self::Sha512 => 0x03,
        }
    }

    /// Parse the low nibble of the type/algorithm byte
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x01 => Some(Self::Sha1),
            0x02 => Some(Self::Sha256),
            0x03 => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Digest output length in bytes
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Hash block size in bytes
    pub const fn block_size(self) -> usize {
        match self {
            Self::Sha1 | Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }
}

/// Kind of one-time password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum OathType {
    /// Counter based (RFC 4226)
    #[display("HOTP")]
    Hotp,
    /// Time based (RFC 6238)
    #[default]
    #[display("TOTP")]
    Totp,
}

impl OathType {
    /// High nibble of the type/algorithm byte
    pub const fn to_nibble(self) -> u8 {
        match self {
            Self::Hotp => 0x10,
            Self::Totp => 0x20,
        }
    }

    /// Parse the high nibble of the type/algorithm byte
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x10 => Some(Self::Hotp),
            0x20 => Some(Self::Totp),
            _ => None,
        }
    }
}

/// Credential type and hash algorithm, packed into one byte on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[display("{oath_type}/{algorithm}")]
pub struct CredentialKind {
    /// HOTP or TOTP
    pub oath_type: OathType,
    /// HMAC hash algorithm
    pub algorithm: HashAlgorithm,
}

impl CredentialKind {
    /// Create a kind from its parts
    pub const fn new(oath_type: OathType, algorithm: HashAlgorithm) -> Self {
        Self {
            oath_type,
            algorithm,
        }
    }

    /// Encode as the combined type/algorithm byte
    pub const fn to_byte(self) -> u8 {
        self.oath_type.to_nibble() | self.algorithm.to_nibble()
    }
}

impl TryFrom<u8> for CredentialKind {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        let oath_type = OathType::from_nibble(byte & 0xF0);
        let algorithm = HashAlgorithm::from_nibble(byte & 0x0F);
        match (oath_type, algorithm) {
            (Some(oath_type), Some(algorithm)) => Ok(Self::new(oath_type, algorithm)),
            _ => Err(Error::UnsupportedAlgorithm(byte)),
        }
    }
}

impl From<CredentialKind> for u8 {
    fn from(kind: CredentialKind) -> Self {
        kind.to_byte()
    }
}
