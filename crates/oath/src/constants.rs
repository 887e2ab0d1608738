//! Protocol constants for the OATH applet

/// OATH applet identifier
pub const OATH_AID: &[u8] = &[0xA0, 0x00, 0x00, 0x05, 0x27, 0x21, 0x01];

/// Class byte used by every OATH command
pub const CLA_OATH: u8 = 0x00;

/// Instruction codes
pub mod ins {
    /// PUT a credential
    pub const PUT: u8 = 0x01;
    /// DELETE a credential
    pub const DELETE: u8 = 0x02;
    /// RESET the applet
    pub const RESET: u8 = 0x04;
    /// SELECT by AID
    pub const SELECT: u8 = 0xA4;
    /// LIST credentials
    pub const LIST: u8 = 0xA1;
    /// CALCULATE a single code
    pub const CALCULATE: u8 = 0xA2;
    /// CALCULATE ALL codes (shares its INS with SELECT, told apart by P1)
    pub const CALCULATE_ALL: u8 = 0xA4;
    /// GET RESPONSE, fetches the remainder of a chained response
    pub const GET_RESPONSE: u8 = 0xC0;
}

/// TLV tags carried in OATH payloads
pub mod tags {
    /// Credential name, or the device salt in a SELECT response
    pub const NAME: u8 = 0x71;
    /// LIST entry: type/algorithm byte followed by the name
    pub const NAME_LIST: u8 = 0x72;
    /// Credential key: type/algorithm byte, digits, secret
    pub const KEY: u8 = 0x73;
    /// Moving factor challenge
    pub const CHALLENGE: u8 = 0x74;
    /// Untruncated HMAC response
    pub const FULL_RESPONSE: u8 = 0x75;
    /// Truncated response: digits followed by a 4 byte value
    pub const TRUNCATED_RESPONSE: u8 = 0x76;
    /// No code available for this entry
    pub const NO_RESPONSE: u8 = 0x77;
    /// Credential property flags
    pub const PROPERTY: u8 = 0x78;
    /// Applet version
    pub const VERSION: u8 = 0x79;
    /// HOTP initial moving factor
    pub const IMF: u8 = 0x7A;
    /// Algorithm used for access code validation
    pub const ALGORITHM: u8 = 0x7B;
    /// Entry requires touch before a code is released
    pub const TOUCH: u8 = 0x7C;
}

/// Status words returned by the applet
pub mod status {
    /// Command completed
    pub const SW_NO_ERROR: u16 = 0x9000;
    /// Wrong length
    pub const SW_WRONG_LENGTH: u16 = 0x6700;
    /// Incorrect data in the command payload
    pub const SW_WRONG_DATA: u16 = 0x6A80;
    /// Referenced credential does not exist
    pub const SW_NOT_FOUND: u16 = 0x6A82;
    /// No room left for another credential
    pub const SW_NO_SPACE: u16 = 0x6581;
    /// Conditions of use not satisfied
    pub const SW_CONDITIONS_NOT_SATISFIED: u16 = 0x6985;
    /// Incorrect P1/P2
    pub const SW_INCORRECT_P1P2: u16 = 0x6A86;
    /// Instruction not supported
    pub const SW_INS_NOT_SUPPORTED: u16 = 0x6D00;
}

/// P1/P2 confirmation bytes that must accompany RESET
pub const RESET_CONFIRMATION: [u8; 2] = [0xDE, 0xAD];

/// TOTP time step in seconds
pub const TOTP_PERIOD: u64 = 30;

/// Default number of code digits
pub const DEFAULT_DIGITS: u8 = 6;

/// Longest name the length byte of a TLV can describe
pub const MAX_NAME_LEN: usize = 255;

/// Longest data field of a short command APDU
pub const MAX_DATA_LEN: usize = 255;

/// Secrets shorter than this are zero padded before being stored
pub const MIN_KEY_LEN: usize = 14;
