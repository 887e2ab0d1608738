use bytes::Bytes;
use nexum_apdu_core::Command;

use crate::constants::{ins, tags};
use crate::otp::{self, CODE_DIGITS_RANGE};
use crate::tlv::{Tlv, TlvIter};
use crate::{ProtocolError, Result};

use super::{OathCommand, name_record, tlv_command};

/// CALCULATE the code of a single credential
///
/// The challenge is the TOTP moving factor. HOTP credentials ignore it and
/// use the counter kept on the card.
#[derive(Debug, Clone)]
pub struct CalculateCommand {
    name: String,
    challenge: u64,
    truncate: bool,
}

impl CalculateCommand {
    /// Create a CALCULATE command requesting a truncated response
    pub fn new(name: impl Into<String>, challenge: u64) -> Self {
        Self {
            name: name.into(),
            challenge,
            truncate: true,
        }
    }

    /// Choose between a card-truncated code and the full MAC
    pub const fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }
}

impl OathCommand for CalculateCommand {
    type Output = String;

    fn to_command(&self) -> Result<Command> {
        let records = [name_record(&self.name)?, Tlv::challenge(self.challenge)];
        tlv_command(
            ins::CALCULATE,
            0x00,
            u8::from(self.truncate),
            &records,
        )
    }

    fn parse_response(&self, payload: Bytes) -> Result<String> {
        let record = TlvIter::new(&payload)
            .next()
            .ok_or(ProtocolError::TruncatedTlv)??;

        match record.tag() {
            tags::TRUNCATED_RESPONSE => code_from_truncated(record.value()),
            tags::FULL_RESPONSE => code_from_full(record.value()),
            actual => Err(ProtocolError::UnexpectedTag {
                expected: if self.truncate {
                    tags::TRUNCATED_RESPONSE
                } else {
                    tags::FULL_RESPONSE
                },
                actual,
            }
            .into()),
        }
    }
}

fn response_digits(byte: u8) -> Result<u8> {
    if CODE_DIGITS_RANGE.contains(&byte) {
        Ok(byte)
    } else {
        Err(ProtocolError::InvalidData("digit count out of range").into())
    }
}

/// Decode a TRUNCATED_RESPONSE value: digits byte and a 4 byte value
pub(crate) fn code_from_truncated(value: &[u8]) -> Result<String> {
    match *value {
        [digits, a, b, c, d] => {
            let digits = response_digits(digits)?;
            otp::format_code(u32::from_be_bytes([a, b, c, d]) & 0x7FFF_FFFF, digits)
        }
        _ => Err(ProtocolError::InvalidLength {
            field: "truncated response",
            len: value.len(),
        }
        .into()),
    }
}

/// Decode a FULL_RESPONSE value: digits byte followed by the MAC
fn code_from_full(value: &[u8]) -> Result<String> {
    let (digits, mac) = value.split_first().ok_or(ProtocolError::InvalidLength {
        field: "full response",
        len: 0,
    })?;
    otp::truncate(mac, response_digits(*digits)?)
}

#[cfg(test)]
mod tests {
    use nexum_apdu_core::ApduCommand;

    use super::*;
    use crate::Error;
    use crate::types::HashAlgorithm;

    #[test]
    fn test_calculate_bytes() {
        let command = CalculateCommand::new("foo", 45233280).to_command().unwrap();
        assert_eq!(
            hex::encode(command.to_bytes()),
            "00a200010f7103666f6f74080000000002b23480"
        );

        let command = CalculateCommand::new("foo", 1)
            .with_truncate(false)
            .to_command()
            .unwrap();
        assert_eq!(command.p2(), 0x00);
    }

    #[test]
    fn test_parse_truncated() {
        let command = CalculateCommand::new("foo", 0);
        let payload = Bytes::from(hex::decode("760506000004d2").unwrap());
        assert_eq!(command.parse_response(payload).unwrap(), "001234");
    }

    #[test]
    fn test_parse_full_response() {
        let mac = otp::hmac(HashAlgorithm::Sha1, b"12345678901234567890", &[0u8; 8]).unwrap();
        let mut payload = vec![tags::FULL_RESPONSE, 21, 6];
        payload.extend_from_slice(&mac);

        let command = CalculateCommand::new("foo", 0).with_truncate(false);
        assert_eq!(command.parse_response(payload.into()).unwrap(), "755224");
    }

    #[test]
    fn test_parse_bad_payloads() {
        let command = CalculateCommand::new("foo", 0);
        assert!(matches!(
            command.parse_response(Bytes::new()),
            Err(Error::Protocol(ProtocolError::TruncatedTlv))
        ));
        assert!(matches!(
            command.parse_response(Bytes::from_static(&[0x77, 0x01, 0x06])),
            Err(Error::Protocol(ProtocolError::UnexpectedTag { actual: 0x77, .. }))
        ));
        assert!(matches!(
            command.parse_response(Bytes::from_static(&[0x76, 0x02, 0x06, 0x01])),
            Err(Error::Protocol(ProtocolError::InvalidLength { len: 2, .. }))
        ));
        assert!(matches!(
            command.parse_response(Bytes::from_static(&[0x76, 0x05, 0x0B, 0, 0, 0, 1])),
            Err(Error::Protocol(ProtocolError::InvalidData(_)))
        ));
        assert!(matches!(
            command.parse_response(Bytes::from_static(&[0x76, 0x05, 0x00, 0, 0, 0, 1])),
            Err(Error::Protocol(ProtocolError::InvalidData(_)))
        ));
    }
}
