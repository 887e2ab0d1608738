use bytes::{BufMut, Bytes, BytesMut};
use nexum_apdu_core::Command;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::constants::{DEFAULT_DIGITS, ins, tags};
use crate::otp;
use crate::tlv::Tlv;
use crate::types::{CredentialKind, HashAlgorithm, OathType};
use crate::{Error, Result};

use super::{OathCommand, name_record, tlv_command};

/// PUT a credential onto the card
///
/// Defaults to a six digit TOTP credential using SHA256. Without an explicit
/// secret a random one of the algorithm's digest length is generated; read
/// it back with [`PutCommand::secret`] to provision the other side.
#[derive(Debug, Clone)]
pub struct PutCommand {
    name: String,
    secret: Zeroizing<Vec<u8>>,
    generated: bool,
    kind: CredentialKind,
    digits: u8,
    counter: u32,
}

fn random_secret(algorithm: HashAlgorithm) -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0u8; algorithm.digest_len()]);
    rand::rng().fill_bytes(secret.as_mut_slice());
    secret
}

impl PutCommand {
    /// Create a PUT command for `name` with a freshly generated secret
    pub fn new(name: impl Into<String>) -> Self {
        let kind = CredentialKind::default();
        Self {
            name: name.into(),
            secret: random_secret(kind.algorithm),
            generated: true,
            kind,
            digits: DEFAULT_DIGITS,
            counter: 0,
        }
    }

    /// Use the given secret
    pub fn with_secret(mut self, secret: &[u8]) -> Self {
        self.secret = Zeroizing::new(secret.to_vec());
        self.generated = false;
        self
    }

    /// Set the credential type
    pub const fn with_type(mut self, oath_type: OathType) -> Self {
        self.kind.oath_type = oath_type;
        self
    }

    /// Set the hash algorithm
    ///
    /// A generated secret is regenerated to match the new digest length.
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.kind.algorithm = algorithm;
        if self.generated {
            self.secret = random_secret(algorithm);
        }
        self
    }

    /// Set the number of digits
    pub const fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Set the initial HOTP counter
    pub const fn with_counter(mut self, counter: u32) -> Self {
        self.counter = counter;
        self
    }

    /// Credential name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Secret as supplied or generated, before key shortening
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Whether the secret was generated rather than supplied
    pub const fn is_generated(&self) -> bool {
        self.generated
    }

    /// Type and algorithm
    pub const fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// Number of digits
    pub const fn digits(&self) -> u8 {
        self.digits
    }

    fn key_record(&self) -> Result<Tlv> {
        let key = otp::shorten_key(&self.secret, self.kind.algorithm);
        let mut value = BytesMut::with_capacity(2 + key.len());
        value.put_u8(self.kind.to_byte());
        value.put_u8(self.digits);
        value.put_slice(&key);
        Tlv::new(tags::KEY, value.freeze())
            .map_err(|_| Error::InvalidInput("secret too long"))
    }
}

impl OathCommand for PutCommand {
    type Output = bool;

    fn to_command(&self) -> Result<Command> {
        otp::check_digits(self.digits)?;

        let mut records = vec![name_record(&self.name)?, self.key_record()?];
        if self.kind.oath_type == OathType::Hotp && self.counter > 0 {
            records.push(Tlv::new(tags::IMF, Bytes::copy_from_slice(&self.counter.to_be_bytes()))?);
        }

        tlv_command(ins::PUT, 0x00, 0x00, &records)
    }

    fn parse_response(&self, _payload: Bytes) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use nexum_apdu_core::ApduCommand;

    use super::*;

    #[test]
    fn test_put_totp_bytes() {
        let command = PutCommand::new("foo")
            .with_secret(b"12345678901234")
            .to_command()
            .unwrap();
        assert_eq!(
            hex::encode(command.to_bytes()),
            concat!(
                "0001000017",
                "7103666f6f",
                "731022063132333435363738393031323334"
            )
        );
    }

    #[test]
    fn test_put_hotp_with_counter() {
        let command = PutCommand::new("h")
            .with_secret(b"12345678901234")
            .with_type(OathType::Hotp)
            .with_algorithm(HashAlgorithm::Sha1)
            .with_digits(8)
            .with_counter(5)
            .to_command()
            .unwrap();
        let data = hex::encode(command.data().unwrap());
        assert_eq!(
            data,
            concat!(
                "710168",
                "731011083132333435363738393031323334",
                "7a0400000005"
            )
        );
    }

    #[test]
    fn test_counter_ignored_for_totp() {
        let command = PutCommand::new("t")
            .with_secret(&[0u8; 20])
            .with_counter(5)
            .to_command()
            .unwrap();
        assert!(!hex::encode(command.data().unwrap()).contains("7a04"));
    }

    #[test]
    fn test_short_secret_is_padded() {
        let command = PutCommand::new("a").with_secret(b"123").to_command().unwrap();
        let data = command.data().unwrap();
        // NAME(3) + KEY header(2) + kind + digits + 14 byte key
        assert_eq!(data.len(), 3 + 2 + 2 + 14);
        assert_eq!(&data[7..10], b"123");
        assert!(data[10..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_generated_secret_matches_digest_length() {
        let command = PutCommand::new("gen");
        assert!(command.is_generated());
        assert_eq!(command.secret().len(), 32);

        let command = command.with_algorithm(HashAlgorithm::Sha512);
        assert_eq!(command.secret().len(), 64);

        let command = command.with_secret(b"fixed").with_algorithm(HashAlgorithm::Sha1);
        assert!(!command.is_generated());
        assert_eq!(command.secret(), b"fixed");
    }

    #[test]
    fn test_generated_secrets_differ() {
        assert_ne!(PutCommand::new("a").secret(), PutCommand::new("a").secret());
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            PutCommand::new("").to_command(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PutCommand::new("x".repeat(256)).to_command(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PutCommand::new("x").with_digits(9).to_command(),
            Err(Error::InvalidInput(_))
        ));
    }
}
