//! HOTP/TOTP code derivation (RFC 4226, RFC 6238)
//!
//! The card runs the same algorithm; this engine is used to truncate full
//! MACs returned by the card, to prepare keys before they are stored, and to
//! verify card output in tests.

use std::ops::RangeInclusive;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use crate::constants::{MIN_KEY_LEN, TOTP_PERIOD};
use crate::types::HashAlgorithm;
use crate::{Error, ProtocolError, Result};

/// Digit counts the applet accepts for stored credentials
pub const DIGITS_RANGE: RangeInclusive<u8> = 6..=8;

/// Digit counts a 31 bit truncated value can fill
pub const CODE_DIGITS_RANGE: RangeInclusive<u8> = 1..=10;

/// Reject digit counts the applet does not support
pub fn check_digits(digits: u8) -> Result<u8> {
    if DIGITS_RANGE.contains(&digits) {
        Ok(digits)
    } else {
        Err(Error::InvalidInput("digits must be between 6 and 8"))
    }
}

fn hmac_with<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|_| Error::InvalidInput("invalid HMAC key length"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC of `message` under `key`
pub fn hmac(algorithm: HashAlgorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        HashAlgorithm::Sha1 => hmac_with::<Hmac<Sha1>>(key, message),
        HashAlgorithm::Sha256 => hmac_with::<Hmac<Sha256>>(key, message),
        HashAlgorithm::Sha512 => hmac_with::<Hmac<Sha512>>(key, message),
    }
}

/// Dynamic truncation: 31 bits starting at the offset in the last nibble
pub fn dynamic_truncate(mac: &[u8]) -> Result<u32> {
    let offset = match mac.last() {
        Some(last) => (last & 0x0F) as usize,
        None => {
            return Err(ProtocolError::InvalidLength {
                field: "mac",
                len: 0,
            }
            .into());
        }
    };

    let window: [u8; 4] = mac
        .get(offset..offset + 4)
        .and_then(|w| w.try_into().ok())
        .ok_or(ProtocolError::InvalidLength {
            field: "mac",
            len: mac.len(),
        })?;

    Ok(u32::from_be_bytes(window) & 0x7FFF_FFFF)
}

/// Reduce a truncated value to `digits` decimal digits, left padded with zeros
pub fn format_code(value: u32, digits: u8) -> Result<String> {
    if !CODE_DIGITS_RANGE.contains(&digits) {
        return Err(Error::InvalidInput("digits must be between 1 and 10"));
    }
    let code = u64::from(value) % 10u64.pow(u32::from(digits));
    Ok(format!("{code:0width$}", width = usize::from(digits)))
}

/// Turn a full MAC into a code
pub fn truncate(mac: &[u8], digits: u8) -> Result<String> {
    format_code(dynamic_truncate(mac)?, digits)
}

/// Compute a code for `secret` at `moving_factor`
pub fn compute(
    secret: &[u8],
    moving_factor: u64,
    algorithm: HashAlgorithm,
    digits: u8,
) -> Result<String> {
    let mac = Zeroizing::new(hmac(algorithm, secret, &moving_factor.to_be_bytes())?);
    truncate(&mac, digits)
}

/// TOTP moving factor for a Unix timestamp
pub const fn time_step(timestamp: u64) -> u64 {
    timestamp / TOTP_PERIOD
}

/// Current Unix time in seconds
///
/// A clock set before the epoch reads as zero.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Prepare a secret for storage on the card
///
/// Keys longer than the hash block size are replaced by their digest and
/// short keys are zero padded to [`MIN_KEY_LEN`]. HMAC applies both
/// transformations itself, so the resulting codes do not change.
pub fn shorten_key(secret: &[u8], algorithm: HashAlgorithm) -> Zeroizing<Vec<u8>> {
    let mut key = if secret.len() > algorithm.block_size() {
        Zeroizing::new(match algorithm {
            HashAlgorithm::Sha1 => Sha1::digest(secret).to_vec(),
            HashAlgorithm::Sha256 => Sha256::digest(secret).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(secret).to_vec(),
        })
    } else {
        Zeroizing::new(secret.to_vec())
    };

    if key.len() < MIN_KEY_LEN {
        key.resize(MIN_KEY_LEN, 0);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_SHA1_KEY: &[u8] = b"12345678901234567890";
    const RFC_SHA256_KEY: &[u8] = b"12345678901234567890123456789012";
    const RFC_SHA512_KEY: &[u8] =
        b"1234567890123456789012345678901234567890123456789012345678901234";

    #[test]
    fn test_rfc4226_vectors() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];
        for (counter, code) in expected.iter().enumerate() {
            assert_eq!(
                compute(RFC_SHA1_KEY, counter as u64, HashAlgorithm::Sha1, 6).unwrap(),
                *code,
                "counter {counter}"
            );
        }
    }

    #[test]
    fn test_rfc4226_intermediate_values() {
        let mac = hmac(HashAlgorithm::Sha1, RFC_SHA1_KEY, &0u64.to_be_bytes()).unwrap();
        assert_eq!(hex::encode(&mac), "cc93cf18508d94934c64b65d8ba7667fb7cde4b0");
        assert_eq!(dynamic_truncate(&mac).unwrap(), 0x4c93cf18);
    }

    #[test]
    fn test_rfc6238_vectors() {
        let cases = [
            (59, "94287082", "46119246", "90693936"),
            (1111111109, "07081804", "68084774", "25091201"),
            (1111111111, "14050471", "67062674", "99943326"),
            (1234567890, "89005924", "91819424", "93441116"),
            (2000000000, "69279037", "90698825", "38618901"),
            (20000000000, "65353130", "77737706", "47863826"),
        ];
        for (time, sha1, sha256, sha512) in cases {
            let step = time_step(time);
            assert_eq!(compute(RFC_SHA1_KEY, step, HashAlgorithm::Sha1, 8).unwrap(), sha1);
            assert_eq!(compute(RFC_SHA256_KEY, step, HashAlgorithm::Sha256, 8).unwrap(), sha256);
            assert_eq!(compute(RFC_SHA512_KEY, step, HashAlgorithm::Sha512, 8).unwrap(), sha512);
        }
    }

    #[test]
    fn test_reference_vectors() {
        // 2013-01-01T00:00:00Z, 2014-06-15T12:00:00Z, 2015-12-31T23:59:59Z
        let timestamps = [1356998400, 1402833600, 1451606399];
        let cases: [(&[u8], [&str; 3]); 3] = [
            (b"123", ["947217", "904502", "204573"]),
            (b"456", ["576740", "958008", "329294"]),
            (b"789", ["129094", "552048", "169757"]),
        ];
        for (secret, codes) in cases {
            for (timestamp, code) in timestamps.iter().zip(codes) {
                let step = time_step(*timestamp);
                assert_eq!(
                    compute(secret, step, HashAlgorithm::Sha256, 6).unwrap(),
                    code
                );
            }
        }
    }

    #[test]
    fn test_format_code_pads_with_zeros() {
        assert_eq!(format_code(42, 6).unwrap(), "000042");
        assert_eq!(format_code(1_234_567_890, 8).unwrap(), "34567890");
        assert_eq!(format_code(0, 7).unwrap(), "0000000");
    }

    #[test]
    fn test_digits_out_of_range() {
        assert!(matches!(format_code(1, 0), Err(Error::InvalidInput(_))));
        assert!(matches!(format_code(1, 11), Err(Error::InvalidInput(_))));
        assert!(matches!(
            compute(b"key", 0, HashAlgorithm::Sha1, 11),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_digits_outside_applet_range() {
        let code = compute(b"123", 1, HashAlgorithm::Sha256, 4).unwrap();
        assert_eq!(code.len(), 4);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));

        assert_eq!(format_code(0x7FFF_FFFF, 10).unwrap(), "2147483647");
        assert_eq!(format_code(1_234_567, 1).unwrap(), "7");

        // Stored credentials stay within what the applet accepts
        assert!(check_digits(4).is_err());
        assert!(check_digits(9).is_err());
        assert_eq!(check_digits(7).unwrap(), 7);
    }

    #[test]
    fn test_truncate_short_mac() {
        assert!(matches!(
            truncate(&[], 6),
            Err(Error::Protocol(ProtocolError::InvalidLength { len: 0, .. }))
        ));
        // Offset 15 needs 19 bytes
        let mut mac = [0u8; 18];
        mac[17] = 0x0F;
        assert!(truncate(&mac, 6).is_err());
    }

    #[test]
    fn test_shorten_key_preserves_codes() {
        for algorithm in [HashAlgorithm::Sha1, HashAlgorithm::Sha256, HashAlgorithm::Sha512] {
            let long = vec![0x5Au8; algorithm.block_size() + 1];
            let shortened = shorten_key(&long, algorithm);
            assert_eq!(shortened.len(), algorithm.digest_len());
            assert_eq!(
                compute(&long, 1234, algorithm, 6).unwrap(),
                compute(&shortened, 1234, algorithm, 6).unwrap()
            );

            let short = b"abc";
            let padded = shorten_key(short, algorithm);
            assert_eq!(padded.len(), MIN_KEY_LEN);
            assert_eq!(&padded[..3], short);
            assert_eq!(
                compute(short, 99, algorithm, 8).unwrap(),
                compute(&padded, 99, algorithm, 8).unwrap()
            );
        }
    }

    #[test]
    fn test_shorten_key_keeps_block_sized_keys() {
        let key = vec![0x11u8; 64];
        assert_eq!(shorten_key(&key, HashAlgorithm::Sha1).as_slice(), key.as_slice());
    }

    #[test]
    fn test_time_step() {
        assert_eq!(time_step(0), 0);
        assert_eq!(time_step(29), 0);
        assert_eq!(time_step(30), 1);
        assert_eq!(time_step(1356998400), 45233280);
    }
}
