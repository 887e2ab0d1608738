//! Simple TLV codec used inside OATH payloads
//!
//! Every record is one tag byte, one length byte and `length` value bytes.
//! Unlike BER-TLV there are no multi-byte tags, no long-form lengths and no
//! constructed values.

use bytes::{BufMut, Bytes, BytesMut};

use crate::ProtocolError;
use crate::constants::tags;

/// A single tag-length-value record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: u8,
    value: Bytes,
}

/// Whether `tag` belongs to the OATH tag table
pub const fn is_known_tag(tag: u8) -> bool {
    matches!(tag, tags::NAME..=tags::TOUCH)
}

impl Tlv {
    /// Create a record, rejecting values a single length byte cannot describe
    pub fn new(tag: u8, value: impl Into<Bytes>) -> Result<Self, ProtocolError> {
        let value = value.into();
        if value.len() > u8::MAX as usize {
            return Err(ProtocolError::ValueTooLong(value.len()));
        }
        Ok(Self { tag, value })
    }

    /// NAME record for a credential name
    pub fn name(name: &str) -> Result<Self, ProtocolError> {
        Self::new(tags::NAME, Bytes::copy_from_slice(name.as_bytes()))
    }

    /// CHALLENGE record carrying a big-endian moving factor
    pub fn challenge(moving_factor: u64) -> Self {
        Self {
            tag: tags::CHALLENGE,
            value: Bytes::copy_from_slice(&moving_factor.to_be_bytes()),
        }
    }

    /// Record tag
    pub const fn tag(&self) -> u8 {
        self.tag
    }

    /// Record value
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Length of the encoded record
    pub fn encoded_len(&self) -> usize {
        2 + self.value.len()
    }

    /// Append the encoded record to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.tag);
        buf.put_u8(self.value.len() as u8);
        buf.put_slice(&self.value);
    }

    /// Encode this record alone
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Return the record if it carries `tag`
    pub fn expect_tag(self, tag: u8) -> Result<Self, ProtocolError> {
        if self.tag == tag {
            Ok(self)
        } else {
            Err(ProtocolError::UnexpectedTag {
                expected: tag,
                actual: self.tag,
            })
        }
    }

    /// Interpret the value as a UTF-8 credential name
    pub fn to_name(&self) -> Result<String, ProtocolError> {
        String::from_utf8(self.value.to_vec())
            .map_err(|_| ProtocolError::InvalidData("credential name is not UTF-8"))
    }

    /// Interpret the value as an 8 byte big-endian integer
    pub fn to_u64(&self) -> Result<u64, ProtocolError> {
        let bytes: [u8; 8] = self
            .value
            .as_ref()
            .try_into()
            .map_err(|_| ProtocolError::InvalidLength {
                field: "challenge",
                len: self.value.len(),
            })?;
        Ok(u64::from_be_bytes(bytes))
    }
}

/// Encode a sequence of records back to back
pub fn encode<'a, I>(records: I) -> Bytes
where
    I: IntoIterator<Item = &'a Tlv>,
{
    let mut buf = BytesMut::new();
    for record in records {
        record.encode_into(&mut buf);
    }
    buf.freeze()
}

/// Iterator decoding records from a buffer until it is exhausted
///
/// Yields an error, then stops, on an unknown tag or a truncated record.
#[derive(Debug, Clone)]
pub struct TlvIter<'a> {
    buf: &'a [u8],
    failed: bool,
}

impl<'a> TlvIter<'a> {
    /// Iterate over the records in `buf`
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, failed: false }
    }

    fn next_record(&mut self) -> Result<Tlv, ProtocolError> {
        let [tag, len, rest @ ..] = self.buf else {
            return Err(ProtocolError::TruncatedTlv);
        };
        if !is_known_tag(*tag) {
            return Err(ProtocolError::UnknownTag(*tag));
        }
        let len = *len as usize;
        if rest.len() < len {
            return Err(ProtocolError::TruncatedTlv);
        }
        let (value, rest) = rest.split_at(len);
        self.buf = rest;
        Ok(Tlv {
            tag: *tag,
            value: Bytes::copy_from_slice(value),
        })
    }
}

impl Iterator for TlvIter<'_> {
    type Item = Result<Tlv, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.buf.is_empty() {
            return None;
        }
        let record = self.next_record();
        self.failed = record.is_err();
        Some(record)
    }
}

/// Decode every record in `buf`
pub fn decode(buf: &[u8]) -> Result<Vec<Tlv>, ProtocolError> {
    TlvIter::new(buf).collect()
}
