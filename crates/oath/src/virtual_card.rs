//! In-memory OATH applet
//!
//! [`VirtualCard`] implements [`CardTransport`] by answering APDUs from a
//! volatile credential store, so the full protocol can run without a reader.
//! The store lives only as long as the value; nothing is written to disk.
//! Responses longer than the configured chunk size are split with `61xx`
//! and served through GET RESPONSE, like a card with a small I/O buffer.

use bytes::{BufMut, Bytes, BytesMut};
use nexum_apdu_core::{ApduCommand, CardTransport, Command, Error, Response, StatusWord};
use tracing::debug;
use zeroize::Zeroizing;

use crate::constants::{OATH_AID, RESET_CONFIRMATION, ins, status, tags};
use crate::otp;
use crate::tlv::{self, Tlv};
use crate::types::{CredentialKind, OathType};

/// Longest credential name the virtual applet stores
pub const MAX_STORED_NAME_LEN: usize = 64;

/// Default number of credential slots
pub const DEFAULT_CAPACITY: usize = 32;

/// Default response chunk size, the largest a short APDU response carries
pub const DEFAULT_CHUNK_SIZE: usize = 256;

type Handled = std::result::Result<Bytes, StatusWord>;

const WRONG_DATA: StatusWord = StatusWord::from_u16(status::SW_WRONG_DATA);
const NOT_FOUND: StatusWord = StatusWord::from_u16(status::SW_NOT_FOUND);

#[derive(Debug)]
struct StoredCredential {
    name: String,
    kind: CredentialKind,
    digits: u8,
    key: Zeroizing<Vec<u8>>,
    counter: u64,
}

/// Virtual OATH applet with a volatile credential store
#[derive(Debug)]
pub struct VirtualCard {
    credentials: Vec<StoredCredential>,
    version: [u8; 3],
    salt: [u8; 8],
    selected: bool,
    connected: bool,
    capacity: usize,
    chunk_size: usize,
    pending: Bytes,
    commands: Vec<Bytes>,
}

impl Default for VirtualCard {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualCard {
    /// Create an empty virtual applet
    pub const fn new() -> Self {
        Self {
            credentials: Vec::new(),
            version: [5, 4, 3],
            salt: [0x5A, 0x17, 0xC0, 0xDE, 0x01, 0x02, 0x03, 0x04],
            selected: false,
            connected: true,
            capacity: DEFAULT_CAPACITY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            pending: Bytes::new(),
            commands: Vec::new(),
        }
    }

    /// Split responses into chunks of at most `chunk_size` bytes
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, DEFAULT_CHUNK_SIZE);
        self
    }

    /// Limit the number of stored credentials
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Simulate pulling the card out of the reader
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.selected = false;
        self.pending = Bytes::new();
    }

    /// Put the card back; the applet has to be selected again
    pub const fn reconnect(&mut self) {
        self.connected = true;
    }

    /// Every raw command received, including GET RESPONSE
    pub fn commands(&self) -> &[Bytes] {
        &self.commands
    }

    /// Forget the recorded commands
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of stored credentials
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Current HOTP counter of a credential
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.find(name).map(|c| c.counter)
    }

    fn find(&self, name: &str) -> Option<&StoredCredential> {
        self.credentials.iter().find(|c| c.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.credentials.iter().position(|c| c.name == name)
    }

    /// Process one command APDU
    pub fn process(&mut self, raw: &[u8]) -> Response {
        let Ok(command) = Command::from_bytes(raw) else {
            return Response::error(status::SW_WRONG_LENGTH);
        };

        if command.instruction() == ins::GET_RESPONSE {
            return self.next_chunk();
        }
        self.pending = Bytes::new();

        let is_select = command.instruction() == ins::SELECT && command.p1() == 0x04;
        if !self.selected && !is_select {
            return Response::error(status::SW_INS_NOT_SUPPORTED);
        }

        debug!(
            ins = command.instruction(),
            p1 = command.p1(),
            p2 = command.p2(),
            "Virtual applet handling command"
        );

        let result = match (command.instruction(), command.p1()) {
            (ins::SELECT, 0x04) => self.select(&command),
            (ins::CALCULATE_ALL, 0x00) => self.calculate_all(&command),
            (ins::LIST, _) => Ok(self.list()),
            (ins::PUT, _) => self.put(&command),
            (ins::DELETE, _) => self.delete(&command),
            (ins::RESET, _) => self.reset(&command),
            (ins::CALCULATE, _) => self.calculate(&command),
            _ => Err(StatusWord::from_u16(status::SW_INS_NOT_SUPPORTED)),
        };

        match result {
            Ok(payload) => self.respond(payload),
            Err(status) => Response::error(status),
        }
    }

    fn respond(&mut self, payload: Bytes) -> Response {
        if payload.len() <= self.chunk_size {
            return Response::success(Some(payload));
        }
        self.pending = payload;
        self.next_chunk()
    }

    fn next_chunk(&mut self) -> Response {
        if self.pending.is_empty() {
            return Response::error(status::SW_CONDITIONS_NOT_SATISFIED);
        }

        let take = self.chunk_size.min(self.pending.len());
        let chunk = self.pending.split_to(take);
        match self.pending.len() {
            0 => Response::success(Some(chunk)),
            remaining => Response::new(
                Some(chunk),
                StatusWord::new(0x61, remaining.min(0xFF) as u8),
            ),
        }
    }

    fn select(&mut self, command: &Command) -> Handled {
        if command.data() != Some(OATH_AID) {
            self.selected = false;
            return Err(NOT_FOUND);
        }
        self.selected = true;
        Ok(tlv::encode(&[
            Tlv::new(tags::VERSION, Bytes::copy_from_slice(&self.version)).map_err(|_| WRONG_DATA)?,
            Tlv::new(tags::NAME, Bytes::copy_from_slice(&self.salt)).map_err(|_| WRONG_DATA)?,
        ]))
    }

    fn list(&self) -> Bytes {
        let mut buf = BytesMut::new();
        for credential in &self.credentials {
            buf.put_u8(tags::NAME_LIST);
            buf.put_u8(credential.name.len() as u8 + 1);
            buf.put_u8(credential.kind.to_byte());
            buf.put_slice(credential.name.as_bytes());
        }
        buf.freeze()
    }

    fn put(&mut self, command: &Command) -> Handled {
        let records = parse_records(command)?;
        let name = required_name(&records)?;
        if name.len() > MAX_STORED_NAME_LEN {
            return Err(WRONG_DATA);
        }

        let key = find_record(&records, tags::KEY).ok_or(WRONG_DATA)?;
        let [kind, digits, secret @ ..] = key.value() else {
            return Err(WRONG_DATA);
        };
        let kind = CredentialKind::try_from(*kind).map_err(|_| WRONG_DATA)?;
        if !otp::DIGITS_RANGE.contains(digits) {
            return Err(WRONG_DATA);
        }

        let counter = match find_record(&records, tags::IMF) {
            Some(imf) => {
                let bytes: [u8; 4] = imf.value().try_into().map_err(|_| WRONG_DATA)?;
                u64::from(u32::from_be_bytes(bytes))
            }
            None => 0,
        };

        let credential = StoredCredential {
            name,
            kind,
            digits: *digits,
            key: Zeroizing::new(secret.to_vec()),
            counter,
        };

        match self.position(&credential.name) {
            Some(index) => self.credentials[index] = credential,
            None if self.credentials.len() >= self.capacity => {
                return Err(StatusWord::from_u16(status::SW_NO_SPACE));
            }
            None => self.credentials.push(credential),
        }
        Ok(Bytes::new())
    }

    fn delete(&mut self, command: &Command) -> Handled {
        let name = required_name(&parse_records(command)?)?;
        let index = self.position(&name).ok_or(NOT_FOUND)?;
        self.credentials.remove(index);
        Ok(Bytes::new())
    }

    fn reset(&mut self, command: &Command) -> Handled {
        if [command.p1(), command.p2()] != RESET_CONFIRMATION {
            return Err(StatusWord::from_u16(status::SW_INCORRECT_P1P2));
        }
        self.credentials.clear();
        Ok(Bytes::new())
    }

    fn calculate(&mut self, command: &Command) -> Handled {
        let truncate = match command.p2() {
            0x00 => false,
            0x01 => true,
            _ => return Err(StatusWord::from_u16(status::SW_INCORRECT_P1P2)),
        };

        let records = parse_records(command)?;
        let name = required_name(&records)?;
        let challenge = required_challenge(&records)?;
        let index = self.position(&name).ok_or(NOT_FOUND)?;

        let credential = &mut self.credentials[index];
        let moving_factor = match credential.kind.oath_type {
            OathType::Totp => challenge,
            OathType::Hotp => {
                let counter = credential.counter;
                credential.counter += 1;
                counter
            }
        };

        let mac = otp::hmac(
            credential.kind.algorithm,
            &credential.key,
            &moving_factor.to_be_bytes(),
        )
        .map_err(|_| WRONG_DATA)?;

        let mut value = BytesMut::with_capacity(1 + mac.len());
        value.put_u8(credential.digits);
        let tag = if truncate {
            value.put_u32(otp::dynamic_truncate(&mac).map_err(|_| WRONG_DATA)?);
            tags::TRUNCATED_RESPONSE
        } else {
            value.put_slice(&mac);
            tags::FULL_RESPONSE
        };

        Ok(Tlv::new(tag, value.freeze()).map_err(|_| WRONG_DATA)?.to_bytes())
    }

    fn calculate_all(&self, command: &Command) -> Handled {
        let challenge = required_challenge(&parse_records(command)?)?;

        let mut records = Vec::with_capacity(self.credentials.len() * 2);
        for credential in &self.credentials {
            records.push(Tlv::name(&credential.name).map_err(|_| WRONG_DATA)?);
            let response = match credential.kind.oath_type {
                OathType::Hotp => Tlv::new(tags::NO_RESPONSE, vec![credential.digits]),
                OathType::Totp => {
                    let mac = otp::hmac(
                        credential.kind.algorithm,
                        &credential.key,
                        &challenge.to_be_bytes(),
                    )
                    .map_err(|_| WRONG_DATA)?;
                    let truncated = otp::dynamic_truncate(&mac).map_err(|_| WRONG_DATA)?;
                    let mut value = vec![credential.digits];
                    value.extend_from_slice(&truncated.to_be_bytes());
                    Tlv::new(tags::TRUNCATED_RESPONSE, value)
                }
            };
            records.push(response.map_err(|_| WRONG_DATA)?);
        }

        Ok(tlv::encode(&records))
    }
}

fn parse_records(command: &Command) -> std::result::Result<Vec<Tlv>, StatusWord> {
    tlv::decode(command.data().unwrap_or_default()).map_err(|_| WRONG_DATA)
}

fn find_record(records: &[Tlv], tag: u8) -> Option<&Tlv> {
    records.iter().find(|r| r.tag() == tag)
}

fn required_name(records: &[Tlv]) -> std::result::Result<String, StatusWord> {
    let name = find_record(records, tags::NAME)
        .ok_or(WRONG_DATA)?
        .to_name()
        .map_err(|_| WRONG_DATA)?;
    if name.is_empty() {
        return Err(WRONG_DATA);
    }
    Ok(name)
}

fn required_challenge(records: &[Tlv]) -> std::result::Result<u64, StatusWord> {
    find_record(records, tags::CHALLENGE)
        .ok_or(WRONG_DATA)?
        .to_u64()
        .map_err(|_| WRONG_DATA)
}

impl CardTransport for VirtualCard {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error> {
        if !self.connected {
            return Err(Error::ConnectionError);
        }
        self.commands.push(Bytes::copy_from_slice(command));
        Ok(self.process(command).into())
    }

    fn reset(&mut self) -> Result<(), Error> {
        if !self.connected {
            return Err(Error::ConnectionError);
        }
        self.selected = false;
        self.pending = Bytes::new();
        Ok(())
    }
}
