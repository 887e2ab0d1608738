//! Client for the OATH smart-card applet
//!
//! The applet stores HOTP and TOTP credentials and computes codes on demand.
//! This crate provides:
//!
//! - `61xx` response chaining for the nexum [`CardExecutor`] ([`processor`])
//! - the simple TLV encoding used inside OATH payloads ([`tlv`])
//! - the RFC 4226 / RFC 6238 code derivation ([`otp`])
//! - typed commands for every applet instruction ([`commands`])
//! - the [`Oath`] session tying them together over any nexum [`CardTransport`]
//!
//! ```no_run
//! # fn run<T: nexum_oath::CardTransport>(transport: T) -> nexum_oath::Result<()> {
//! use nexum_oath::{Oath, PutCommand};
//!
//! let mut oath = Oath::new(transport);
//! oath.select()?;
//! oath.put(&PutCommand::new("example").with_secret(b"12345678901234567890"))?;
//! let code = oath.calculate("example", nexum_oath::otp::unix_now())?;
//! println!("{code}");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

mod application;
pub mod commands;
pub mod constants;
mod error;
pub mod otp;
pub mod processor;
mod status;
pub mod tlv;
pub mod types;

#[cfg(any(test, feature = "virtual-card"))]
pub mod virtual_card;

pub use nexum_apdu_core::card::CardExecutor;
pub use nexum_apdu_core::{CardTransport, Command, Response, StatusWord};

pub use application::{Oath, SessionState};
pub use commands::{
    CalculateAllCommand, CalculateCommand, DeleteCommand, ListCommand, OathCommand, PutCommand,
    ResetCommand, SelectCommand,
};
pub use error::{Error, ProtocolError, Result, StatusError};
pub use processor::{DEFAULT_MAX_CHAIN, GetResponseChain};
pub use status::StatusKind;
pub use types::{
    ApplicationInfo, CalculatedCode, CalculatedCodes, Credential, CredentialKind, CredentialList,
    HashAlgorithm, OathType, Version,
};
