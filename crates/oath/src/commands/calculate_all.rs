use bytes::Bytes;
use nexum_apdu_core::Command;
use tracing::trace;

use crate::constants::{ins, tags};
use crate::tlv::{Tlv, TlvIter};
use crate::types::{CalculatedCode, CalculatedCodes};
use crate::{ProtocolError, Result};

use super::calculate::code_from_truncated;
use super::{OathCommand, tlv_command};

/// CALCULATE ALL codes for one TOTP moving factor
#[derive(Debug, Clone, Copy)]
pub struct CalculateAllCommand {
    challenge: u64,
}

impl CalculateAllCommand {
    /// Create a CALCULATE ALL command for the given moving factor
    pub const fn new(challenge: u64) -> Self {
        Self { challenge }
    }
}

impl OathCommand for CalculateAllCommand {
    type Output = CalculatedCodes;

    fn to_command(&self) -> Result<Command> {
        tlv_command(
            ins::CALCULATE_ALL,
            0x00,
            0x01,
            &[Tlv::challenge(self.challenge)],
        )
    }

    fn parse_response(&self, payload: Bytes) -> Result<CalculatedCodes> {
        let mut records = TlvIter::new(&payload);
        let mut codes = Vec::new();

        while let Some(name) = records.next() {
            let name = name?.expect_tag(tags::NAME)?.to_name()?;
            let response = records.next().ok_or(ProtocolError::TruncatedTlv)??;

            let code = match response.tag() {
                tags::TRUNCATED_RESPONSE => Some(code_from_truncated(response.value())?),
                tags::NO_RESPONSE | tags::TOUCH => {
                    trace!(name = %name, tag = response.tag(), "No code released");
                    None
                }
                actual => {
                    return Err(ProtocolError::UnexpectedTag {
                        expected: tags::TRUNCATED_RESPONSE,
                        actual,
                    }
                    .into());
                }
            };

            codes.push(CalculatedCode { name, code });
        }

        Ok(codes.into_iter().collect())
    }
}
