//! Response chaining for the OATH applet
//!
//! The applet answers large requests with `61xx` and hands out each further
//! chunk on a bare `00 C0 00 00` GET RESPONSE. The stock nexum processor
//! appends an Le byte to that command, so the OATH session installs this one
//! in its [`CardExecutor`] pipeline instead.

use bytes::{Bytes, BytesMut};
use nexum_apdu_core::prelude::*;
use nexum_apdu_core::processor::TransportAdapterTrait;
use tracing::{debug, trace};

use crate::constants::{CLA_OATH, ins};

/// Default upper bound on continuation fetches for a single command
pub const DEFAULT_MAX_CHAIN: usize = 64;

/// Command processor following `61xx` continuations until a terminal status
#[derive(Debug, Clone, Copy)]
pub struct GetResponseChain {
    /// Maximum number of GET RESPONSE commands per logical exchange
    max_chain: usize,
}

impl GetResponseChain {
    /// Create a processor with the given continuation fetch limit
    pub const fn new(max_chain: usize) -> Self {
        Self { max_chain }
    }

    /// Continuation fetch limit
    pub const fn max_chain(&self) -> usize {
        self.max_chain
    }
}

impl Default for GetResponseChain {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHAIN)
    }
}

impl CommandProcessor for GetResponseChain {
    fn process_command_with_adapter(
        &self,
        command: &Command,
        adapter: &mut dyn TransportAdapterTrait,
    ) -> Result<Response, Error> {
        let (first, mut status) = exchange(adapter, &command.to_bytes())?;
        if !status.is_more_data_available() {
            return Ok(assemble(first, status));
        }

        let get_response = Command::new(CLA_OATH, ins::GET_RESPONSE, 0x00, 0x00).to_bytes();
        let mut payload = BytesMut::from(first.as_ref());
        let mut chain_count = 0;

        while let Some(remaining) = status.remaining_bytes() {
            if chain_count == self.max_chain {
                debug!(max_chain = self.max_chain, "Response chain limit reached");
                return Err(Error::ChainLimitExceeded);
            }
            chain_count += 1;

            debug!(remaining, chain_count, "Fetching remaining response data");
            let (chunk, next) = exchange(adapter, &get_response)?;
            payload.extend_from_slice(&chunk);
            status = next;
        }

        trace!(
            total_len = payload.len(),
            chain_count,
            "Reassembled chained response"
        );
        Ok(assemble(payload.freeze(), status))
    }
}

/// Send one APDU and split the reply into payload and status word
fn exchange(
    adapter: &mut dyn TransportAdapterTrait,
    command: &[u8],
) -> Result<(Bytes, StatusWord), Error> {
    let mut payload = adapter.transmit_raw(command)?;
    if payload.len() < 2 {
        return Err(Error::ParseError("Response shorter than a status word"));
    }
    let trailer = payload.split_off(payload.len() - 2);
    Ok((payload, StatusWord::new(trailer[0], trailer[1])))
}

fn assemble(payload: Bytes, status: StatusWord) -> Response {
    let payload = (!payload.is_empty()).then_some(payload);
    Response::new(payload, status)
}
