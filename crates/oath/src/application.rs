//! OATH application implementation
//!
//! [`Oath`] maps the credential store operations onto APDU exchanges and
//! tracks whether the applet is currently selected.

use nexum_apdu_core::prelude::*;
use tracing::{debug, instrument, warn};

use crate::commands::{
    CalculateAllCommand, CalculateCommand, DeleteCommand, ListCommand, OathCommand, PutCommand,
    ResetCommand, SelectCommand,
};
use crate::otp;
use crate::processor::GetResponseChain;
use crate::types::{ApplicationInfo, CalculatedCodes, CredentialList};
use crate::{Error, Result, StatusError};

/// Session state of an applet connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No successful SELECT yet, or the connection was lost
    #[default]
    Unselected,
    /// The applet answered SELECT with this info
    Selected(ApplicationInfo),
}

/// OATH credential store on a smart card
#[derive(Debug)]
pub struct Oath<T: CardTransport> {
    /// Executor driving the transport
    executor: CardExecutor<T>,
    /// Current session state
    state: SessionState,
}

impl<T: CardTransport> Oath<T> {
    /// Create a new, unselected session over `transport`
    ///
    /// The executor gets a [`GetResponseChain`] processor with the default
    /// continuation limit.
    pub fn new(transport: T) -> Self {
        let mut executor = CardExecutor::new(transport);
        executor.add_processor(Box::new(GetResponseChain::default()));
        Self::with_executor(executor)
    }

    /// Create a session over a preconfigured executor
    ///
    /// The pipeline must reassemble `61xx` chains for LIST and CALCULATE ALL
    /// to see complete payloads.
    pub const fn with_executor(executor: CardExecutor<T>) -> Self {
        Self {
            executor,
            state: SessionState::Unselected,
        }
    }

    /// Get access to the transport
    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// Get mutable access to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        self.executor.transport_mut()
    }

    /// Current session state
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether the applet is selected
    pub const fn is_selected(&self) -> bool {
        matches!(self.state, SessionState::Selected(_))
    }

    /// Application info from the last successful SELECT
    pub const fn application_info(&self) -> Option<&ApplicationInfo> {
        match &self.state {
            SessionState::Selected(info) => Some(info),
            SessionState::Unselected => None,
        }
    }

    /// Select the OATH applet
    ///
    /// Replaces the application info of an earlier selection. On failure the
    /// session is left unselected.
    #[instrument(level = "debug", skip(self))]
    pub fn select(&mut self) -> Result<ApplicationInfo> {
        self.state = SessionState::Unselected;
        let info = self.execute(&SelectCommand)?;

        debug!(version = %info.version, device_id = %info.device_id(), "Selected OATH applet");
        if info.has_access_code() {
            warn!("Access code is set; operations may be refused until it is validated");
        }

        self.state = SessionState::Selected(info.clone());
        Ok(info)
    }

    /// List stored credentials in card order
    #[instrument(level = "debug", skip(self))]
    pub fn list(&mut self) -> Result<CredentialList> {
        let credentials = self.run(&ListCommand)?;
        debug!(count = credentials.len(), "Listed credentials");
        Ok(credentials)
    }

    /// Store a credential
    #[instrument(level = "debug", skip_all, fields(name = credential.name()))]
    pub fn put(&mut self, credential: &PutCommand) -> Result<bool> {
        if credential.is_generated() {
            debug!("Storing credential with a generated secret");
        }
        self.run(credential)
    }

    /// Calculate the code of `name` at a Unix timestamp
    pub fn calculate(&mut self, name: &str, timestamp: u64) -> Result<String> {
        self.calculate_with(name, timestamp, true)
    }

    /// Calculate the code of `name`, choosing card or client side truncation
    ///
    /// With `truncate` unset the card returns the full MAC and the code is
    /// truncated here.
    #[instrument(level = "debug", skip(self))]
    pub fn calculate_with(&mut self, name: &str, timestamp: u64, truncate: bool) -> Result<String> {
        let command =
            CalculateCommand::new(name, otp::time_step(timestamp)).with_truncate(truncate);
        self.run(&command)
    }

    /// Calculate codes for all credentials at a Unix timestamp
    ///
    /// HOTP credentials, and any the card withholds, come back without a
    /// code and have to be calculated one at a time.
    #[instrument(level = "debug", skip(self))]
    pub fn calculate_all(&mut self, timestamp: u64) -> Result<CalculatedCodes> {
        let codes = self.run(&CalculateAllCommand::new(otp::time_step(timestamp)))?;
        debug!(count = codes.len(), "Calculated codes");
        Ok(codes)
    }

    /// Delete a credential
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        self.run(&DeleteCommand::new(name))
    }

    /// Wipe every credential from the applet
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> Result<bool> {
        self.run(&ResetCommand)
    }

    fn run<C: OathCommand>(&mut self, command: &C) -> Result<C::Output> {
        if !self.is_selected() {
            return Err(Error::NotSelected);
        }

        let result = self.execute(command);
        if let Err(e) = &result {
            if e.is_transport() {
                warn!(error = %e, "Transport failure, session is no longer selected");
                self.state = SessionState::Unselected;
            }
        }
        result
    }

    /// Send a typed command and decode the payload of a 90 00 response
    fn execute<C: OathCommand>(&mut self, command: &C) -> Result<C::Output> {
        let response = self.executor.transmit(&command.to_command()?)?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "{}", status.description());
            return Err(StatusError::new(status).into());
        }
        command.parse_response(response.payload().clone().unwrap_or_default())
    }
}
