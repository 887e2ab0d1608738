use nexum_apdu_core::{Bytes, CardTransport, Error};
use nexum_apdu_transport_pcsc::{PcscConfig, PcscDeviceManager, PcscTransport};
use nexum_oath::Oath;
use nexum_oath::virtual_card::VirtualCard;
use tracing::{info, warn};

use super::reader;

/// Transport chosen at runtime
#[derive(Debug)]
pub enum CliTransport {
    /// A PC/SC reader
    Pcsc(PcscTransport),
    /// The in-memory applet, discarded when the process exits
    Virtual(VirtualCard),
}

impl CardTransport for CliTransport {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error> {
        match self {
            Self::Pcsc(transport) => transport.transmit_raw(command),
            Self::Virtual(card) => card.transmit_raw(command),
        }
    }

    fn reset(&mut self) -> Result<(), Error> {
        match self {
            Self::Pcsc(transport) => transport.reset(),
            Self::Virtual(card) => card.reset(),
        }
    }
}

/// Open a transport to the requested reader, or to the virtual applet
pub fn open_transport(reader_name: Option<&str>, use_virtual: bool) -> anyhow::Result<CliTransport> {
    if use_virtual {
        warn!("Using the in-memory virtual applet; credentials are lost on exit");
        return Ok(CliTransport::Virtual(VirtualCard::new()));
    }

    let manager = PcscDeviceManager::new()?;
    let reader = match reader_name {
        Some(name) => reader::find_reader_by_name(&manager, name)?,
        None => reader::find_reader_with_card(&manager)?,
    };

    info!("Using reader: {}", reader.name());
    let transport = manager.open_reader_with_config(reader.name(), PcscConfig::default())?;
    Ok(CliTransport::Pcsc(transport))
}

/// Initialize an OATH session and select the applet
pub fn initialize_oath(transport: CliTransport) -> anyhow::Result<Oath<CliTransport>> {
    let mut oath = Oath::new(transport);

    info!("Selecting OATH application...");
    let app_info = oath.select()?;
    info!(version = %app_info.version, "OATH application selected");

    Ok(oath)
}
