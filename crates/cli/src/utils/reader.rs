use anyhow::anyhow;
use nexum_apdu_transport_pcsc::{PcscDeviceManager, PcscError, PcscReader};

/// List all available readers
pub fn list_readers(manager: &PcscDeviceManager) -> anyhow::Result<()> {
    let readers = match manager.list_readers() {
        Ok(readers) => readers,
        Err(PcscError::NoReadersAvailable) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if readers.is_empty() {
        println!("No readers found!");
        return Ok(());
    }

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        let status = if reader.has_card() {
            "card present"
        } else {
            "no card"
        };
        println!("{}. {} ({})", i + 1, reader.name(), status);
    }

    Ok(())
}

/// Find a reader with a specific name
pub fn find_reader_by_name(
    manager: &PcscDeviceManager,
    reader_name: &str,
) -> anyhow::Result<PcscReader> {
    manager
        .list_readers()?
        .into_iter()
        .find(|r| r.name() == reader_name)
        .ok_or_else(|| anyhow!("Reader '{}' not found", reader_name))
}

/// Find a reader with a card inserted
pub fn find_reader_with_card(manager: &PcscDeviceManager) -> anyhow::Result<PcscReader> {
    manager
        .list_readers()?
        .into_iter()
        .find(|r| r.has_card())
        .ok_or_else(|| anyhow!("No card found in any reader!"))
}
