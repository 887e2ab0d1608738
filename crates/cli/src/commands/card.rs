//! Applet level commands

use tracing::info;

use crate::utils::session::{self, CliTransport};
use crate::utils::{confirm, display};

/// Select the applet and show its info
pub fn info_command(transport: CliTransport) -> anyhow::Result<()> {
    let oath = session::initialize_oath(transport)?;
    if let Some(app_info) = oath.application_info() {
        println!("{app_info}");
    }
    Ok(())
}

/// Wipe the applet
pub fn reset_command(transport: CliTransport, force: bool) -> anyhow::Result<()> {
    if !force && !confirm("This removes every OATH credential. Continue?")? {
        info!("Reset cancelled");
        return Ok(());
    }

    let mut oath = session::initialize_oath(transport)?;
    oath.reset()?;
    println!("{}", display::success("OATH application reset"));
    Ok(())
}
