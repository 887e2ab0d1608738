//! Code calculation commands

use anyhow::Context as _;
use nexum_oath::otp;

use crate::utils::display;
use crate::utils::session::{self, CliTransport};

/// Calculate the code of one credential
pub fn calculate_command(
    transport: CliTransport,
    name: &str,
    timestamp: Option<u64>,
) -> anyhow::Result<()> {
    let timestamp = timestamp.unwrap_or_else(otp::unix_now);
    let mut oath = session::initialize_oath(transport)?;

    let code = oath
        .calculate(name, timestamp)
        .with_context(|| format!("Failed to calculate {name}"))?;
    println!("{}: {}", name, display::code(Some(&code)));
    Ok(())
}

/// Calculate the codes of all credentials
pub fn calculate_all_command(transport: CliTransport, timestamp: Option<u64>) -> anyhow::Result<()> {
    let timestamp = timestamp.unwrap_or_else(otp::unix_now);
    let mut oath = session::initialize_oath(transport)?;

    let codes = oath.calculate_all(timestamp)?;
    if codes.is_empty() {
        println!("No credentials stored");
        return Ok(());
    }

    println!("{}", display::section_title("Codes"));
    for entry in codes.iter() {
        println!("  {}: {}", entry.name, display::code(entry.code.as_deref()));
    }
    Ok(())
}
