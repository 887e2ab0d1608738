//! Credential management commands

use anyhow::Context as _;
use nexum_oath::{OathType, PutCommand};
use tracing::debug;

use crate::utils::session::{self, CliTransport};
use crate::utils::{AlgorithmArg, display};

/// List stored credentials
pub fn list_command(transport: CliTransport) -> anyhow::Result<()> {
    let mut oath = session::initialize_oath(transport)?;
    let credentials = oath.list()?;

    if credentials.is_empty() {
        println!("No credentials stored");
        return Ok(());
    }

    println!("{}", display::section_title("Credentials"));
    for credential in credentials.iter() {
        println!("  {credential}");
    }
    Ok(())
}

/// Options for storing a credential
#[derive(Debug)]
pub struct PutOptions<'a> {
    pub name: &'a str,
    pub secret: Option<&'a str>,
    pub hotp: bool,
    pub algorithm: AlgorithmArg,
    pub digits: u8,
    pub counter: u32,
}

/// Store a credential
pub fn put_command(transport: CliTransport, options: PutOptions<'_>) -> anyhow::Result<()> {
    let mut command = PutCommand::new(options.name)
        .with_algorithm(options.algorithm.into())
        .with_digits(options.digits)
        .with_counter(options.counter);
    if options.hotp {
        command = command.with_type(OathType::Hotp);
    }
    if let Some(secret) = options.secret {
        let secret = hex::decode(secret.trim_start_matches("0x"))
            .context("Secret must be hex encoded")?;
        command = command.with_secret(&secret);
    }

    let mut oath = session::initialize_oath(transport)?;
    debug!(kind = %command.kind(), "Storing credential");
    oath.put(&command)?;

    println!("{}", display::success(&format!("Stored {}", options.name)));
    if command.is_generated() {
        println!(
            "{}",
            display::key_value_box(
                "Generated secret",
                vec![("Secret", hex::encode(command.secret()))]
            )
        );
        println!(
            "{}",
            display::warning("Save this secret, it cannot be read back from the card")
        );
    }
    Ok(())
}

/// Delete a credential
pub fn delete_command(transport: CliTransport, name: &str) -> anyhow::Result<()> {
    let mut oath = session::initialize_oath(transport)?;
    oath.delete(name)
        .with_context(|| format!("Failed to delete {name}"))?;
    println!("{}", display::success(&format!("Deleted {name}")));
    Ok(())
}
