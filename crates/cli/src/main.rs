use clap::Parser;
use nexum_apdu_transport_pcsc::PcscDeviceManager;

mod commands;
mod utils;

use commands::*;
use utils::{reader, session};

#[derive(Parser)]
#[command(version, about = "OATH CLI for HOTP/TOTP credentials on smart cards")]
struct Cli {
    /// Optional reader name to use (will auto-detect if not specified)
    #[arg(short, long, conflicts_with = "virtual_card")]
    reader: Option<String>,

    /// Use an in-memory virtual applet instead of a reader. It starts empty
    /// and its credentials are discarded when the command exits
    #[arg(long = "virtual")]
    virtual_card: bool,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Commands::Readers = cli.command {
        let manager = PcscDeviceManager::new()?;
        return reader::list_readers(&manager);
    }

    let transport = session::open_transport(cli.reader.as_deref(), cli.virtual_card)?;

    match cli.command {
        Commands::Readers => unreachable!(), // Already handled above
        Commands::Info => info_command(transport),
        Commands::List => list_command(transport),
        Commands::Put {
            name,
            secret,
            hotp,
            algorithm,
            digits,
            counter,
        } => put_command(
            transport,
            PutOptions {
                name: &name,
                secret: secret.as_deref(),
                hotp,
                algorithm,
                digits,
                counter,
            },
        ),
        Commands::Calculate { name, timestamp } => calculate_command(transport, &name, timestamp),
        Commands::CalculateAll { timestamp } => calculate_all_command(transport, timestamp),
        Commands::Delete { name } => delete_command(transport, &name),
        Commands::Reset { force } => reset_command(transport, force),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(true)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_virtual_flag_help_mentions_lifetime() {
        let command = Cli::command();
        let flag = command
            .get_arguments()
            .find(|arg| arg.get_id() == "virtual_card")
            .unwrap();
        let help = flag.get_help().unwrap().to_string();
        assert!(help.contains("in-memory"));
        assert!(help.contains("discarded"));
    }

    #[test]
    fn test_virtual_conflicts_with_reader() {
        assert!(Cli::try_parse_from(["oath", "--virtual", "list"]).is_ok());
        assert!(Cli::try_parse_from(["oath", "--virtual", "-r", "Reader 0", "list"]).is_err());
    }
}
