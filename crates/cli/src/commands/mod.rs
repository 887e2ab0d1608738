use clap::Subcommand;

mod card;
mod codes;
mod credentials;

pub use card::*;
pub use codes::*;
pub use credentials::*;

use crate::utils::AlgorithmArg;

/// Define subcommands for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// List available readers
    Readers,

    /// Select the OATH application and show info
    Info,

    /// List stored credentials
    List,

    /// Store a credential
    Put {
        /// Credential name, e.g. "issuer:account"
        #[arg(required = true)]
        name: String,

        /// Secret as hex (a random secret is generated if omitted)
        #[arg(long)]
        secret: Option<String>,

        /// Store a counter based (HOTP) credential instead of TOTP
        #[arg(long)]
        hotp: bool,

        /// HMAC hash algorithm
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Sha256)]
        algorithm: AlgorithmArg,

        /// Number of digits (6-8)
        #[arg(long, default_value_t = 6)]
        digits: u8,

        /// Initial HOTP counter
        #[arg(long, default_value_t = 0)]
        counter: u32,
    },

    /// Calculate the code of one credential
    Calculate {
        /// Credential name
        #[arg(required = true)]
        name: String,

        /// Unix timestamp (defaults to now)
        #[arg(long)]
        timestamp: Option<u64>,
    },

    /// Calculate the codes of all credentials
    CalculateAll {
        /// Unix timestamp (defaults to now)
        #[arg(long)]
        timestamp: Option<u64>,
    },

    /// Delete a credential
    Delete {
        /// Credential name
        #[arg(required = true)]
        name: String,
    },

    /// Remove every credential from the applet
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        force: bool,
    },
}
