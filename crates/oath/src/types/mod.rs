mod algorithm;
mod application_info;
mod credential;
mod version;

pub use algorithm::{CredentialKind, HashAlgorithm, OathType};
pub use application_info::ApplicationInfo;
pub use credential::{CalculatedCode, CalculatedCodes, Credential, CredentialList};
pub use version::Version;
