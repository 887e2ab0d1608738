use std::fmt;

use derive_more::{Deref, IntoIterator};

use super::CredentialKind;

/// A credential as reported by LIST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Unique credential name
    pub name: String,
    /// Type and hash algorithm
    pub kind: CredentialKind,
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Credentials in the order the card reported them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
pub struct CredentialList(#[into_iterator(owned, ref)] Vec<Credential>);

impl CredentialList {
    /// Look up a credential by name
    pub fn get(&self, name: &str) -> Option<&Credential> {
        self.0.iter().find(|c| c.name == name)
    }

    /// Whether a credential with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Credential names, in card order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.name.as_str())
    }
}

impl From<Vec<Credential>> for CredentialList {
    fn from(credentials: Vec<Credential>) -> Self {
        Self(credentials)
    }
}

impl FromIterator<Credential> for CredentialList {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One CALCULATE ALL entry
///
/// `code` is `None` when the card withheld the code, which happens for HOTP
/// credentials and for credentials that require touch. Such codes have to be
/// requested one at a time with CALCULATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatedCode {
    /// Credential name
    pub name: String,
    /// Zero padded decimal code
    pub code: Option<String>,
}

impl fmt::Display for CalculatedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", self.name, code),
            None => write!(f, "{}: -", self.name),
        }
    }
}

/// Codes returned by CALCULATE ALL, in card order
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
pub struct CalculatedCodes(#[into_iterator(owned, ref)] Vec<CalculatedCode>);

impl CalculatedCodes {
    /// Look up the entry for a credential
    pub fn get(&self, name: &str) -> Option<&CalculatedCode> {
        self.0.iter().find(|c| c.name == name)
    }

    /// Code for a credential, if the card released one
    pub fn code(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|c| c.code.as_deref())
    }
}

impl FromIterator<CalculatedCode> for CalculatedCodes {
    fn from_iter<I: IntoIterator<Item = CalculatedCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
