//! Principal type: the identity of an account or a contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// An account or contract identity.
///
/// Standard principals are a bare identifier (`ST1PQHQ...`). Contract
/// principals are `<deployer>.<contract-name>`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Separator between a deployer and a contract name.
    pub const CONTRACT_SEPARATOR: char = '.';

    /// Create a principal from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed principal. Use
    /// [`Principal::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(principal) => principal,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parse and validate a principal.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if !Self::is_well_formed(&s) {
            return Err(TypesError::InvalidPrincipal(s));
        }
        Ok(Self(s))
    }

    /// Build the contract principal `<deployer>.<name>`.
    pub fn contract(deployer: &Principal, name: &str) -> Result<Self, TypesError> {
        if deployer.is_contract() {
            return Err(TypesError::InvalidPrincipal(format!("{deployer}.{name}")));
        }
        Self::parse(format!("{}{}{}", deployer.0, Self::CONTRACT_SEPARATOR, name))
    }

    /// Return the raw principal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a contract principal.
    pub fn is_contract(&self) -> bool {
        self.0.contains(Self::CONTRACT_SEPARATOR)
    }

    /// The standard principal part (the deployer for contract principals).
    pub fn address(&self) -> &str {
        self.0
            .split(Self::CONTRACT_SEPARATOR)
            .next()
            .unwrap_or(&self.0)
    }

    fn is_well_formed(s: &str) -> bool {
        let mut parts = s.split(Self::CONTRACT_SEPARATOR);
        let address = parts.next().unwrap_or_default();
        let name = parts.next();
        if parts.next().is_some() || !Self::is_identifier(address) {
            return false;
        }
        name.map_or(true, Self::is_identifier)
    }

    fn is_identifier(part: &str) -> bool {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Principal {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Principal {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}
