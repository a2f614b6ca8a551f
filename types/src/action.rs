//! Action names used as the third component of a capability grant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The name of a privileged action (e.g. `new-vote`).
///
/// Printable ASCII, non-empty, at most [`ActionName::MAX_LEN`] bytes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionName(String);

impl ActionName {
    pub const MAX_LEN: usize = 128;

    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        let valid = !s.is_empty()
            && s.len() <= Self::MAX_LEN
            && s.bytes().all(|b| b.is_ascii_graphic());
        if !valid {
            return Err(TypesError::InvalidAction(s));
        }
        Ok(Self(s))
    }

    /// Create an action name from a string known to be valid.
    ///
    /// # Panics
    /// Panics on an invalid name.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(action) => action,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActionName {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ActionName {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ActionName> for String {
    fn from(a: ActionName) -> Self {
        a.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_kebab_case_names() {
        assert_eq!(ActionName::parse("new-task-vote").unwrap().as_str(), "new-task-vote");
    }

    #[test]
    fn rejects_empty_non_ascii_and_oversized() {
        assert!(ActionName::parse("").is_err());
        assert!(ActionName::parse("new vote").is_err());
        assert!(ActionName::parse("vöte").is_err());
        assert!(ActionName::parse("a".repeat(ActionName::MAX_LEN + 1)).is_err());
        assert!(ActionName::parse("a".repeat(ActionName::MAX_LEN)).is_ok());
    }
}
