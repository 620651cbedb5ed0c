//! Participant identity.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a participant: a staker, a bidder, or the pool itself.
///
/// The pool never interprets the contents; ledgers and the governance
/// registry key their records by the same string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account id from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a valid identity (see [`AccountId::parse`]).
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(Self::is_well_formed(&s), "account id must be non-empty without whitespace");
        Self(s)
    }

    /// Fallible constructor for identities coming from untrusted input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if Self::is_well_formed(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypesError::InvalidAccount(raw.to_string()))
        }
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_well_formed(s: &str) -> bool {
        !s.is_empty() && !s.chars().any(char::is_whitespace)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert!(AccountId::parse("").is_err());
        assert!(AccountId::parse("ali ce").is_err());
        assert_eq!(AccountId::parse("alice").unwrap().as_str(), "alice");
    }

    #[test]
    #[should_panic]
    fn new_panics_on_empty() {
        let _ = AccountId::new("");
    }
}
