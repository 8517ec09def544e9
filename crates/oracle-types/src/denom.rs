//! Denomination identifier
//!
//! Denoms name the asset being priced in the reference unit (e.g. `JUNO`,
//! `ATOM`). Submitters and query clients send mixed case; the canonical
//! on-chain form is uppercase, so `Denom::new` normalizes on entry and every
//! store keys by the canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical (uppercase) denomination identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denom(String);

impl Denom {
    /// Create a denom, normalizing to the canonical uppercase form.
    pub fn new(denom: impl AsRef<str>) -> Self {
        Self(denom.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Denom {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denom_is_uppercased() {
        assert_eq!(Denom::new("juno").as_str(), "JUNO");
        assert_eq!(Denom::new(" Atom "), Denom::new("ATOM"));
    }

    #[test]
    fn test_denom_equality_is_case_insensitive_at_construction() {
        assert_eq!(Denom::new("juno"), Denom::new("JUNO"));
    }
}
