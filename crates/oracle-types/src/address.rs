//! Validator and account address newtypes
//!
//! Addresses are opaque strings assigned by the host chain. The oracle only
//! needs equality (lookups), a total order (deterministic tie-breaking in
//! ballot tallies) and display. Two distinct newtypes keep operator
//! addresses (staking identity) from being confused with account addresses
//! (signers and feeders).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validator operator address (staking identity).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorAddr(String);

impl ValidatorAddr {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The account address controlled by the same key as this operator.
    ///
    /// Host chains derive both from one key pair; for the oracle the string
    /// identity is sufficient.
    pub fn account(&self) -> AccountAddr {
        AccountAddr::new(self.0.clone())
    }
}

impl fmt::Display for ValidatorAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ValidatorAddr {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Account address (transaction signer, feeder delegate).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddr(String);

impl AccountAddr {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountAddr {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
