//! Commit-reveal vote hash
//!
//! A prevote commits to a later reveal via a truncated digest over the
//! canonical `salt:rates:voter` string. The hash is 20 bytes (the truncated
//! SHA-256 convention of Tendermint-family chains) and is transported as hex,
//! compared case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length in bytes of the truncated commitment digest.
pub const VOTE_HASH_LEN: usize = 20;

/// Errors produced when parsing a hex-encoded vote hash.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VoteHashError {
    #[error("Invalid vote hash length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
}

/// Truncated digest binding a prevote to its future reveal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteHash([u8; VOTE_HASH_LEN]);

impl VoteHash {
    pub fn from_bytes(bytes: [u8; VOTE_HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; VOTE_HASH_LEN] {
        &self.0
    }

    /// Parse a hex string (any case) into a vote hash.
    pub fn from_hex(s: &str) -> Result<Self, VoteHashError> {
        let raw = hex::decode(s.trim()).map_err(|e| VoteHashError::InvalidHex(e.to_string()))?;
        let bytes: [u8; VOTE_HASH_LEN] =
            raw.try_into().map_err(|v: Vec<u8>| VoteHashError::InvalidLength {
                expected: VOTE_HASH_LEN,
                actual: v.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for VoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for VoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoteHash({})", self.to_hex())
    }
}
