//! # Shared Oracle Types
//!
//! Primitive types that cross the oracle engine boundary: addresses,
//! denomination identifiers, the commit-reveal vote hash, and pagination.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type the engine shares with its host
//!   (submission handlers, query servers, governance hooks) lives here.
//! - **Opaque addresses**: validator operator and account addresses are
//!   ordered opaque strings; bech32 encoding and key handling belong to the
//!   host chain, not the oracle.
//! - **Determinism**: all types have a total order so iteration and
//!   tie-breaking are identical on every node.

pub mod address;
pub mod denom;
pub mod pagination;
pub mod vote_hash;

pub use address::{AccountAddr, ValidatorAddr};
pub use denom::Denom;
pub use pagination::{PageRequest, PageResponse};
pub use vote_hash::{VoteHash, VoteHashError, VOTE_HASH_LEN};
