//! Offset/limit pagination for read queries
//!
//! The wire-level pagination scheme (keys, cursors) belongs to the host's
//! query server; the engine exposes plain offset/limit.

use serde::{Deserialize, Serialize};

/// Default page size when a request does not specify a limit.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// A page of results to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Entries to skip before the first returned item.
    pub offset: usize,
    /// Maximum entries to return.
    pub limit: usize,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Totals accompanying a returned page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Total entries available across all pages.
    pub total: usize,
}
