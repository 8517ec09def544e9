//! Domain layer for the oracle engine
//!
//! Pure types and algorithms: no I/O, no locks, no collaborator calls.
//! Everything here is deterministic given its inputs.

mod ballot;
mod denoms;
mod error;
mod history;
mod params;
mod rates;
mod report;
mod slashing;
mod twap;
mod vote;

pub use ballot::*;
pub use denoms::*;
pub use error::*;
pub use history::*;
pub use params::*;
pub use rates::*;
pub use report::*;
pub use slashing::*;
pub use twap::*;
pub use vote::*;
