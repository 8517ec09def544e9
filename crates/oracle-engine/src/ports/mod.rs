//! Ports for the oracle engine
//!
//! Inbound: the API the host's transaction, block-lifecycle, governance and
//! query collaborators drive. Outbound: the collaborators the engine drives.

mod inbound;
mod outbound;

pub use inbound::OracleApi;
pub use outbound::{BondedValidator, EventBus, StakingKeeper};
