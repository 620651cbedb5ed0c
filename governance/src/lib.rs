//! Vote delegation for the bribe pool.
//!
//! The pool holds aggregated voting power in an external governance
//! registry. For each proposal, that power is delegated to whoever holds the
//! highest bid in the proposal's auction once bidding has closed. The gate
//! checks identity and timing, then forwards a single vote to the registry on
//! the pool's behalf.
//!
//! Key principle: the pool never counts votes itself. Voting weight and
//! duplicate-vote handling belong to the registry.

pub mod delegation;
pub mod error;
pub mod registry;

pub use delegation::{VoteGate, VoteReceipt};
pub use error::{GovernanceError, RegistryError};
pub use registry::GovernanceRegistry;
