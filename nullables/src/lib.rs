//! Nullable infrastructure for deterministic testing.
//!
//! Everything the pool consumes from outside (time, the two asset ledgers,
//! the governance registry) sits behind a trait or an explicit argument.
//! This crate provides in-memory implementations that:
//! - Return deterministic values
//! - Can be steered programmatically (mint balances, set proposal states,
//!   inject transfer failures)
//! - Never touch the filesystem or network
//!
//! Usage: hand clones of the nullables to the pool and keep the first handle in
//! the test to drive and inspect them.

pub mod clock;
pub mod events;
pub mod ledger;
pub mod registry;

pub use clock::NullClock;
pub use events::EventRecorder;
pub use ledger::NullAssetLedger;
pub use registry::{NullRegistry, RecordedVote};
