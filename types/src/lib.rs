//! Fundamental types for the bribe pool.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identities, proposal identifiers and states, timestamps, and the
//! tunable pool parameters.

pub mod address;
pub mod error;
pub mod params;
pub mod proposal;
pub mod time;

pub use address::AccountId;
pub use error::TypesError;
pub use params::{PoolParams, ProceedsPolicy, DEFAULT_AUCTION_DURATION_SECS, DEFAULT_REWARD_PRECISION};
pub use proposal::{ProposalId, ProposalState};
pub use time::Timestamp;
