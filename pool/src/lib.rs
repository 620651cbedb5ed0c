//! The bribe pool.
//!
//! Stakers deposit a governance asset and receive pool shares 1:1. Bidders
//! compete in a per-proposal English auction for the right to direct the
//! pool's voting power on that proposal; every accepted bid is injected as
//! proceeds and attributed pro rata to the shareholders of that moment.
//!
//! [`BribePool`] composes the staking ledger, the reward engine, the auction
//! book and the vote gate with the external asset ledgers and governance
//! registry. Every public operation is one serialized state transition: the
//! bookkeeping is applied first, outbound transfers last, and any failure
//! rolls the bookkeeping back.

pub mod config;
pub mod error;
pub mod event;
pub mod pool;
pub mod state;
mod undo;

pub use config::PoolConfig;
pub use error::PoolError;
pub use event::{EventBus, PoolEvent};
pub use pool::{BribePool, SharedLedger, SharedRegistry};
pub use state::PoolState;
