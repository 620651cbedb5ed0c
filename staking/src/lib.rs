//! Staking ledger for the bribe pool.
//!
//! Shares are minted 1:1 for every unit of governance asset deposited and
//! burned 1:1 on withdrawal, so the share supply always equals the governance
//! asset held in custody. This crate only tracks balances; reward
//! synchronization around every balance change is driven by `bribe-rewards`.

pub mod error;
pub mod ledger;

pub use error::StakingError;
pub use ledger::ShareLedger;
