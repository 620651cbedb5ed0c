//! Abstract asset ledger consumed by the bribe pool.
//!
//! The pool holds two ledgers: one for the governance asset that stakers
//! deposit, one for the bid asset that bidders pay in and stakers are
//! rewarded in. Ledgers are external collaborators; every transfer is
//! assumed atomic. The rest of the workspace depends only on the trait.

pub mod asset;
pub mod error;

pub use asset::{AssetKind, AssetLedger};
pub use error::LedgerError;
