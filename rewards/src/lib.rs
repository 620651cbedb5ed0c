//! Reward accounting: deferred pro-rata distribution of auction proceeds.
//!
//! `reward(a) = pending(a) + (shares(a) × acc − debt(a) + dust(a)) / PRECISION`
//!
//! A proceeds injection only moves the global accumulator, O(1) regardless
//! of the number of stakers. Each account keeps a checkpoint (`debt`) of the
//! scaled value it has already been credited for, and the sub-unit remainder
//! of the last credit is carried instead of dropped, so an account is never
//! credited more than its exact pro-rata share. The checkpoint must be
//! brought up to date *before* the account's share balance changes and reset
//! *after* it, which is what [`RewardEngine::deposit`],
//! [`RewardEngine::withdraw`] and [`RewardEngine::transfer`] enforce.

pub mod accumulator;
pub mod engine;
pub mod error;

pub use accumulator::{Accumulator, Injection};
pub use engine::{RewardAccount, RewardEngine};
pub use error::RewardError;
