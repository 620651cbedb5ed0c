//! Staking-ledger errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("insufficient shares: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("cannot transfer shares to the same account")]
    SelfTransfer,

    #[error("arithmetic overflow in share accounting")]
    Overflow,
}
