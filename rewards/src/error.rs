//! Reward-accounting errors.

use bribe_staking::StakingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("share ledger rejected the change: {0}")]
    Staking(#[from] StakingError),

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error("reward checkpoint exceeds accrued value for {0}")]
    CheckpointAhead(String),
}
