//! Auction errors.

use bribe_rewards::RewardError;
use bribe_types::Timestamp;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error("bid amount must be non-zero")]
    ZeroAmount,

    #[error("bid already ended at {ended_at}")]
    AuctionEnded { ended_at: Timestamp },

    #[error("bid not high enough: {bid} <= {highest}")]
    BidTooLow { bid: u128, highest: u128 },

    #[error("proceeds injection failed: {0}")]
    Reward(#[from] RewardError),

    #[error("arithmetic overflow in auction accounting")]
    Overflow,
}
