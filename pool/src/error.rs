//! Errors surfaced by the pool facade.

use bribe_auction::AuctionError;
use bribe_governance::{GovernanceError, RegistryError};
use bribe_ledger::{AssetKind, LedgerError};
use bribe_rewards::RewardError;
use bribe_staking::StakingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("staking error: {0}")]
    Staking(#[from] StakingError),

    #[error("reward error: {0}")]
    Reward(#[from] RewardError),

    #[error("auction error: {0}")]
    Auction(#[from] AuctionError),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("{asset} ledger error: {source}")]
    Ledger {
        asset: AssetKind,
        #[source]
        source: LedgerError,
    },

    /// A transfer failed and returning funds pulled earlier in the same
    /// operation failed too. `amount` is still held by the pool.
    #[error("{asset} ledger error: {source}; returning {amount} to {account} failed: {compensation}")]
    CompensationFailed {
        asset: AssetKind,
        account: String,
        amount: u128,
        #[source]
        source: LedgerError,
        compensation: LedgerError,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl PoolError {
    pub(crate) fn ledger(asset: AssetKind) -> impl FnOnce(LedgerError) -> Self {
        move |source| Self::Ledger { asset, source }
    }

    /// Stable, flat name of the failure, independent of which component
    /// raised it.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Staking(e) => staking_code(e),
            Self::Reward(RewardError::Staking(e)) => staking_code(e),
            Self::Reward(_) => "Overflow",
            Self::Auction(e) => match e {
                AuctionError::ZeroAmount => "ZeroAmount",
                AuctionError::AuctionEnded { .. } => "AuctionEnded",
                AuctionError::BidTooLow { .. } => "BidTooLow",
                AuctionError::Reward(RewardError::Staking(e)) => staking_code(e),
                AuctionError::Reward(_) | AuctionError::Overflow => "Overflow",
            },
            Self::Governance(e) => match e {
                GovernanceError::InvalidProposalId(_) => "InvalidProposalId",
                GovernanceError::NotHighestBidder { .. } => "NotHighestBidder",
                GovernanceError::BidWindowOpen { .. } => "BidWindowOpen",
                GovernanceError::ProposalClosed(_) => "ProposalClosed",
                GovernanceError::Registry(RegistryError::VoteRejected(_)) => "VoteRejected",
                GovernanceError::Registry(RegistryError::Unavailable(_)) => "RegistryUnavailable",
            },
            Self::Ledger {
                source: LedgerError::InsufficientFunds { .. },
                ..
            } => "InsufficientBalance",
            Self::Ledger { .. } | Self::CompensationFailed { .. } => "TransferFailed",
            Self::Config(_) => "Config",
            Self::Snapshot(_) => "Snapshot",
        }
    }
}

fn staking_code(e: &StakingError) -> &'static str {
    match e {
        StakingError::ZeroAmount => "ZeroAmount",
        StakingError::InsufficientBalance { .. } => "InsufficientBalance",
        StakingError::SelfTransfer => "SelfTransfer",
        StakingError::Overflow => "Overflow",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bribe_types::{ProposalId, ProposalState, Timestamp};

    #[test]
    fn codes_flatten_nested_errors() {
        let nested = PoolError::Auction(AuctionError::Reward(RewardError::Overflow));
        assert_eq!(nested.code(), "Overflow");

        let shares = PoolError::Reward(RewardError::Staking(StakingError::InsufficientBalance {
            needed: 5,
            available: 1,
        }));
        assert_eq!(shares.code(), "InsufficientBalance");

        let funds = PoolError::Ledger {
            asset: AssetKind::Bid,
            source: LedgerError::InsufficientFunds {
                account: "david".into(),
                needed: 10,
                available: 0,
            },
        };
        assert_eq!(funds.code(), "InsufficientBalance");
        assert_eq!(funds.to_string(), "bid ledger error: insufficient funds in david: need 10, available 0");

        let window = PoolError::Governance(GovernanceError::BidWindowOpen {
            ends_at: Timestamp::new(1),
            state: ProposalState::Pending,
        });
        assert_eq!(window.code(), "BidWindowOpen");
        assert_eq!(
            PoolError::from(GovernanceError::InvalidProposalId(ProposalId::ZERO)).code(),
            "InvalidProposalId"
        );
    }
}
