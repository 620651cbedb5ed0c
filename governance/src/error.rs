use bribe_types::{AccountId, ProposalId, ProposalState, Timestamp};
use thiserror::Error;

/// Failures reported by the external governance registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry rejected the vote: {0}")]
    VoteRejected(String),

    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("invalid proposal id {0}")]
    InvalidProposalId(ProposalId),

    #[error("{caller} is not the highest bidder allowed to vote on proposal {proposal}")]
    NotHighestBidder {
        caller: AccountId,
        proposal: ProposalId,
    },

    /// Either bidding has not closed yet or the registry is not accepting
    /// votes on the proposal.
    #[error("voting window is not open (bidding ends at {ends_at}, proposal {state})")]
    BidWindowOpen {
        ends_at: Timestamp,
        state: ProposalState,
    },

    #[error("proposal no longer accepts bids (state: {0})")]
    ProposalClosed(ProposalState),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
