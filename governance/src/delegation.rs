//! Delegation of the pool's voting power to a proposal's winning bidder.

use crate::error::GovernanceError;
use crate::registry::GovernanceRegistry;
use bribe_auction::AuctionBook;
use bribe_types::{AccountId, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// A vote forwarded to the registry on the pool's behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub proposal_id: ProposalId,
    /// The winning bidder who directed the vote.
    pub directed_by: AccountId,
    /// The identity the registry recorded the vote under.
    pub voter: AccountId,
    pub support: bool,
    /// Power the registry attributes to the pool for this proposal.
    pub voting_power: u128,
}

/// Authorizes winning bidders to cast the pool's vote.
#[derive(Clone, Debug)]
pub struct VoteGate {
    pool: AccountId,
}

impl VoteGate {
    /// `pool` is the identity under which the registry knows the pool.
    pub fn new(pool: AccountId) -> Self {
        Self { pool }
    }

    /// Check that `caller` may direct the pool's vote on `proposal` at `now`.
    ///
    /// Checks, in order: the registry knows the proposal; `caller` is the
    /// recorded highest bidder; the auction window has elapsed and the
    /// registry is accepting votes.
    pub fn authorize(
        &self,
        registry: &dyn GovernanceRegistry,
        auctions: &AuctionBook,
        caller: &AccountId,
        proposal: &ProposalId,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let state = registry
            .proposal_state(proposal)
            .ok_or(GovernanceError::InvalidProposalId(*proposal))?;

        let auction = auctions
            .get(proposal)
            .filter(|a| a.highest_bidder.as_ref() == Some(caller))
            .ok_or_else(|| GovernanceError::NotHighestBidder {
                caller: caller.clone(),
                proposal: *proposal,
            })?;

        if auction.is_open(now) || !state.is_voting_open() {
            return Err(GovernanceError::BidWindowOpen {
                ends_at: auction.end_time,
                state,
            });
        }
        Ok(())
    }

    /// Authorize and forward one vote to the registry.
    pub fn cast_vote(
        &self,
        registry: &dyn GovernanceRegistry,
        auctions: &AuctionBook,
        caller: &AccountId,
        proposal: &ProposalId,
        support: bool,
        now: Timestamp,
    ) -> Result<VoteReceipt, GovernanceError> {
        self.authorize(registry, auctions, caller, proposal, now)?;
        let voting_power = registry.voting_power_of(&self.pool, proposal);
        registry.cast_vote(&self.pool, proposal, support)?;
        tracing::info!(
            proposal = %proposal,
            directed_by = %caller,
            support,
            voting_power,
            "pool vote cast"
        );
        Ok(VoteReceipt {
            proposal_id: *proposal,
            directed_by: caller.clone(),
            voter: self.pool.clone(),
            support,
            voting_power,
        })
    }

    /// Refuse bids on proposals the registry does not know or that can no
    /// longer be voted on.
    pub fn ensure_biddable(
        &self,
        registry: &dyn GovernanceRegistry,
        proposal: &ProposalId,
    ) -> Result<(), GovernanceError> {
        match registry.proposal_state(proposal) {
            None => Err(GovernanceError::InvalidProposalId(*proposal)),
            Some(state) if !state.is_biddable() => Err(GovernanceError::ProposalClosed(state)),
            Some(_) => Ok(()),
        }
    }
}
