//! A single proposal's auction record.

use bribe_types::{AccountId, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an auction, evaluated against the caller's clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionStatus {
    /// No bid was ever placed for this proposal.
    NoBids,
    /// Accepting bids until `end_time`.
    Open,
    /// Window has passed. Terminal; the recorded winner stays forever.
    Expired,
}

/// Auction state for one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub proposal_id: ProposalId,
    pub highest_bidder: Option<AccountId>,
    /// Current highest bid, held in custody until outbid.
    pub highest_bid: u128,
    /// Time of the first bid.
    pub start_time: Timestamp,
    /// Fixed at creation; never extended.
    pub end_time: Timestamp,
    pub bid_count: u32,
    /// Proceeds injected into the reward engine by this auction so far.
    pub total_proceeds: u128,
}

impl Auction {
    pub(crate) fn open(proposal_id: ProposalId, now: Timestamp, duration_secs: u64) -> Self {
        Self {
            proposal_id,
            highest_bidder: None,
            highest_bid: 0,
            start_time: now,
            end_time: now.plus_secs(duration_secs),
            bid_count: 0,
            total_proceeds: 0,
        }
    }

    pub fn is_open(&self, now: Timestamp) -> bool {
        now < self.end_time
    }

    pub fn status(&self, now: Timestamp) -> AuctionStatus {
        if self.is_open(now) {
            AuctionStatus::Open
        } else {
            AuctionStatus::Expired
        }
    }
}

/// Public summary of an auction: `(highest_bidder, highest_bid, end_time)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidInfo {
    pub highest_bidder: Option<AccountId>,
    pub highest_bid: u128,
    /// `None` while no bid was placed.
    pub end_time: Option<Timestamp>,
}

impl From<&Auction> for BidInfo {
    fn from(auction: &Auction) -> Self {
        Self {
            highest_bidder: auction.highest_bidder.clone(),
            highest_bid: auction.highest_bid,
            end_time: Some(auction.end_time),
        }
    }
}
