//! The set of auctions, keyed by proposal id.

use crate::auction::{Auction, AuctionStatus, BidInfo};
use crate::error::AuctionError;
use bribe_rewards::{Injection, RewardEngine};
use bribe_staking::ShareLedger;
use bribe_types::{AccountId, PoolParams, ProceedsPolicy, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything that changed because of one accepted bid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidReceipt {
    pub proposal_id: ProposalId,
    pub bidder: AccountId,
    pub amount: u128,
    /// The outbid party, if any.
    pub previous_bidder: Option<AccountId>,
    /// Exactly the previous highest bid, owed back to `previous_bidder`.
    pub refund: u128,
    /// Amount injected into the reward engine for this bid.
    pub proceeds: u128,
    pub injection: Injection,
    pub end_time: Timestamp,
    /// True when this bid created the auction.
    pub opened: bool,
}

/// All auctions run by one pool.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuctionBook {
    auctions: HashMap<ProposalId, Auction>,
    duration_secs: u64,
    policy: ProceedsPolicy,
}

impl AuctionBook {
    pub fn new(duration_secs: u64, policy: ProceedsPolicy) -> Self {
        Self {
            auctions: HashMap::new(),
            duration_secs,
            policy,
        }
    }

    pub fn from_params(params: &PoolParams) -> Self {
        Self::new(params.auction_duration_secs, params.proceeds_policy)
    }

    /// Place a bid on `proposal_id` at time `now`.
    ///
    /// The first bid opens the auction with `end_time = now + duration`.
    /// Later bids must arrive before `end_time` and strictly exceed the
    /// current highest bid; a zero bid on an open auction is `BidTooLow`. On success the proceeds are already injected into
    /// `rewards`; moving the bid asset (pulling `amount` from the bidder and
    /// refunding `receipt.refund` to `receipt.previous_bidder`) is the
    /// caller's job.
    pub fn place_bid(
        &mut self,
        proposal_id: ProposalId,
        bidder: &AccountId,
        amount: u128,
        now: Timestamp,
        rewards: &mut RewardEngine,
        shares: &ShareLedger,
    ) -> Result<BidReceipt, AuctionError> {
        let (mut auction, opened) = match self.auctions.get(&proposal_id) {
            Some(existing) => {
                if !existing.is_open(now) {
                    return Err(AuctionError::AuctionEnded {
                        ended_at: existing.end_time,
                    });
                }
                if amount <= existing.highest_bid {
                    return Err(AuctionError::BidTooLow {
                        bid: amount,
                        highest: existing.highest_bid,
                    });
                }
                (existing.clone(), false)
            }
            None if amount == 0 => return Err(AuctionError::ZeroAmount),
            None => (Auction::open(proposal_id, now, self.duration_secs), true),
        };

        let proceeds = match self.policy {
            ProceedsPolicy::FullBid => amount,
            ProceedsPolicy::Increment => amount - auction.highest_bid,
        };
        let bid_count = auction
            .bid_count
            .checked_add(1)
            .ok_or(AuctionError::Overflow)?;
        let total_proceeds = auction
            .total_proceeds
            .checked_add(proceeds)
            .ok_or(AuctionError::Overflow)?;

        let injection = rewards.inject_proceeds(proceeds, shares)?;

        let previous_bidder = auction.highest_bidder.replace(bidder.clone());
        let refund = if previous_bidder.is_some() {
            auction.highest_bid
        } else {
            0
        };
        auction.highest_bid = amount;
        auction.bid_count = bid_count;
        auction.total_proceeds = total_proceeds;
        let end_time = auction.end_time;
        self.auctions.insert(proposal_id, auction);

        tracing::info!(
            proposal = %proposal_id,
            bidder = %bidder,
            amount,
            proceeds,
            refund,
            opened,
            "highest bid increased"
        );

        Ok(BidReceipt {
            proposal_id,
            bidder: bidder.clone(),
            amount,
            previous_bidder,
            refund,
            proceeds,
            injection,
            end_time,
            opened,
        })
    }

    pub fn get(&self, proposal_id: &ProposalId) -> Option<&Auction> {
        self.auctions.get(proposal_id)
    }

    /// `(highest_bidder, highest_bid, end_time)` for a proposal.
    pub fn bid_info(&self, proposal_id: &ProposalId) -> BidInfo {
        self.auctions
            .get(proposal_id)
            .map(BidInfo::from)
            .unwrap_or_default()
    }

    pub fn status(&self, proposal_id: &ProposalId, now: Timestamp) -> AuctionStatus {
        self.auctions
            .get(proposal_id)
            .map(|a| a.status(now))
            .unwrap_or(AuctionStatus::NoBids)
    }

    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Auction> {
        self.auctions.values()
    }

    /// Put back a previously captured auction record (or remove it when it
    /// did not exist). Used to roll back a failed operation.
    pub fn restore(&mut self, proposal_id: ProposalId, auction: Option<Auction>) {
        match auction {
            Some(a) => {
                self.auctions.insert(proposal_id, a);
            }
            None => {
                self.auctions.remove(&proposal_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bribe_types::DEFAULT_REWARD_PRECISION;

    struct Fixture {
        book: AuctionBook,
        rewards: RewardEngine,
        shares: ShareLedger,
    }

    impl Fixture {
        fn new(policy: ProceedsPolicy) -> Self {
            let mut rewards = RewardEngine::new(DEFAULT_REWARD_PRECISION);
            let mut shares = ShareLedger::new();
            rewards.deposit(&mut shares, &acct("alice"), 10).unwrap();
            rewards.deposit(&mut shares, &acct("bob"), 20).unwrap();
            rewards.deposit(&mut shares, &acct("carl"), 30).unwrap();
            Self {
                book: AuctionBook::new(3600, policy),
                rewards,
                shares,
            }
        }

        fn bid(&mut self, id: ProposalId, who: &str, amount: u128, now: u64) -> Result<BidReceipt, AuctionError> {
            self.book.place_bid(
                id,
                &acct(who),
                amount,
                Timestamp::new(now),
                &mut self.rewards,
                &self.shares,
            )
        }
    }

    fn acct(name: &str) -> AccountId {
        AccountId::new(name)
    }

    fn pid(n: u64) -> ProposalId {
        ProposalId::from_u64(n)
    }

    #[test]
    fn first_bid_opens_auction() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        assert_eq!(f.book.status(&pid(1), Timestamp::new(0)), AuctionStatus::NoBids);

        let receipt = f.bid(pid(1), "david", 40, 1_000).unwrap();
        assert!(receipt.opened);
        assert_eq!(receipt.previous_bidder, None);
        assert_eq!(receipt.refund, 0);
        assert_eq!(receipt.end_time, Timestamp::new(4_600));

        let info = f.book.bid_info(&pid(1));
        assert_eq!(info.highest_bidder, Some(acct("david")));
        assert_eq!(info.highest_bid, 40);
        assert_eq!(info.end_time, Some(Timestamp::new(4_600)));
    }

    #[test]
    fn zero_first_bid_rejected() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        assert_eq!(f.bid(pid(1), "david", 0, 0), Err(AuctionError::ZeroAmount));
        assert!(f.book.is_empty());
    }

    #[test]
    fn equal_or_lower_bid_rejected() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        f.bid(pid(1), "david", 40, 0).unwrap();
        assert_eq!(
            f.bid(pid(1), "erin", 40, 10),
            Err(AuctionError::BidTooLow { bid: 40, highest: 40 })
        );
        assert_eq!(
            f.bid(pid(1), "erin", 30, 10),
            Err(AuctionError::BidTooLow { bid: 30, highest: 40 })
        );
        assert_eq!(f.book.bid_info(&pid(1)).highest_bidder, Some(acct("david")));
    }

    #[test]
    fn zero_bid_on_open_auction_is_too_low() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        f.bid(pid(1), "david", 40, 0).unwrap();
        assert_eq!(
            f.bid(pid(1), "david", 0, 10),
            Err(AuctionError::BidTooLow { bid: 0, highest: 40 })
        );
    }

    #[test]
    fn outbid_refunds_previous_bid_exactly() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        f.bid(pid(1), "david", 40, 0).unwrap();
        let receipt = f.bid(pid(1), "erin", 80, 10).unwrap();
        assert_eq!(receipt.previous_bidder, Some(acct("david")));
        assert_eq!(receipt.refund, 40);
        assert!(!receipt.opened);
    }

    #[test]
    fn bids_after_end_time_rejected() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        f.bid(pid(1), "david", 40, 0).unwrap();
        assert_eq!(
            f.bid(pid(1), "david", 50, 3_600),
            Err(AuctionError::AuctionEnded {
                ended_at: Timestamp::new(3_600)
            })
        );
        assert_eq!(f.book.status(&pid(1), Timestamp::new(3_600)), AuctionStatus::Expired);
        assert_eq!(f.book.status(&pid(1), Timestamp::new(3_599)), AuctionStatus::Open);
    }

    #[test]
    fn end_time_is_not_extended_by_later_bids() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        f.bid(pid(1), "david", 40, 0).unwrap();
        let receipt = f.bid(pid(1), "erin", 80, 3_599).unwrap();
        assert_eq!(receipt.end_time, Timestamp::new(3_600));
    }

    #[test]
    fn full_bid_policy_injects_every_bid() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        f.bid(pid(1), "david", 40, 0).unwrap();
        f.bid(pid(1), "erin", 80, 10).unwrap();
        let auction = f.book.get(&pid(1)).unwrap();
        assert_eq!(auction.total_proceeds, 120);
        assert_eq!(auction.bid_count, 2);
        assert_eq!(f.rewards.accumulator().total_injected(), 120);
    }

    #[test]
    fn increment_policy_injects_only_the_raise() {
        let mut f = Fixture::new(ProceedsPolicy::Increment);
        f.bid(pid(1), "david", 40, 0).unwrap();
        let receipt = f.bid(pid(1), "erin", 80, 10).unwrap();
        assert_eq!(receipt.proceeds, 40);
        assert_eq!(f.book.get(&pid(1)).unwrap().total_proceeds, 80);

        // 80 over 10/20/30 shares, same split as a single injection of 80.
        let alice = f.rewards.reward_balance_of(&acct("alice"), &f.shares).unwrap();
        assert_eq!(alice, 13);
    }

    #[test]
    fn auctions_are_independent_per_proposal() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        f.bid(pid(1), "david", 40, 0).unwrap();
        f.bid(pid(2), "erin", 10, 5_000).unwrap();
        assert_eq!(f.book.len(), 2);
        assert_eq!(f.book.status(&pid(1), Timestamp::new(5_000)), AuctionStatus::Expired);
        assert_eq!(f.book.status(&pid(2), Timestamp::new(5_000)), AuctionStatus::Open);
    }

    #[test]
    fn restore_removes_newly_opened_auction() {
        let mut f = Fixture::new(ProceedsPolicy::FullBid);
        f.bid(pid(1), "david", 40, 0).unwrap();
        f.book.restore(pid(1), None);
        assert_eq!(f.book.bid_info(&pid(1)), BidInfo::default());
    }
}
