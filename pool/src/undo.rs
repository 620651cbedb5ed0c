//! Rollback records for in-flight operations.

use bribe_auction::{Auction, AuctionBook};
use bribe_rewards::{Accumulator, RewardAccount, RewardEngine};
use bribe_staking::ShareLedger;
use bribe_types::{AccountId, ProposalId};

/// Everything an operation may touch, captured before it starts.
pub(crate) struct Undo {
    accumulator: Accumulator,
    accounts: Vec<(AccountId, u128, Option<RewardAccount>)>,
    auction: Option<(ProposalId, Option<Auction>)>,
}

impl Undo {
    pub(crate) fn capture(
        shares: &ShareLedger,
        rewards: &RewardEngine,
        auctions: &AuctionBook,
        accounts: &[&AccountId],
        proposal: Option<ProposalId>,
    ) -> Self {
        Self {
            accumulator: rewards.accumulator().clone(),
            accounts: accounts
                .iter()
                .map(|id| ((*id).clone(), shares.balance_of(id), rewards.account_entry(id)))
                .collect(),
            auction: proposal.map(|id| (id, auctions.get(&id).cloned())),
        }
    }

    pub(crate) fn rollback(
        self,
        shares: &mut ShareLedger,
        rewards: &mut RewardEngine,
        auctions: &mut AuctionBook,
    ) {
        let mut entries = Vec::with_capacity(self.accounts.len());
        for (id, balance, entry) in self.accounts {
            shares.reset_balance(&id, balance);
            entries.push((id, entry));
        }
        rewards.restore(self.accumulator, entries);
        if let Some((id, auction)) = self.auction {
            auctions.restore(id, auction);
        }
    }
}
