//! Events emitted by the pool after an operation commits.

use bribe_types::{AccountId, ProposalId};

/// Pool-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolEvent {
    /// Governance asset taken into custody, shares minted.
    Deposited {
        account: AccountId,
        amount: u128,
        share_balance: u128,
    },
    /// Shares burned, governance asset returned.
    Withdrawn {
        account: AccountId,
        amount: u128,
        share_balance: u128,
    },
    SharesTransferred {
        from: AccountId,
        to: AccountId,
        amount: u128,
    },
    /// Proceeds folded into the accumulator for current shareholders.
    ProceedsDistributed { amount: u128, total_shares: u128 },
    /// Proceeds escrowed because no shares were outstanding.
    ProceedsDeferred { amount: u128, undistributed: u128 },
    /// A bid became the highest bid of its auction.
    HighestBidIncreased {
        proposal: ProposalId,
        previous_bidder: Option<AccountId>,
        bidder: AccountId,
        amount: u128,
    },
    RewardClaimed { account: AccountId, amount: u128 },
    /// The pool's vote was forwarded to the registry.
    VoteCast {
        proposal: ProposalId,
        directed_by: AccountId,
        support: bool,
        voting_power: u128,
    },
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline inside the emitting operation; keep them fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&PoolEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&PoolEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &PoolEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
