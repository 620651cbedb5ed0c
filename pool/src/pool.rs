//! The pool facade.

use std::collections::HashMap;

use bribe_auction::{Auction, AuctionBook, AuctionStatus, BidInfo, BidReceipt};
use bribe_governance::{GovernanceRegistry, VoteGate, VoteReceipt};
use bribe_ledger::{AssetKind, AssetLedger, LedgerError};
use bribe_rewards::{Accumulator, Injection, RewardEngine};
use bribe_staking::{ShareLedger, StakingError};
use bribe_types::{AccountId, PoolParams, ProposalId, Timestamp};
use bribe_utils::StatsCounter;

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::event::{EventBus, PoolEvent};
use crate::state::PoolState;
use crate::undo::Undo;

const STATS: &[&str] = &[
    "deposit",
    "withdraw",
    "transfer",
    "claim",
    "bid",
    "vote",
    "rolled_back",
];

/// An external asset ledger shared with the rest of the process.
pub type SharedLedger = Box<dyn AssetLedger + Send + Sync>;

/// An external governance registry shared with the rest of the process.
pub type SharedRegistry = Box<dyn GovernanceRegistry + Send + Sync>;

/// A bribe pool bound to its two asset ledgers and a governance registry.
///
/// All mutating operations take `&mut self` and run to completion before
/// returning, so no collaborator can re-enter the pool mid-operation. The
/// current time is always supplied by the caller.
pub struct BribePool {
    name: String,
    symbol: String,
    pool_account: AccountId,
    params: PoolParams,
    shares: ShareLedger,
    rewards: RewardEngine,
    auctions: AuctionBook,
    gate: VoteGate,
    governance_asset: SharedLedger,
    bid_asset: SharedLedger,
    registry: SharedRegistry,
    events: EventBus,
    stats: StatsCounter,
}

impl BribePool {
    pub fn new(
        config: &PoolConfig,
        governance_asset: SharedLedger,
        bid_asset: SharedLedger,
        registry: SharedRegistry,
    ) -> Result<Self, PoolError> {
        config.validate()?;
        tracing::info!(
            name = %config.name,
            symbol = %config.symbol,
            pool_account = %config.pool_account,
            auction_duration_secs = config.params.auction_duration_secs,
            proceeds_policy = ?config.params.proceeds_policy,
            "bribe pool created"
        );
        Ok(Self {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            pool_account: config.pool_account.clone(),
            params: config.params.clone(),
            shares: ShareLedger::new(),
            rewards: RewardEngine::new(config.params.precision()),
            auctions: AuctionBook::from_params(&config.params),
            gate: VoteGate::new(config.pool_account.clone()),
            governance_asset,
            bid_asset,
            registry,
            events: EventBus::new(),
            stats: StatsCounter::new(STATS),
        })
    }

    // ── Staking ────────────────────────────────────────────────────────

    /// Stake `amount` of the governance asset for the same number of shares.
    pub fn deposit(&mut self, caller: &AccountId, amount: u128) -> Result<(), PoolError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount.into());
        }
        self.ensure_funds(AssetKind::Governance, caller, amount)?;

        let undo = self.capture(&[caller], None);
        let result = self.apply_deposit(caller, amount);
        let flushed = self.commit_or_rollback("deposit", undo, result)?;

        let share_balance = self.shares.balance_of(caller);
        self.stats.increment("deposit");
        tracing::info!(account = %caller, amount, share_balance, "deposit");
        self.events.emit(&PoolEvent::Deposited {
            account: caller.clone(),
            amount,
            share_balance,
        });
        if let Some(injection) = flushed {
            self.emit_injection(injection);
        }
        Ok(())
    }

    fn apply_deposit(
        &mut self,
        caller: &AccountId,
        amount: u128,
    ) -> Result<Option<Injection>, PoolError> {
        let flushed = self.rewards.deposit(&mut self.shares, caller, amount)?;
        self.governance_asset
            .transfer(caller, &self.pool_account, amount)
            .map_err(PoolError::ledger(AssetKind::Governance))?;
        Ok(flushed)
    }

    /// Burn `amount` shares and return the same amount of governance asset.
    pub fn withdraw(&mut self, caller: &AccountId, amount: u128) -> Result<(), PoolError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount.into());
        }

        let undo = self.capture(&[caller], None);
        let result = self.apply_withdraw(caller, amount);
        self.commit_or_rollback("withdraw", undo, result)?;

        let share_balance = self.shares.balance_of(caller);
        self.stats.increment("withdraw");
        tracing::info!(account = %caller, amount, share_balance, "withdraw");
        self.events.emit(&PoolEvent::Withdrawn {
            account: caller.clone(),
            amount,
            share_balance,
        });
        Ok(())
    }

    fn apply_withdraw(&mut self, caller: &AccountId, amount: u128) -> Result<(), PoolError> {
        self.rewards.withdraw(&mut self.shares, caller, amount)?;
        self.governance_asset
            .transfer(&self.pool_account, caller, amount)
            .map_err(PoolError::ledger(AssetKind::Governance))
    }

    /// Move shares between two holders. Proceeds earned before the move
    /// stay with `from`.
    pub fn transfer_shares(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), PoolError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount.into());
        }

        let undo = self.capture(&[from, to], None);
        let result = self
            .rewards
            .transfer(&mut self.shares, from, to, amount)
            .map_err(PoolError::from);
        self.commit_or_rollback("transfer", undo, result)?;

        self.stats.increment("transfer");
        tracing::info!(from = %from, to = %to, amount, "shares transferred");
        self.events.emit(&PoolEvent::SharesTransferred {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    pub fn balance_of(&self, id: &AccountId) -> u128 {
        self.shares.balance_of(id)
    }

    pub fn total_shares(&self) -> u128 {
        self.shares.total_shares()
    }

    // ── Rewards ────────────────────────────────────────────────────────

    /// Claimable proceeds of `id`, exactly what [`BribePool::claim_reward`]
    /// would pay right now.
    pub fn reward_balance_of(&self, id: &AccountId) -> Result<u128, PoolError> {
        Ok(self.rewards.reward_balance_of(id, &self.shares)?)
    }

    /// Pay out everything owed to `caller` in the bid asset. Returns the
    /// amount paid; zero is a successful no-op.
    pub fn claim_reward(&mut self, caller: &AccountId) -> Result<u128, PoolError> {
        let undo = self.capture(&[caller], None);
        let result = self.apply_claim(caller);
        let amount = self.commit_or_rollback("claim", undo, result)?;

        if amount > 0 {
            self.stats.increment("claim");
            tracing::info!(account = %caller, amount, "reward claimed");
            self.events.emit(&PoolEvent::RewardClaimed {
                account: caller.clone(),
                amount,
            });
        }
        Ok(amount)
    }

    fn apply_claim(&mut self, caller: &AccountId) -> Result<u128, PoolError> {
        let amount = self.rewards.claim(caller, &self.shares)?;
        if amount > 0 {
            self.bid_asset
                .transfer(&self.pool_account, caller, amount)
                .map_err(PoolError::ledger(AssetKind::Bid))?;
        }
        Ok(amount)
    }

    // ── Auctions ───────────────────────────────────────────────────────

    /// Bid `amount` of the bid asset on `proposal` at time `now`.
    pub fn bid(
        &mut self,
        caller: &AccountId,
        proposal: ProposalId,
        amount: u128,
        now: Timestamp,
    ) -> Result<BidReceipt, PoolError> {
        if self.params.require_live_proposal_on_bid {
            self.gate.ensure_biddable(self.registry.as_ref(), &proposal)?;
        }
        let undo = self.capture(&[], Some(proposal));
        let result = self.apply_bid(caller, proposal, amount, now);
        let receipt = self.commit_or_rollback("bid", undo, result)?;

        self.stats.increment("bid");
        self.events.emit(&PoolEvent::HighestBidIncreased {
            proposal,
            previous_bidder: receipt.previous_bidder.clone(),
            bidder: caller.clone(),
            amount,
        });
        self.emit_injection(receipt.injection);
        Ok(receipt)
    }

    fn apply_bid(
        &mut self,
        caller: &AccountId,
        proposal: ProposalId,
        amount: u128,
        now: Timestamp,
    ) -> Result<BidReceipt, PoolError> {
        let receipt = self.auctions.place_bid(
            proposal,
            caller,
            amount,
            now,
            &mut self.rewards,
            &self.shares,
        )?;
        self.bid_asset
            .transfer(caller, &self.pool_account, amount)
            .map_err(PoolError::ledger(AssetKind::Bid))?;

        if let Some(previous) = &receipt.previous_bidder {
            if receipt.refund > 0 {
                if let Err(source) =
                    self.bid_asset
                        .transfer(&self.pool_account, previous, receipt.refund)
                {
                    return Err(self.compensate(AssetKind::Bid, caller, amount, source));
                }
            }
        }
        Ok(receipt)
    }

    pub fn bid_info(&self, proposal: &ProposalId) -> BidInfo {
        self.auctions.bid_info(proposal)
    }

    pub fn auction(&self, proposal: &ProposalId) -> Option<&Auction> {
        self.auctions.get(proposal)
    }

    pub fn auction_status(&self, proposal: &ProposalId, now: Timestamp) -> AuctionStatus {
        self.auctions.status(proposal, now)
    }

    // ── Voting ─────────────────────────────────────────────────────────

    /// Let the winning bidder of `proposal` cast the pool's vote.
    pub fn cast_vote(
        &mut self,
        caller: &AccountId,
        proposal: ProposalId,
        support: bool,
        now: Timestamp,
    ) -> Result<VoteReceipt, PoolError> {
        let receipt = self.gate.cast_vote(
            self.registry.as_ref(),
            &self.auctions,
            caller,
            &proposal,
            support,
            now,
        )?;
        self.stats.increment("vote");
        self.events.emit(&PoolEvent::VoteCast {
            proposal,
            directed_by: caller.clone(),
            support,
            voting_power: receipt.voting_power,
        });
        Ok(receipt)
    }

    // ── Introspection ──────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn pool_account(&self) -> &AccountId {
        &self.pool_account
    }

    pub fn params(&self) -> &PoolParams {
        &self.params
    }

    pub fn accumulator(&self) -> &Accumulator {
        self.rewards.accumulator()
    }

    /// Every share holder and their balance, in no particular order.
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, u128)> {
        self.shares.iter()
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&PoolEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// Count of committed operations per kind, plus rolled-back attempts.
    pub fn stats(&self) -> HashMap<&'static str, u64> {
        self.stats.snapshot()
    }

    // ── Snapshots ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> PoolState {
        PoolState {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            pool_account: self.pool_account.clone(),
            params: self.params.clone(),
            shares: self.shares.clone(),
            rewards: self.rewards.clone(),
            auctions: self.auctions.clone(),
        }
    }

    /// Replace the internal state with `state`. The external ledgers must
    /// already reflect the custody the state implies.
    pub fn restore(&mut self, state: PoolState) -> Result<(), PoolError> {
        state
            .params
            .validate()
            .map_err(|e| PoolError::Snapshot(e.to_string()))?;
        if state.rewards.accumulator().precision() != state.params.precision() {
            return Err(PoolError::Snapshot(
                "accumulator precision does not match params".into(),
            ));
        }
        tracing::info!(
            holders = state.shares.holder_count(),
            total_shares = state.shares.total_shares(),
            auctions = state.auctions.len(),
            "pool state restored"
        );
        self.name = state.name;
        self.symbol = state.symbol;
        self.gate = VoteGate::new(state.pool_account.clone());
        self.pool_account = state.pool_account;
        self.params = state.params;
        self.shares = state.shares;
        self.rewards = state.rewards;
        self.auctions = state.auctions;
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn capture(&self, accounts: &[&AccountId], proposal: Option<ProposalId>) -> Undo {
        Undo::capture(&self.shares, &self.rewards, &self.auctions, accounts, proposal)
    }

    fn commit_or_rollback<T>(
        &mut self,
        operation: &'static str,
        undo: Undo,
        result: Result<T, PoolError>,
    ) -> Result<T, PoolError> {
        if let Err(e) = &result {
            undo.rollback(&mut self.shares, &mut self.rewards, &mut self.auctions);
            self.stats.increment("rolled_back");
            tracing::warn!(operation, code = e.code(), error = %e, "operation rolled back");
        }
        result
    }

    fn ledger(&self, asset: AssetKind) -> &(dyn AssetLedger + Send + Sync) {
        match asset {
            AssetKind::Governance => self.governance_asset.as_ref(),
            AssetKind::Bid => self.bid_asset.as_ref(),
        }
    }

    fn ensure_funds(&self, asset: AssetKind, id: &AccountId, amount: u128) -> Result<(), PoolError> {
        let available = self.ledger(asset).balance_of(id);
        if available < amount {
            return Err(PoolError::Ledger {
                asset,
                source: LedgerError::InsufficientFunds {
                    account: id.to_string(),
                    needed: amount,
                    available,
                },
            });
        }
        Ok(())
    }

    /// Return `amount` pulled from `to` earlier in an operation that failed
    /// with `source`, and build the error to report.
    fn compensate(
        &self,
        asset: AssetKind,
        to: &AccountId,
        amount: u128,
        source: LedgerError,
    ) -> PoolError {
        match self.ledger(asset).transfer(&self.pool_account, to, amount) {
            Ok(()) => PoolError::Ledger { asset, source },
            Err(compensation) => {
                tracing::error!(
                    asset = %asset,
                    account = %to,
                    amount,
                    error = %compensation,
                    "compensating transfer failed"
                );
                PoolError::CompensationFailed {
                    asset,
                    account: to.to_string(),
                    amount,
                    source,
                    compensation,
                }
            }
        }
    }

    fn emit_injection(&self, injection: Injection) {
        let event = match injection {
            Injection::Distributed {
                amount,
                total_shares,
                ..
            } => PoolEvent::ProceedsDistributed {
                amount,
                total_shares,
            },
            Injection::Deferred {
                amount,
                undistributed,
            } => PoolEvent::ProceedsDeferred {
                amount,
                undistributed,
            },
        };
        self.events.emit(&event);
    }
}
