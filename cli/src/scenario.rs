//! JSON scenarios replayed against an in-memory pool.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context};
use bribe_ledger::{AssetKind, AssetLedger};
use bribe_nullables::{EventRecorder, NullAssetLedger, NullRegistry};
use bribe_pool::{BribePool, PoolConfig, PoolEvent};
use bribe_types::{AccountId, ProposalId, ProposalState, Timestamp};
use serde::{Deserialize, Serialize};

/// A scripted run: starting balances, registry setup, then steps in order.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Starting governance-asset balances.
    pub governance: BTreeMap<String, u128>,
    /// Starting bid-asset balances.
    pub bid: BTreeMap<String, u128>,
    /// Registry state per proposal (`"1"`, or 64 hex digits).
    pub proposals: BTreeMap<String, ProposalState>,
    /// Voting power the registry reports for the pool.
    pub voting_power: u128,
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    /// Seconds since the start of the run; defaults to the previous step's.
    pub at: Option<u64>,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Deposit { account: String, amount: u128 },
    Withdraw { account: String, amount: u128 },
    Transfer { from: String, to: String, amount: u128 },
    Bid { account: String, proposal: String, amount: u128 },
    Claim { account: String },
    Vote { account: String, proposal: String, support: bool },
    SetState { proposal: String, state: ProposalState },
    FailNextTransfer { asset: AssetKind },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::Transfer { .. } => "transfer",
            Self::Bid { .. } => "bid",
            Self::Claim { .. } => "claim",
            Self::Vote { .. } => "vote",
            Self::SetState { .. } => "set_state",
            Self::FailNextTransfer { .. } => "fail_next_transfer",
        }
    }
}

/// Outcome of one step.
#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub at: u64,
    pub op: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct AccountReport {
    pub shares: u128,
    pub claimable: u128,
    pub governance_balance: u128,
    pub bid_balance: u128,
}

#[derive(Debug, Serialize)]
pub struct AuctionReport {
    pub highest_bidder: Option<String>,
    pub highest_bid: u128,
    pub end_time: u64,
    pub bid_count: u32,
    pub total_proceeds: u128,
}

/// Final state after a replay.
#[derive(Debug, Serialize)]
pub struct Report {
    pub outcomes: Vec<StepOutcome>,
    pub total_shares: u128,
    pub undistributed: u128,
    pub total_injected: u128,
    pub total_claimed: u128,
    pub accounts: BTreeMap<String, AccountReport>,
    pub auctions: BTreeMap<String, AuctionReport>,
    pub events: usize,
}

/// An in-memory pool wired to nullable collaborators.
pub struct Simulation {
    pub pool: BribePool,
    governance: NullAssetLedger,
    bid: NullAssetLedger,
    registry: NullRegistry,
    events: EventRecorder<PoolEvent>,
}

impl Simulation {
    pub fn new(config: &PoolConfig) -> anyhow::Result<Self> {
        let governance = NullAssetLedger::new();
        let bid = NullAssetLedger::new();
        let registry = NullRegistry::new();
        let mut pool = BribePool::new(
            config,
            Box::new(governance.clone()),
            Box::new(bid.clone()),
            Box::new(registry.clone()),
        )?;
        let events = EventRecorder::new();
        pool.subscribe(events.listener());
        Ok(Self {
            pool,
            governance,
            bid,
            registry,
            events,
        })
    }

    /// Apply the scenario's starting balances and registry states.
    pub fn seed(&self, scenario: &Scenario) -> anyhow::Result<()> {
        for (name, amount) in &scenario.governance {
            self.governance.mint(&account(name)?, *amount);
        }
        for (name, amount) in &scenario.bid {
            self.bid.mint(&account(name)?, *amount);
        }
        for (id, state) in &scenario.proposals {
            self.registry.set_state(proposal(id)?, *state);
        }
        self.registry
            .set_power(self.pool.pool_account(), scenario.voting_power);
        Ok(())
    }

    /// Run every step. Failed steps are recorded and the run continues
    /// unless `strict` is set.
    pub fn replay(&mut self, scenario: &Scenario, strict: bool) -> anyhow::Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(scenario.steps.len());
        let mut now = 0u64;
        for (i, step) in scenario.steps.iter().enumerate() {
            now = step.at.unwrap_or(now);
            let op = step.action.name().to_string();
            let result = self.run(&step.action, Timestamp::new(now));
            let outcome = match result {
                Ok(detail) => StepOutcome {
                    step: i,
                    at: now,
                    op,
                    ok: true,
                    detail,
                },
                Err(e) if strict => return Err(e.context(format!("step {i} ({op}) failed"))),
                Err(e) => StepOutcome {
                    step: i,
                    at: now,
                    op,
                    ok: false,
                    detail: format!("{e:#}"),
                },
            };
            tracing::debug!(step = i, op = %outcome.op, ok = outcome.ok, "step replayed");
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn run(&mut self, action: &Action, now: Timestamp) -> anyhow::Result<String> {
        let detail = match action {
            Action::Deposit { account: who, amount } => {
                let id = account(who)?;
                self.pool.deposit(&id, *amount)?;
                format!("{who} holds {} shares", self.pool.balance_of(&id))
            }
            Action::Withdraw { account: who, amount } => {
                let id = account(who)?;
                self.pool.withdraw(&id, *amount)?;
                format!("{who} holds {} shares", self.pool.balance_of(&id))
            }
            Action::Transfer { from, to, amount } => {
                self.pool
                    .transfer_shares(&account(from)?, &account(to)?, *amount)?;
                format!("{amount} shares {from} -> {to}")
            }
            Action::Bid {
                account: who,
                proposal: id,
                amount,
            } => {
                let receipt = self.pool.bid(&account(who)?, proposal(id)?, *amount, now)?;
                match receipt.previous_bidder {
                    Some(prev) => {
                        format!("{who} leads with {amount}, {prev} refunded {}", receipt.refund)
                    }
                    None => format!(
                        "{who} opened the auction with {amount}, bidding ends at {}",
                        receipt.end_time
                    ),
                }
            }
            Action::Claim { account: who } => {
                let paid = self.pool.claim_reward(&account(who)?)?;
                format!("{who} claimed {paid}")
            }
            Action::Vote {
                account: who,
                proposal: id,
                support,
            } => {
                let receipt = self
                    .pool
                    .cast_vote(&account(who)?, proposal(id)?, *support, now)?;
                let side = if *support { "for" } else { "against" };
                format!("{who} cast the pool's {} votes {side}", receipt.voting_power)
            }
            Action::SetState { proposal: id, state } => {
                self.registry.set_state(proposal(id)?, *state);
                format!("proposal {id} is {state}")
            }
            Action::FailNextTransfer { asset } => {
                match asset {
                    AssetKind::Governance => self.governance.fail_next(),
                    AssetKind::Bid => self.bid.fail_next(),
                }
                format!("next {asset} transfer will fail")
            }
        };
        Ok(detail)
    }

    /// Summarize the pool and every account the scenario mentioned.
    pub fn report(&self, scenario: &Scenario, outcomes: Vec<StepOutcome>) -> anyhow::Result<Report> {
        let mut names: Vec<&String> = scenario.governance.keys().chain(scenario.bid.keys()).collect();
        names.sort();
        names.dedup();

        let mut accounts = BTreeMap::new();
        for name in names {
            let id = account(name)?;
            accounts.insert(
                name.clone(),
                AccountReport {
                    shares: self.pool.balance_of(&id),
                    claimable: self.pool.reward_balance_of(&id)?,
                    governance_balance: self.governance.balance_of(&id),
                    bid_balance: self.bid.balance_of(&id),
                },
            );
        }

        let mut auctions = BTreeMap::new();
        for auction in self.pool.snapshot().auctions.iter() {
            let key = match auction.proposal_id.as_u64() {
                Some(n) => n.to_string(),
                None => auction.proposal_id.to_string(),
            };
            auctions.insert(
                key,
                AuctionReport {
                    highest_bidder: auction.highest_bidder.as_ref().map(ToString::to_string),
                    highest_bid: auction.highest_bid,
                    end_time: auction.end_time.as_secs(),
                    bid_count: auction.bid_count,
                    total_proceeds: auction.total_proceeds,
                },
            );
        }

        let acc = self.pool.accumulator();
        Ok(Report {
            outcomes,
            total_shares: self.pool.total_shares(),
            undistributed: acc.undistributed(),
            total_injected: acc.total_injected(),
            total_claimed: acc.total_claimed(),
            accounts,
            auctions,
            events: self.events.len(),
        })
    }
}

fn account(name: &str) -> anyhow::Result<AccountId> {
    AccountId::parse(name).with_context(|| format!("bad account name {name:?}"))
}

fn proposal(id: &str) -> anyhow::Result<ProposalId> {
    id.parse()
        .map_err(|e| anyhow!("bad proposal id {id:?}: {e}"))
}
