//! Nullable governance registry.

use bribe_governance::{GovernanceRegistry, RegistryError};
use bribe_types::{AccountId, ProposalId, ProposalState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// One vote as the registry received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedVote {
    pub voter: AccountId,
    pub proposal: ProposalId,
    pub support: bool,
}

#[derive(Default)]
struct Inner {
    states: HashMap<ProposalId, ProposalState>,
    power: HashMap<AccountId, u128>,
    votes: Vec<RecordedVote>,
    reject_votes: Option<String>,
}

/// In-memory registry: proposal states and voting power are set by the
/// test, cast votes are logged. Clones share state.
#[derive(Clone, Default)]
pub struct NullRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl NullRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&self, proposal: ProposalId, state: ProposalState) {
        self.lock().states.insert(proposal, state);
    }

    /// Voting power reported for `voter` on every proposal.
    pub fn set_power(&self, voter: &AccountId, power: u128) {
        self.lock().power.insert(voter.clone(), power);
    }

    /// Make every following `cast_vote` fail with `reason`.
    pub fn reject_votes(&self, reason: &str) {
        self.lock().reject_votes = Some(reason.to_string());
    }

    pub fn votes(&self) -> Vec<RecordedVote> {
        self.lock().votes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl GovernanceRegistry for NullRegistry {
    fn proposal_state(&self, proposal: &ProposalId) -> Option<ProposalState> {
        self.lock().states.get(proposal).copied()
    }

    fn cast_vote(
        &self,
        voter: &AccountId,
        proposal: &ProposalId,
        support: bool,
    ) -> Result<(), RegistryError> {
        let mut inner = self.lock();
        if let Some(reason) = &inner.reject_votes {
            return Err(RegistryError::VoteRejected(reason.clone()));
        }
        inner.votes.push(RecordedVote {
            voter: voter.clone(),
            proposal: *proposal,
            support,
        });
        Ok(())
    }

    fn voting_power_of(&self, voter: &AccountId, _proposal: &ProposalId) -> u128 {
        self.lock().power.get(voter).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_proposal_has_no_state() {
        let registry = NullRegistry::new();
        let id = ProposalId::from_u64(3);
        assert_eq!(registry.proposal_state(&id), None);
        registry.set_state(id, ProposalState::Active);
        assert_eq!(registry.proposal_state(&id), Some(ProposalState::Active));
    }

    #[test]
    fn votes_are_logged_until_rejected() {
        let registry = NullRegistry::new();
        let pool = AccountId::new("pool");
        let id = ProposalId::from_u64(1);
        registry.cast_vote(&pool, &id, true).unwrap();
        registry.reject_votes("closed");
        assert_eq!(
            registry.cast_vote(&pool, &id, false),
            Err(RegistryError::VoteRejected("closed".into()))
        );
        assert_eq!(registry.votes().len(), 1);
        assert!(registry.votes()[0].support);
    }
}
