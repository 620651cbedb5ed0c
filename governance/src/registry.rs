//! External governance registry port.

use crate::error::RegistryError;
use bribe_types::{AccountId, ProposalId, ProposalState};

/// The external governance system the pool votes in.
///
/// Read-only except for [`GovernanceRegistry::cast_vote`]. Implementations
/// are internally synchronized.
pub trait GovernanceRegistry {
    /// State of a proposal, or `None` if the registry does not know the id.
    fn proposal_state(&self, proposal: &ProposalId) -> Option<ProposalState>;

    /// Record a vote by `voter` on `proposal` using all of `voter`'s power.
    fn cast_vote(
        &self,
        voter: &AccountId,
        proposal: &ProposalId,
        support: bool,
    ) -> Result<(), RegistryError>;

    /// Voting power `voter` holds for `proposal`, as counted by the registry.
    fn voting_power_of(&self, voter: &AccountId, proposal: &ProposalId) -> u128;
}
