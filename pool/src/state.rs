//! Serializable pool state for snapshots.

use bribe_auction::AuctionBook;
use bribe_rewards::RewardEngine;
use bribe_staking::ShareLedger;
use bribe_types::{AccountId, PoolParams};
use serde::{Deserialize, Serialize};

use crate::PoolError;

/// The complete internal state of a pool. External ledgers and the
/// registry are not part of it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolState {
    pub name: String,
    pub symbol: String,
    pub pool_account: AccountId,
    pub params: PoolParams,
    pub shares: ShareLedger,
    pub rewards: RewardEngine,
    pub auctions: AuctionBook,
}

impl PoolState {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PoolError> {
        bincode::serialize(self).map_err(|e| PoolError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PoolError> {
        bincode::deserialize(bytes).map_err(|e| PoolError::Snapshot(e.to_string()))
    }
}
