//! Pool parameters: auction timing, accumulator precision and proceeds policy.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// Default auction window: one hour from the first bid.
pub const DEFAULT_AUCTION_DURATION_SECS: u64 = 3600;

/// Default fixed-point scale for the proceeds-per-share accumulator.
pub const DEFAULT_REWARD_PRECISION: u128 = 1_000_000_000_000;

/// How much of an accepted bid is injected as proceeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProceedsPolicy {
    /// Every accepted bid injects its entire amount, even though the
    /// outbid party is refunded. Total proceeds of an auction equal the
    /// sum of all accepted bids.
    #[default]
    FullBid,
    /// Only the increase over the previous highest bid is injected. Total
    /// proceeds of an auction equal the winning bid.
    Increment,
}

/// All tunable parameters of a pool instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolParams {
    /// Length of every auction, counted from its first bid.
    pub auction_duration_secs: u64,

    /// Scale applied to `proceeds / total_shares` before flooring. Kept
    /// within `u64` so it survives TOML.
    pub reward_precision: u64,

    pub proceeds_policy: ProceedsPolicy,

    /// Consult the governance registry on every bid and refuse bids on
    /// unknown proposals or proposals no longer pending/active.
    pub require_live_proposal_on_bid: bool,
}

impl PoolParams {
    /// The accumulator scale as the reward engine consumes it.
    pub fn precision(&self) -> u128 {
        u128::from(self.reward_precision)
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.auction_duration_secs == 0 {
            return Err(TypesError::InvalidParam {
                name: "auction_duration_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.reward_precision == 0 {
            return Err(TypesError::InvalidParam {
                name: "reward_precision",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for PoolParams {
    fn default() -> Self {
        Self {
            auction_duration_secs: DEFAULT_AUCTION_DURATION_SECS,
            reward_precision: DEFAULT_REWARD_PRECISION as u64,
            proceeds_policy: ProceedsPolicy::FullBid,
            require_live_proposal_on_bid: false,
        }
    }
}
