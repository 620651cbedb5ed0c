//! Global proceeds-per-share accumulator.

use crate::error::RewardError;
use serde::{Deserialize, Serialize};

/// Result of injecting proceeds into the accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Injection {
    /// Folded into `acc_reward_per_share`.
    Distributed {
        amount: u128,
        per_share_delta: u128,
        total_shares: u128,
    },
    /// No shares outstanding; escrowed until the first stake exists.
    Deferred { amount: u128, undistributed: u128 },
}

/// The running per-share rate shared by every account.
///
/// `acc_reward_per_share` is scaled by `precision` and only ever increases.
/// The floor of `amount × precision / total_shares` is kept; the remainder is
/// a permanent rounding loss of less than one precision unit per share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulator {
    acc_reward_per_share: u128,
    precision: u128,
    /// Proceeds injected while no shares existed.
    undistributed: u128,
    /// Every unit ever injected, distributed or not.
    total_injected: u128,
    /// Every unit ever paid out through claims.
    total_claimed: u128,
}

impl Accumulator {
    pub fn new(precision: u128) -> Self {
        Self {
            acc_reward_per_share: 0,
            precision,
            undistributed: 0,
            total_injected: 0,
            total_claimed: 0,
        }
    }

    pub fn acc_reward_per_share(&self) -> u128 {
        self.acc_reward_per_share
    }

    pub fn precision(&self) -> u128 {
        self.precision
    }

    pub fn undistributed(&self) -> u128 {
        self.undistributed
    }

    pub fn total_injected(&self) -> u128 {
        self.total_injected
    }

    pub fn total_claimed(&self) -> u128 {
        self.total_claimed
    }

    /// Inject `amount` of proceeds against the current share supply.
    pub fn inject(&mut self, amount: u128, total_shares: u128) -> Result<Injection, RewardError> {
        let total_injected = self
            .total_injected
            .checked_add(amount)
            .ok_or(RewardError::Overflow)?;
        if total_shares == 0 {
            let undistributed = self
                .undistributed
                .checked_add(amount)
                .ok_or(RewardError::Overflow)?;
            self.undistributed = undistributed;
            self.total_injected = total_injected;
            return Ok(Injection::Deferred {
                amount,
                undistributed,
            });
        }
        let per_share_delta = self.distribute(amount, total_shares)?;
        self.total_injected = total_injected;
        Ok(Injection::Distributed {
            amount,
            per_share_delta,
            total_shares,
        })
    }

    /// Fold escrowed proceeds into the rate once shares exist.
    pub fn flush_undistributed(
        &mut self,
        total_shares: u128,
    ) -> Result<Option<Injection>, RewardError> {
        if self.undistributed == 0 || total_shares == 0 {
            return Ok(None);
        }
        let amount = self.undistributed;
        let per_share_delta = self.distribute(amount, total_shares)?;
        self.undistributed = 0;
        Ok(Some(Injection::Distributed {
            amount,
            per_share_delta,
            total_shares,
        }))
    }

    /// Value accrued by `shares` since the accumulator was zero, still scaled
    /// by `precision`.
    pub fn accrued_scaled(&self, shares: u128) -> Result<u128, RewardError> {
        shares
            .checked_mul(self.acc_reward_per_share)
            .ok_or(RewardError::Overflow)
    }

    pub(crate) fn record_claim(&mut self, amount: u128) -> Result<(), RewardError> {
        self.total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(RewardError::Overflow)?;
        Ok(())
    }

    fn distribute(&mut self, amount: u128, total_shares: u128) -> Result<u128, RewardError> {
        let per_share_delta = amount
            .checked_mul(self.precision)
            .ok_or(RewardError::Overflow)?
            / total_shares;
        self.acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(per_share_delta)
            .ok_or(RewardError::Overflow)?;
        tracing::debug!(
            amount,
            total_shares,
            per_share_delta,
            acc_reward_per_share = self.acc_reward_per_share,
            "proceeds distributed"
        );
        Ok(per_share_delta)
    }
}
