//! Share balances and total supply.

use crate::error::StakingError;
use bribe_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pool-share balances keyed by participant.
///
/// Invariant: the sum of all balances equals `total_shares`. Accounts whose
/// balance drops to zero are removed from the map.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShareLedger {
    balances: HashMap<AccountId, u128>,
    total_shares: u128,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, id: &AccountId) -> u128 {
        self.balances.get(id).copied().unwrap_or(0)
    }

    pub fn total_shares(&self) -> u128 {
        self.total_shares
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Iterate over all non-zero balances.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, u128)> {
        self.balances.iter().map(|(id, bal)| (id, *bal))
    }

    /// Mint `amount` shares to `to`. Returns the new balance.
    pub fn mint(&mut self, to: &AccountId, amount: u128) -> Result<u128, StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let new_total = self
            .total_shares
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        self.balances.insert(to.clone(), new_balance);
        self.total_shares = new_total;
        tracing::trace!(account = %to, amount, new_balance, "shares minted");
        Ok(new_balance)
    }

    /// Burn `amount` shares from `from`. Returns the new balance.
    pub fn burn(&mut self, from: &AccountId, amount: u128) -> Result<u128, StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(StakingError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let new_balance = available - amount;
        self.set_balance(from, new_balance);
        self.total_shares = self
            .total_shares
            .checked_sub(amount)
            .ok_or(StakingError::Overflow)?;
        tracing::trace!(account = %from, amount, new_balance, "shares burned");
        Ok(new_balance)
    }

    /// Move `amount` shares between two accounts without touching the supply.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        if from == to {
            return Err(StakingError::SelfTransfer);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(StakingError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        self.set_balance(from, available - amount);
        self.set_balance(to, credited);
        Ok(())
    }

    /// Force an account back to a previously observed balance, adjusting the
    /// supply by the difference. Used to roll back a failed operation.
    pub fn reset_balance(&mut self, id: &AccountId, balance: u128) {
        let current = self.balance_of(id);
        if balance >= current {
            self.total_shares = self.total_shares.saturating_add(balance - current);
        } else {
            self.total_shares = self.total_shares.saturating_sub(current - balance);
        }
        self.set_balance(id, balance);
    }

    fn set_balance(&mut self, id: &AccountId, balance: u128) {
        if balance == 0 {
            self.balances.remove(id);
        } else {
            self.balances.insert(id.clone(), balance);
        }
    }
}
