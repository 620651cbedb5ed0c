//! Per-account reward checkpoints driven by the global accumulator.

use crate::accumulator::{Accumulator, Injection};
use crate::error::RewardError;
use bribe_staking::ShareLedger;
use bribe_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reward state of a single account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccount {
    /// `shares × acc` at the last checkpoint, in scaled accumulator units.
    pub reward_debt: u128,
    /// Credited but not yet claimed, in bid-asset units.
    pub pending_reward: u128,
    /// Scaled remainder below one asset unit, carried to the next sync.
    pub reward_dust: u128,
}

impl RewardAccount {
    fn is_empty(&self) -> bool {
        self.reward_debt == 0 && self.pending_reward == 0 && self.reward_dust == 0
    }
}

/// The reward accounting engine: accumulator plus per-account checkpoints.
///
/// Share balances are owned by [`ShareLedger`]; every balance change goes
/// through this engine so the affected accounts are synced before the
/// change and re-checkpointed after it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardEngine {
    accumulator: Accumulator,
    accounts: HashMap<AccountId, RewardAccount>,
}

impl RewardEngine {
    pub fn new(precision: u128) -> Self {
        Self {
            accumulator: Accumulator::new(precision),
            accounts: HashMap::new(),
        }
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Stored checkpoint for `id` (zeroed if the account was never synced).
    pub fn account(&self, id: &AccountId) -> RewardAccount {
        self.accounts.get(id).copied().unwrap_or_default()
    }

    /// Inject proceeds for every current shareholder. O(1).
    pub fn inject_proceeds(
        &mut self,
        amount: u128,
        shares: &ShareLedger,
    ) -> Result<Injection, RewardError> {
        let injection = self.accumulator.inject(amount, shares.total_shares())?;
        if let Injection::Deferred { undistributed, .. } = injection {
            tracing::info!(amount, undistributed, "no shares outstanding, proceeds deferred");
        }
        Ok(injection)
    }

    /// Credit everything accrued since the last checkpoint to `pending_reward`
    /// and move the checkpoint to the current accumulator. Returns the new
    /// pending amount.
    pub fn sync_account(
        &mut self,
        id: &AccountId,
        shares: &ShareLedger,
    ) -> Result<u128, RewardError> {
        let account = self.settled(id, shares)?;
        self.store(id, account);
        Ok(account.pending_reward)
    }

    /// Claimable reward of `id` without mutating any state. Always equal to
    /// what [`RewardEngine::sync_account`] would return.
    pub fn reward_balance_of(
        &self,
        id: &AccountId,
        shares: &ShareLedger,
    ) -> Result<u128, RewardError> {
        Ok(self.settled(id, shares)?.pending_reward)
    }

    /// Sync, mint `amount` shares, re-checkpoint. If this deposit creates the
    /// first outstanding shares, escrowed proceeds are released to it.
    pub fn deposit(
        &mut self,
        shares: &mut ShareLedger,
        id: &AccountId,
        amount: u128,
    ) -> Result<Option<Injection>, RewardError> {
        self.sync_account(id, shares)?;
        shares.mint(id, amount)?;
        self.checkpoint(id, shares)?;
        let flushed = self.accumulator.flush_undistributed(shares.total_shares())?;
        if let Some(Injection::Distributed { amount, .. }) = flushed {
            tracing::info!(account = %id, amount, "deferred proceeds released to first stakers");
        }
        Ok(flushed)
    }

    /// Sync, burn `amount` shares, re-checkpoint.
    pub fn withdraw(
        &mut self,
        shares: &mut ShareLedger,
        id: &AccountId,
        amount: u128,
    ) -> Result<(), RewardError> {
        self.sync_account(id, shares)?;
        shares.burn(id, amount)?;
        self.checkpoint(id, shares)
    }

    /// Sync both sides, move `amount` shares, re-checkpoint both sides.
    /// Moved shares carry no proceeds earned before the move.
    pub fn transfer(
        &mut self,
        shares: &mut ShareLedger,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), RewardError> {
        self.sync_account(from, shares)?;
        self.sync_account(to, shares)?;
        shares.transfer(from, to, amount)?;
        self.checkpoint(from, shares)?;
        self.checkpoint(to, shares)
    }

    /// Sync and take the whole pending reward. Returns the amount to pay,
    /// zero when nothing is owed.
    pub fn claim(&mut self, id: &AccountId, shares: &ShareLedger) -> Result<u128, RewardError> {
        let pending = self.sync_account(id, shares)?;
        if pending == 0 {
            return Ok(0);
        }
        self.accumulator.record_claim(pending)?;
        let mut account = self.account(id);
        account.pending_reward = 0;
        self.store(id, account);
        Ok(pending)
    }

    /// Raw checkpoint entry for `id`, `None` if the engine holds nothing.
    pub fn account_entry(&self, id: &AccountId) -> Option<RewardAccount> {
        self.accounts.get(id).copied()
    }

    /// Put back previously captured state. Used to roll back a failed
    /// operation; never call with values that were not read from this engine.
    pub fn restore(
        &mut self,
        accumulator: Accumulator,
        entries: impl IntoIterator<Item = (AccountId, Option<RewardAccount>)>,
    ) {
        self.accumulator = accumulator;
        for (id, entry) in entries {
            match entry {
                Some(account) => {
                    self.accounts.insert(id, account);
                }
                None => {
                    self.accounts.remove(&id);
                }
            }
        }
    }

    /// The account as it would look after a sync, computed without storing.
    fn settled(&self, id: &AccountId, shares: &ShareLedger) -> Result<RewardAccount, RewardError> {
        let mut account = self.account(id);
        let accrued = self.accumulator.accrued_scaled(shares.balance_of(id))?;
        let owed = accrued
            .checked_sub(account.reward_debt)
            .ok_or_else(|| RewardError::CheckpointAhead(id.to_string()))?
            .checked_add(account.reward_dust)
            .ok_or(RewardError::Overflow)?;
        let precision = self.accumulator.precision();
        account.pending_reward = account
            .pending_reward
            .checked_add(owed / precision)
            .ok_or(RewardError::Overflow)?;
        account.reward_dust = owed % precision;
        account.reward_debt = accrued;
        Ok(account)
    }

    fn checkpoint(&mut self, id: &AccountId, shares: &ShareLedger) -> Result<(), RewardError> {
        let mut account = self.account(id);
        account.reward_debt = self.accumulator.accrued_scaled(shares.balance_of(id))?;
        self.store(id, account);
        Ok(())
    }

    fn store(&mut self, id: &AccountId, account: RewardAccount) {
        if account.is_empty() {
            self.accounts.remove(id);
        } else {
            self.accounts.insert(id.clone(), account);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bribe_staking::StakingError;
    use bribe_types::DEFAULT_REWARD_PRECISION;

    fn acct(name: &str) -> AccountId {
        AccountId::new(name)
    }

    fn engine() -> RewardEngine {
        RewardEngine::new(DEFAULT_REWARD_PRECISION)
    }

    #[test]
    fn pro_rata_single_injection() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let (a, b, c) = (acct("alice"), acct("bob"), acct("carl"));
        rewards.deposit(&mut shares, &a, 10).unwrap();
        rewards.deposit(&mut shares, &b, 20).unwrap();
        rewards.deposit(&mut shares, &c, 30).unwrap();

        rewards.inject_proceeds(80, &shares).unwrap();

        let ra = rewards.reward_balance_of(&a, &shares).unwrap();
        let rb = rewards.reward_balance_of(&b, &shares).unwrap();
        let rc = rewards.reward_balance_of(&c, &shares).unwrap();
        assert_eq!(ra, 13);
        assert_eq!(rb, 26);
        // acc = floor(80e12 / 60) is truncated at 1e12 precision, so carl's
        // 30 × acc / 1e12 = 39.99999999999 floors to 39, not the exact 40.
        assert_eq!(rc, 39);
        assert!(ra + rb + rc <= 80);
        assert!(80 - (ra + rb + rc) <= 2);
    }

    #[test]
    fn deposit_between_injections_is_not_diluted() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let a = acct("alice");
        rewards.deposit(&mut shares, &a, 10).unwrap();
        rewards.inject_proceeds(80, &shares).unwrap();
        rewards.deposit(&mut shares, &a, 10).unwrap();
        rewards.inject_proceeds(100, &shares).unwrap();
        assert_eq!(rewards.reward_balance_of(&a, &shares).unwrap(), 180);
    }

    #[test]
    fn late_depositor_earns_nothing_retroactively() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let (a, b) = (acct("alice"), acct("bob"));
        rewards.deposit(&mut shares, &a, 10).unwrap();
        rewards.inject_proceeds(100, &shares).unwrap();
        rewards.deposit(&mut shares, &b, 1_000).unwrap();
        assert_eq!(rewards.reward_balance_of(&b, &shares).unwrap(), 0);
        assert_eq!(rewards.reward_balance_of(&a, &shares).unwrap(), 100);
    }

    #[test]
    fn deposit_inject_withdraw_sandwich() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let (a, b) = (acct("alice"), acct("bob"));
        rewards.deposit(&mut shares, &a, 50).unwrap();
        rewards.deposit(&mut shares, &b, 50).unwrap();
        rewards.inject_proceeds(100, &shares).unwrap();
        rewards.withdraw(&mut shares, &b, 50).unwrap();

        // Bob keeps exactly what he earned while staked, nothing more.
        assert_eq!(rewards.reward_balance_of(&b, &shares).unwrap(), 50);
        rewards.inject_proceeds(100, &shares).unwrap();
        assert_eq!(rewards.reward_balance_of(&b, &shares).unwrap(), 50);
        assert_eq!(rewards.reward_balance_of(&a, &shares).unwrap(), 150);
    }

    #[test]
    fn pure_read_matches_sync() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let (a, b) = (acct("alice"), acct("bob"));
        rewards.deposit(&mut shares, &a, 7).unwrap();
        rewards.deposit(&mut shares, &b, 13).unwrap();
        rewards.inject_proceeds(33, &shares).unwrap();
        let read = rewards.reward_balance_of(&a, &shares).unwrap();
        let synced = rewards.sync_account(&a, &shares).unwrap();
        assert_eq!(read, synced);
        assert_eq!(rewards.reward_balance_of(&a, &shares).unwrap(), synced);
    }

    #[test]
    fn claim_twice_pays_once() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let a = acct("alice");
        rewards.deposit(&mut shares, &a, 10).unwrap();
        rewards.inject_proceeds(40, &shares).unwrap();
        assert_eq!(rewards.claim(&a, &shares).unwrap(), 40);
        assert_eq!(rewards.claim(&a, &shares).unwrap(), 0);
        assert_eq!(rewards.accumulator().total_claimed(), 40);
    }

    #[test]
    fn carry_over_released_to_first_depositor() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let a = acct("alice");
        let injection = rewards.inject_proceeds(90, &shares).unwrap();
        assert!(matches!(injection, Injection::Deferred { .. }));

        let flushed = rewards.deposit(&mut shares, &a, 30).unwrap();
        assert!(flushed.is_some());
        assert_eq!(rewards.reward_balance_of(&a, &shares).unwrap(), 90);
    }

    #[test]
    fn transfer_does_not_move_past_rewards() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let (a, b) = (acct("alice"), acct("bob"));
        rewards.deposit(&mut shares, &a, 10).unwrap();
        rewards.inject_proceeds(100, &shares).unwrap();
        rewards.transfer(&mut shares, &a, &b, 5).unwrap();
        assert_eq!(rewards.reward_balance_of(&a, &shares).unwrap(), 100);
        assert_eq!(rewards.reward_balance_of(&b, &shares).unwrap(), 0);

        rewards.inject_proceeds(100, &shares).unwrap();
        assert_eq!(rewards.reward_balance_of(&a, &shares).unwrap(), 150);
        assert_eq!(rewards.reward_balance_of(&b, &shares).unwrap(), 50);
    }

    #[test]
    fn failed_withdraw_surfaces_staking_error() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let a = acct("alice");
        rewards.deposit(&mut shares, &a, 10).unwrap();
        let err = rewards.withdraw(&mut shares, &a, 11).unwrap_err();
        assert_eq!(
            err,
            RewardError::Staking(StakingError::InsufficientBalance {
                needed: 11,
                available: 10
            })
        );
        assert_eq!(shares.balance_of(&a), 10);
    }

    #[test]
    fn restore_puts_back_captured_state() {
        let mut rewards = engine();
        let mut shares = ShareLedger::new();
        let a = acct("alice");
        rewards.deposit(&mut shares, &a, 10).unwrap();
        rewards.inject_proceeds(40, &shares).unwrap();

        let acc = rewards.accumulator().clone();
        let entry = rewards.account_entry(&a);
        rewards.claim(&a, &shares).unwrap();
        rewards.restore(acc, [(a.clone(), entry)]);

        assert_eq!(rewards.reward_balance_of(&a, &shares).unwrap(), 40);
        assert_eq!(rewards.accumulator().total_claimed(), 0);
    }
}
