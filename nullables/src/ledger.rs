//! Nullable asset ledger: shared in-memory balances with failure injection.

use bribe_ledger::{AssetLedger, LedgerError};
use bribe_types::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    balances: HashMap<AccountId, u128>,
    /// Transfers still allowed before the armed failure fires.
    fail_after: Option<usize>,
    /// Consecutive rejections once the armed failure fires.
    failures: usize,
    transfers: usize,
}

/// An in-memory fungible ledger.
///
/// Clones share the same balances, so a test can keep one handle while the
/// pool owns another.
#[derive(Clone, Default)]
pub struct NullAssetLedger {
    inner: Arc<Mutex<Inner>>,
}

impl NullAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `to` out of thin air.
    pub fn mint(&self, to: &AccountId, amount: u128) {
        let mut inner = self.lock();
        let balance = inner.balances.entry(to.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Reject the next transfer.
    pub fn fail_next(&self) {
        self.fail_after(0);
    }

    /// Let `successes` more transfers through, then reject one.
    pub fn fail_after(&self, successes: usize) {
        self.fail_times_after(successes, 1);
    }

    /// Let `successes` more transfers through, then reject the next `times`.
    pub fn fail_times_after(&self, successes: usize, times: usize) {
        let mut inner = self.lock();
        inner.fail_after = (times > 0).then_some(successes);
        inner.failures = times;
    }

    /// Number of transfers applied so far.
    pub fn transfer_count(&self) -> usize {
        self.lock().transfers
    }

    /// Sum of all balances.
    pub fn supply(&self) -> u128 {
        self.lock().balances.values().sum()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means another test thread panicked mid-update.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AssetLedger for NullAssetLedger {
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut inner = self.lock();
        match inner.fail_after {
            Some(0) => {
                inner.failures = inner.failures.saturating_sub(1);
                if inner.failures == 0 {
                    inner.fail_after = None;
                }
                return Err(LedgerError::Rejected("injected failure".into()));
            }
            Some(n) => inner.fail_after = Some(n - 1),
            None => {}
        }

        let available = inner.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from.to_string(),
                needed: amount,
                available,
            });
        }
        inner.balances.insert(from.clone(), available - amount);
        let to_balance = inner.balances.entry(to.clone()).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        inner.transfers += 1;
        Ok(())
    }

    fn balance_of(&self, id: &AccountId) -> u128 {
        self.lock().balances.get(id).copied().unwrap_or(0)
    }
}
