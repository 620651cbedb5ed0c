//! Asset-ledger trait.

use crate::error::LedgerError;
use bribe_types::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the pool's two assets a ledger moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Staked for shares; custody equals total shares.
    Governance,
    /// Paid by bidders, refunded when outbid, paid out as rewards.
    Bid,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Governance => f.write_str("governance"),
            Self::Bid => f.write_str("bid"),
        }
    }
}

/// A fungible-asset ledger.
///
/// Implementations are internally synchronized and must apply a transfer
/// completely or not at all.
pub trait AssetLedger {
    /// Move `amount` from `from` to `to`. `from` must hold (or have
    /// authorized the pool to move) at least `amount`.
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError>;

    /// Current balance of `id`.
    fn balance_of(&self, id: &AccountId) -> u128;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_kind_display() {
        assert_eq!(AssetKind::Governance.to_string(), "governance");
        assert_eq!(AssetKind::Bid.to_string(), "bid");
    }
}
