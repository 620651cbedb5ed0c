use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds in {account}: need {needed}, available {available}")]
    InsufficientFunds {
        account: String,
        needed: u128,
        available: u128,
    },

    #[error("transfer rejected by ledger: {0}")]
    Rejected(String),
}
