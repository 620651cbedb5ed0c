//! Errors raised while constructing or validating shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account id: {0:?}")]
    InvalidAccount(String),

    #[error("invalid proposal id: {0}")]
    InvalidProposalId(String),

    #[error("invalid pool parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },
}
