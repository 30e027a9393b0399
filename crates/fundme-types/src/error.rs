use thiserror::Error;

use crate::address::Address;
use crate::amount::{Usd, Wei};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FundMeError {
    #[error("Didn't send enough: converted={converted}, minimum={minimum}")]
    InsufficientContribution { converted: Usd, minimum: Usd },

    #[error("Price oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Sender is not owner: {0}")]
    NotOwner(Address),

    #[error("Transfer of {amount} from {from} to {to} failed: {reason}")]
    TransferFailed {
        from: Address,
        to: Address,
        amount: Wei,
        reason: String,
    },

    #[error("Funder index {index} out of range (funders={len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Escrow account {0} cannot fund or own its own ledger")]
    EscrowAccount(Address),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<serde_json::Error> for FundMeError {
    fn from(e: serde_json::Error) -> Self {
        FundMeError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for FundMeError {
    fn from(e: std::io::Error) -> Self {
        FundMeError::IoError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FundMeError>;
