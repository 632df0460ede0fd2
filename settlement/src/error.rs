//! Error types for settlement engine

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error (invalid records, inconsistent base state)
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger_core::Error),

    /// Planned transfers failed to discharge every balance
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classification of the underlying ledger error, if any
    pub fn ledger_kind(&self) -> Option<ledger_core::ErrorKind> {
        match self {
            Error::Ledger(inner) => Some(inner.kind()),
            _ => None,
        }
    }
}
