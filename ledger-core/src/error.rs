//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Participant name already registered (after normalization)
    #[error("Duplicate participant name: {0:?}")]
    DuplicateName(String),

    /// Participant name is empty or whitespace
    #[error("Empty or whitespace participant name")]
    EmptyName,

    /// Name or index that no registered participant answers to
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    /// Expense whose share weights add up to zero
    #[error("Expense #{expense} has zero total share weight")]
    ZeroShareWeight {
        /// Position of the expense in the input list
        expense: usize,
    },

    /// Negative amount rejected by validation rules
    #[error("Negative amount in {0}")]
    NegativeAmount(String),

    /// Fewer participants than the configured minimum
    #[error("Too few participants: found {found}, need at least {required}")]
    TooFewParticipants {
        /// Registered participants
        found: usize,
        /// Configured minimum
        required: usize,
    },

    /// External name does not match the participant registered at that position
    #[error("Found no participant named {name:?} at index {index}")]
    MisplacedParticipant {
        /// Name supplied by the caller
        name: String,
        /// Position it was supplied at
        index: usize,
    },

    /// Unparseable amount text
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Matrix shape does not match the participant count
    #[error("Dimension mismatch: expected {expected}x{expected} matrix, {found}")]
    DimensionMismatch {
        /// Participant count
        expected: usize,
        /// Description of the shape actually supplied
        found: String,
    },

    /// Base state that cannot have come from a previous run
    #[error("Inconsistent base state: {0}")]
    InconsistentBaseState(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad class of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input records or registry contents
    Configuration,
    /// Inputs that disagree with each other in shape
    Consistency,
    /// Reading configuration from disk failed
    Io,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateName(_)
            | Error::EmptyName
            | Error::UnknownParticipant(_)
            | Error::ZeroShareWeight { .. }
            | Error::NegativeAmount(_)
            | Error::TooFewParticipants { .. }
            | Error::InvalidAmount(_)
            | Error::Config(_) => ErrorKind::Configuration,
            Error::MisplacedParticipant { .. }
            | Error::DimensionMismatch { .. }
            | Error::InconsistentBaseState(_) => ErrorKind::Consistency,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}
