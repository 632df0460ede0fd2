//! Group Ledger Core
//!
//! Exact money, participants, and the debt matrix that records who owes whom.
//!
//! # Architecture
//!
//! - **Amount**: reduced rationals, so proportional splits never drift
//! - **Registry**: registration order fixes every participant's matrix index
//! - **Aggregator**: folds expenses, transactions and a base state, then nets
//!
//! # Invariants
//!
//! - Money conservation: Σ(net balances) == 0 for every matrix
//! - Netting: for i ≠ j, min(m[i][j], m[j][i]) == 0 after aggregation
//! - Non-negativity: no netted cell is below zero
//! - Deterministic: same records → same matrix

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod aggregator;
pub mod amount;
pub mod config;
pub mod error;
pub mod matrix;
pub mod participant;
pub mod types;

// Re-exports
pub use aggregator::{compute_debt_matrix, Aggregator};
pub use amount::Amount;
pub use config::{Config, ValidationConfig};
pub use error::{Error, ErrorKind, Result};
pub use matrix::DebtMatrix;
pub use participant::{normalize_name, Participant, ParticipantId, ParticipantRegistry};
pub use types::{Expense, Share, Transaction};
