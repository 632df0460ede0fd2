//! Settlement Engine
//!
//! Plans the transfers that settle a group ledger.
//!
//! # Architecture
//!
//! A run is a pure function of its inputs:
//!
//! 1. **Aggregation**: fold expenses and transactions into a netted debt
//!    matrix ([`ledger_core::Aggregator`])
//! 2. **Planning**: turn net balances into transfers ([`SettlementPlanner`])
//! 3. **Verification**: apply the transfers to the balances and require
//!    every residual to be zero
//! 4. **Reporting**: render the matrix and transfers ([`ReportRenderer`])
//!
//! # Example
//!
//! ```
//! use ledger_core::{Amount, Expense, ParticipantRegistry, Share};
//! use settlement::{Config, SettlementEngine};
//!
//! # fn main() -> settlement::Result<()> {
//! let registry = ParticipantRegistry::from_entries([("Alice", ()), ("Bob", ())])?;
//! let alice = registry.resolve("alice")?;
//! let bob = registry.resolve("bob")?;
//!
//! let dinner = Expense::new(
//!     alice,
//!     Amount::from(100),
//!     vec![Share::new(alice, 1), Share::new(bob, 1)],
//! );
//!
//! let engine = SettlementEngine::new(&Config::default());
//! let report = engine.run(&registry, None, &[dinner], &[])?;
//!
//! assert_eq!(report.settlements.len(), 1);
//! assert_eq!(report.settlements[0].payer, bob);
//! assert_eq!(report.settlements[0].amount, Amount::from(50));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod planner;
pub mod report;
pub mod types;

// Re-exports
pub use config::{Config, ReportConfig, ReportFormat};
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use input::{LedgerInput, ResolvedLedger};
pub use planner::{compute_settlements, match_balances, net_balances, SettlementPlanner};
pub use report::ReportRenderer;
pub use types::*;
