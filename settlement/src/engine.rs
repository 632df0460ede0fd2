//! Main settlement engine
//!
//! Orchestrates aggregation, planning and the zero-sum check.

use crate::{
    config::Config,
    planner::{net_balances, SettlementPlanner},
    types::{discharge, SettlementReport},
    Error, Result,
};
use ledger_core::{Aggregator, DebtMatrix, Expense, ParticipantRegistry, Transaction};

/// Settlement engine
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    /// Debt aggregation
    aggregator: Aggregator,

    /// Settlement planning
    planner: SettlementPlanner,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: &Config) -> Self {
        Self {
            aggregator: Aggregator::new(config.ledger.validation.clone()),
            planner: SettlementPlanner::new(),
        }
    }

    /// Aggregator used for the debt matrix
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Run one computation end to end
    ///
    /// Nothing is kept between runs: the report depends only on the inputs.
    pub fn run<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        base_state: Option<&DebtMatrix>,
        expenses: &[Expense],
        transactions: &[Transaction],
    ) -> Result<SettlementReport> {
        tracing::info!(
            participants = participants.count(),
            resumed = base_state.is_some(),
            "Starting settlement run"
        );

        // Step 1: Fold records into a netted matrix
        let debt_matrix =
            self.aggregator
                .compute_debt_matrix(participants, base_state, expenses, transactions)?;

        // Step 2: Plan transfers
        let settlements = self.planner.compute_settlements(participants, &debt_matrix)?;
        let positions = self.planner.positions(participants, &debt_matrix)?;

        // Step 3: Every balance must be discharged
        let residual = discharge(&net_balances(&debt_matrix), &settlements);
        if let Some((index, left)) = residual
            .iter()
            .enumerate()
            .find(|(_, amount)| !amount.is_zero())
        {
            return Err(Error::InvariantViolation(format!(
                "{} keeps a balance of {} after settlement",
                participants
                    .get(index)
                    .map(|p| p.display_name.as_str())
                    .unwrap_or("?"),
                left
            )));
        }

        let report = SettlementReport {
            debt_matrix,
            positions,
            settlements,
        };

        tracing::info!(
            transfers = report.transfer_count(),
            transferred = %report.total_transferred(),
            saved = %report.calculate_savings(),
            "Settlement run complete"
        );

        Ok(report)
    }
}
