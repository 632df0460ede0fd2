//! Settlement planning
//!
//! Turns a netted debt matrix into transfers that zero every balance.
//!
//! # Algorithm
//!
//! 1. Net balance per participant: owed to them minus owed by them
//! 2. Sort ascending (largest debtor first, ties in registration order)
//! 3. Two cursors: `lowest` on the largest debtor, `highest` on the largest
//!    creditor. Zero balances are skipped. Otherwise the debtor pays the
//!    creditor `min(|debt|, credit)` and any cursor that reached zero moves.
//! 4. Emit transfers ascending by amount
//!
//! # Example
//!
//! ```text
//! Net balances:
//!   Alice: +30
//!   Bob:   -10
//!   Carol: -20
//!
//! Transfers:
//!   Bob pays Alice 10
//!   Carol pays Alice 20
//! ```
//!
//! This is the usual greedy minimum-cash-flow heuristic. It finishes in at
//! most N−1 transfers and discharges every balance exactly, but it is not
//! guaranteed to find the fewest transfers for every distribution; that
//! problem is NP-hard in general.

use crate::{
    types::{NetPosition, Settlement},
    Result,
};
use ledger_core::{Amount, DebtMatrix, ParticipantId, ParticipantRegistry};

/// Greedy settlement planner
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Create new planner
    pub fn new() -> Self {
        Self
    }

    /// Compute the ordered settlement list for a netted matrix
    pub fn compute_settlements<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        matrix: &DebtMatrix,
    ) -> Result<Vec<Settlement>> {
        matrix.ensure_size(participants.count())?;

        let settlements = match_balances(&net_balances(matrix));
        for settlement in &settlements {
            tracing::debug!(
                payer = %participants.name_of(settlement.payer),
                receiver = %participants.name_of(settlement.receiver),
                amount = %settlement.amount,
                "Planned settlement"
            );
        }

        Ok(settlements)
    }

    /// Positions of every participant in registration order
    pub fn positions<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        matrix: &DebtMatrix,
    ) -> Result<Vec<NetPosition>> {
        matrix.ensure_size(participants.count())?;
        Ok(participants
            .ids()
            .map(|id| NetPosition::from_matrix(matrix, id))
            .collect())
    }
}

/// Net balance of every participant in registration order
pub fn net_balances(matrix: &DebtMatrix) -> Vec<Amount> {
    (0..matrix.size())
        .map(|i| matrix.net_balance(ParticipantId::new(i)))
        .collect()
}

/// Match debtors with creditors using two cursors over sorted balances
///
/// `balances[i]` belongs to participant `i`. Balances must sum to zero for
/// the result to discharge them completely.
pub fn match_balances(balances: &[Amount]) -> Vec<Settlement> {
    let mut order: Vec<(ParticipantId, Amount)> = balances
        .iter()
        .enumerate()
        .map(|(i, balance)| (ParticipantId::new(i), balance.clone()))
        .collect();
    order.sort_by(|a, b| a.1.cmp(&b.1));

    let mut settlements = Vec::new();
    if order.is_empty() {
        return settlements;
    }

    let (mut lowest, mut highest) = (0, order.len() - 1);
    while lowest < highest {
        if order[lowest].1.is_zero() {
            lowest += 1;
            continue;
        }
        if order[highest].1.is_zero() {
            highest -= 1;
            continue;
        }

        let (debtor, debt) = (order[lowest].0, &order[lowest].1);
        let (creditor, credit) = (order[highest].0, &order[highest].1);
        if !debt.is_negative() || !credit.is_positive() {
            // only reachable when the balances do not sum to zero
            break;
        }

        let amount = (-debt).min(credit.clone());
        order[lowest].1 += &amount;
        order[highest].1 -= &amount;
        settlements.push(Settlement {
            receiver: creditor,
            payer: debtor,
            amount,
        });
        if order[lowest].1.is_zero() {
            lowest += 1;
        }
        if order[highest].1.is_zero() {
            highest -= 1;
        }
    }

    settlements.sort_by(|a, b| a.amount.cmp(&b.amount));
    settlements
}

/// Compute settlements with a default planner
pub fn compute_settlements<A>(
    participants: &ParticipantRegistry<A>,
    matrix: &DebtMatrix,
) -> Result<Vec<Settlement>> {
    SettlementPlanner::new().compute_settlements(participants, matrix)
}
