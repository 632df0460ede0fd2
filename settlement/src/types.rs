//! Core types for settlement planning

use ledger_core::{Amount, DebtMatrix, ParticipantId};
use serde::{Deserialize, Serialize};

/// Proposed transfer from a net debtor to a net creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Creditor (receives)
    pub receiver: ParticipantId,

    /// Debtor (pays)
    pub payer: ParticipantId,

    /// Amount to transfer, always positive
    pub amount: Amount,
}

/// A participant's standing derived from the debt matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPosition {
    /// Participant
    pub participant: ParticipantId,

    /// Total owed to others (row sum)
    pub total_owed: Amount,

    /// Total owed by others (column sum)
    pub total_receivable: Amount,

    /// Net position (positive = net receiver, negative = net payer)
    pub net_position: Amount,
}

impl NetPosition {
    /// Read a participant's position off a matrix
    pub fn from_matrix(matrix: &DebtMatrix, participant: ParticipantId) -> Self {
        let total_owed = matrix.owed_by(participant);
        let total_receivable = matrix.owed_to(participant);
        let net_position = &total_receivable - &total_owed;
        Self {
            participant,
            total_owed,
            total_receivable,
            net_position,
        }
    }

    /// Check if net payer (owes money)
    pub fn is_net_payer(&self) -> bool {
        self.net_position.is_negative()
    }

    /// Check if net receiver (receives money)
    pub fn is_net_receiver(&self) -> bool {
        self.net_position.is_positive()
    }
}

/// Result of one end-to-end run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Netted debt matrix
    pub debt_matrix: DebtMatrix,

    /// Positions in registration order
    pub positions: Vec<NetPosition>,

    /// Transfers to execute, ascending by amount
    pub settlements: Vec<Settlement>,
}

impl SettlementReport {
    /// Number of transfers needed
    pub fn transfer_count(&self) -> usize {
        self.settlements.len()
    }

    /// Sum of all transfer amounts
    pub fn total_transferred(&self) -> Amount {
        self.settlements.iter().map(|s| &s.amount).sum()
    }

    /// Pairwise debt outstanding before settlement
    pub fn total_outstanding(&self) -> Amount {
        self.debt_matrix.total()
    }

    /// Money that does not have to move thanks to multilateral netting
    pub fn calculate_savings(&self) -> Amount {
        self.total_outstanding() - self.total_transferred()
    }

    /// True if nobody owes anything
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }
}

/// Apply settlements to net balances and return what is left
///
/// The payer's balance rises and the receiver's falls by each amount, so a
/// complete plan leaves every balance at zero.
pub fn discharge(balances: &[Amount], settlements: &[Settlement]) -> Vec<Amount> {
    let mut remaining = balances.to_vec();
    for settlement in settlements {
        remaining[settlement.payer.index()] += &settlement.amount;
        remaining[settlement.receiver.index()] -= &settlement.amount;
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: usize) -> ParticipantId {
        ParticipantId::new(i)
    }

    #[test]
    fn test_position_from_matrix() {
        let mut matrix = DebtMatrix::zeros(2);
        matrix.set(id(1), id(0), Amount::from(50));

        let alice = NetPosition::from_matrix(&matrix, id(0));
        assert_eq!(alice.total_receivable, Amount::from(50));
        assert_eq!(alice.net_position, Amount::from(50));
        assert!(alice.is_net_receiver());

        let bob = NetPosition::from_matrix(&matrix, id(1));
        assert_eq!(bob.total_owed, Amount::from(50));
        assert!(bob.is_net_payer());
    }

    #[test]
    fn test_discharge() {
        let balances = vec![Amount::from(30), Amount::from(-10), Amount::from(-20)];
        let settlements = vec![
            Settlement {
                receiver: id(0),
                payer: id(1),
                amount: Amount::from(10),
            },
            Settlement {
                receiver: id(0),
                payer: id(2),
                amount: Amount::from(20),
            },
        ];
        assert!(discharge(&balances, &settlements)
            .iter()
            .all(Amount::is_zero));
        assert_eq!(discharge(&balances, &[]), balances);
    }

    #[test]
    fn test_report_totals() {
        let mut matrix = DebtMatrix::zeros(3);
        matrix.set(id(1), id(0), Amount::from(40));
        matrix.set(id(2), id(1), Amount::from(40));
        let report = SettlementReport {
            debt_matrix: matrix,
            positions: vec![],
            settlements: vec![Settlement {
                receiver: id(0),
                payer: id(2),
                amount: Amount::from(40),
            }],
        };
        assert_eq!(report.transfer_count(), 1);
        assert_eq!(report.total_outstanding(), Amount::from(80));
        assert_eq!(report.calculate_savings(), Amount::from(40));
        assert!(!report.is_settled());
    }
}
