//! Debt aggregation
//!
//! Folds expenses and transactions into a starting matrix, then nets it.
//!
//! # Algorithm
//!
//! 1. Start from the base state (zero matrix if none)
//! 2. Expense: `amount / Σweights` once, then `per_unit * weight` is added to
//!    `matrix[share][payer]` for every share
//! 3. Transaction: `amount` is subtracted from `matrix[payer][receiver]`
//! 4. Net every pair so only one direction remains
//!
//! All records are validated before the first cell is touched, so a failed
//! run never yields a partially folded matrix.

use crate::{
    config::ValidationConfig, Amount, DebtMatrix, Error, Expense, ParticipantId,
    ParticipantRegistry, Result, Transaction,
};

/// Builds netted debt matrices from ledger records
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    rules: ValidationConfig,
}

impl Aggregator {
    /// Create an aggregator with the given validation rules
    pub fn new(rules: ValidationConfig) -> Self {
        Self { rules }
    }

    /// Validation rules in force
    pub fn rules(&self) -> &ValidationConfig {
        &self.rules
    }

    /// Compute the netted debt matrix for one run
    pub fn compute_debt_matrix<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        base_state: Option<&DebtMatrix>,
        expenses: &[Expense],
        transactions: &[Transaction],
    ) -> Result<DebtMatrix> {
        self.validate(participants, base_state, expenses, transactions)?;

        let n = participants.count();
        let mut matrix = base_state
            .cloned()
            .unwrap_or_else(|| DebtMatrix::zeros(n));

        for (index, expense) in expenses.iter().enumerate() {
            let split = expense
                .split()
                .ok_or(Error::ZeroShareWeight { expense: index })?;

            for (participant, owed) in split {
                if participant == expense.payer {
                    continue;
                }
                matrix.credit(participant, expense.payer, owed);
            }

            tracing::debug!(
                expense = index,
                payer = %participants.name_of(expense.payer),
                amount = %expense.amount,
                "Folded expense"
            );
        }

        for (index, transaction) in transactions.iter().enumerate() {
            if transaction.payer == transaction.receiver {
                continue;
            }
            matrix.debit(
                transaction.payer,
                transaction.receiver,
                transaction.amount.clone(),
            );

            tracing::debug!(
                transaction = index,
                payer = %participants.name_of(transaction.payer),
                receiver = %participants.name_of(transaction.receiver),
                amount = %transaction.amount,
                "Folded transaction"
            );
        }

        matrix.net_pairs();
        debug_assert!(matrix.is_netted());

        tracing::info!(
            participants = n,
            expenses = expenses.len(),
            transactions = transactions.len(),
            outstanding = %matrix.total(),
            "Debt matrix computed"
        );

        Ok(matrix)
    }

    /// Check every record against the registry and the validation rules
    pub fn validate<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        base_state: Option<&DebtMatrix>,
        expenses: &[Expense],
        transactions: &[Transaction],
    ) -> Result<()> {
        let n = participants.count();
        if n < self.rules.min_participants {
            return Err(Error::TooFewParticipants {
                found: n,
                required: self.rules.min_participants,
            });
        }

        if let Some(base) = base_state {
            base.ensure_size(n)?;
            base.ensure_zero_diagonal()?;
            if self.rules.reject_negative_amounts {
                if let Some((debtor, creditor, _)) =
                    base.debts().find(|(_, _, amount)| amount.is_negative())
                {
                    return Err(Error::NegativeAmount(format!(
                        "base state cell ({}, {})",
                        debtor.index(),
                        creditor.index()
                    )));
                }
            }
        }

        for (index, expense) in expenses.iter().enumerate() {
            let context = || format!("expense #{}", index);
            self.check_participant(participants, expense.payer, &context)?;
            for share in &expense.shares {
                self.check_participant(participants, share.participant, &context)?;
            }
            if expense.total_weight() == 0 {
                return Err(Error::ZeroShareWeight { expense: index });
            }
            self.check_amount(&expense.amount, &context)?;
        }

        for (index, transaction) in transactions.iter().enumerate() {
            let context = || format!("transaction #{}", index);
            self.check_participant(participants, transaction.payer, &context)?;
            self.check_participant(participants, transaction.receiver, &context)?;
            self.check_amount(&transaction.amount, &context)?;
        }

        Ok(())
    }

    fn check_participant<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        id: ParticipantId,
        context: &dyn Fn() -> String,
    ) -> Result<()> {
        if participants.contains(id) {
            Ok(())
        } else {
            Err(Error::UnknownParticipant(format!("{} in {}", id, context())))
        }
    }

    fn check_amount(&self, amount: &Amount, context: &dyn Fn() -> String) -> Result<()> {
        if self.rules.reject_negative_amounts && amount.is_negative() {
            return Err(Error::NegativeAmount(context()));
        }
        Ok(())
    }
}

/// Compute a netted debt matrix with the default validation rules
pub fn compute_debt_matrix<A>(
    participants: &ParticipantRegistry<A>,
    base_state: Option<&DebtMatrix>,
    expenses: &[Expense],
    transactions: &[Transaction],
) -> Result<DebtMatrix> {
    Aggregator::default().compute_debt_matrix(participants, base_state, expenses, transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Share;

    fn registry(names: &[&str]) -> ParticipantRegistry {
        ParticipantRegistry::from_entries(names.iter().map(|n| (*n, ()))).unwrap()
    }

    fn id(i: usize) -> ParticipantId {
        ParticipantId::new(i)
    }

    fn even_split(payer: usize, amount: i64, among: &[usize]) -> Expense {
        Expense::new(
            id(payer),
            Amount::from(amount),
            among.iter().map(|&i| Share::new(id(i), 1)).collect(),
        )
    }

    #[test]
    fn test_even_split_between_two() {
        let reg = registry(&["Alice", "Bob"]);
        let m = compute_debt_matrix(&reg, None, &[even_split(0, 100, &[0, 1])], &[]).unwrap();

        assert_eq!(m.get(id(1), id(0)), Amount::from(50));
        assert_eq!(m.get(id(0), id(1)), Amount::zero());
        assert_eq!(m.get(id(0), id(0)), Amount::zero());
    }

    #[test]
    fn test_weighted_split_is_exact() {
        let reg = registry(&["Alice", "Bob", "Carol"]);
        let expense = Expense::new(
            id(0),
            Amount::from(100),
            vec![Share::new(id(0), 1), Share::new(id(1), 1), Share::new(id(2), 1)],
        );
        let m = compute_debt_matrix(&reg, None, &[expense], &[]).unwrap();

        assert_eq!(m.get(id(1), id(0)), Amount::from(100) / 3);
        assert_eq!(m.get(id(2), id(0)), Amount::from(100) / 3);
        assert_eq!(m.owed_to(id(0)) + Amount::from(100) / 3, Amount::from(100));
    }

    #[test]
    fn test_repayment_clears_debt() {
        let reg = registry(&["Alice", "Bob"]);
        let repayment = Transaction::new(id(1), id(0), Amount::from(50));
        let m = compute_debt_matrix(&reg, None, &[even_split(0, 100, &[0, 1])], &[repayment])
            .unwrap();

        assert!(m.is_zero());
    }

    #[test]
    fn test_overpayment_reverses_debt() {
        let reg = registry(&["Alice", "Bob"]);
        let repayment = Transaction::new(id(1), id(0), Amount::from(80));
        let m = compute_debt_matrix(&reg, None, &[even_split(0, 100, &[0, 1])], &[repayment])
            .unwrap();

        assert_eq!(m.get(id(0), id(1)), Amount::from(30));
        assert_eq!(m.get(id(1), id(0)), Amount::zero());
    }

    #[test]
    fn test_base_state_is_folded_in() {
        let reg = registry(&["Alice", "Bob"]);
        let mut base = DebtMatrix::zeros(2);
        base.set(id(0), id(1), Amount::from(30));

        let m = compute_debt_matrix(&reg, Some(&base), &[even_split(0, 100, &[0, 1])], &[])
            .unwrap();

        assert_eq!(m.get(id(0), id(1)), Amount::zero());
        assert_eq!(m.get(id(1), id(0)), Amount::from(20));
        // base state is borrowed, never modified
        assert_eq!(base.get(id(0), id(1)), Amount::from(30));
    }

    #[test]
    fn test_self_transfer_is_ignored() {
        let reg = registry(&["Alice", "Bob"]);
        let m = compute_debt_matrix(
            &reg,
            None,
            &[],
            &[Transaction::new(id(0), id(0), Amount::from(10))],
        )
        .unwrap();
        assert!(m.is_zero());
    }

    #[test]
    fn test_zero_weight_rejected() {
        let reg = registry(&["Alice", "Bob"]);
        let zero = Expense::new(id(0), Amount::from(10), vec![Share::new(id(1), 0)]);
        let result = compute_debt_matrix(&reg, None, &[even_split(0, 4, &[1]), zero], &[]);
        assert!(matches!(result, Err(Error::ZeroShareWeight { expense: 1 })));
    }

    #[test]
    fn test_unknown_participant_rejected() {
        let reg = registry(&["Alice", "Bob"]);
        let result = compute_debt_matrix(&reg, None, &[even_split(0, 10, &[0, 5])], &[]);
        assert!(matches!(result, Err(Error::UnknownParticipant(_))));

        let result = compute_debt_matrix(
            &reg,
            None,
            &[],
            &[Transaction::new(id(2), id(0), Amount::from(1))],
        );
        assert!(matches!(result, Err(Error::UnknownParticipant(_))));
    }

    #[test]
    fn test_base_state_dimension_mismatch() {
        let reg = registry(&["Alice", "Bob"]);
        let result = compute_debt_matrix(&reg, Some(&DebtMatrix::zeros(3)), &[], &[]);
        assert!(matches!(result, Err(Error::DimensionMismatch { expected: 2, .. })));
    }

    #[test]
    fn test_validation_rules() {
        let reg = registry(&["Alice"]);
        assert!(matches!(
            compute_debt_matrix(&reg, None, &[], &[]),
            Err(Error::TooFewParticipants { found: 1, required: 2 })
        ));

        let strict = Aggregator::new(ValidationConfig {
            min_participants: 1,
            reject_negative_amounts: true,
        });
        assert!(strict.compute_debt_matrix(&reg, None, &[], &[]).is_ok());

        let refund = even_split(0, -20, &[0]);
        assert!(matches!(
            strict.compute_debt_matrix(&reg, None, &[refund], &[]),
            Err(Error::NegativeAmount(ctx)) if ctx == "expense #0"
        ));
    }

    #[test]
    fn test_negative_expense_allowed_by_default() {
        let reg = registry(&["Alice", "Bob"]);
        let refund = even_split(0, -40, &[0, 1]);
        let m = compute_debt_matrix(&reg, None, &[refund], &[]).unwrap();
        assert_eq!(m.get(id(0), id(1)), Amount::from(20));
    }

    #[test]
    fn test_many_distinct_share_totals_stay_exact() {
        // share totals 4..=83 need a common denominator near 2^120
        let reg = registry(&["Alice", "Bob", "Carol"]);
        let expenses: Vec<Expense> = (1..=80u32)
            .map(|t| {
                Expense::new(
                    id(0),
                    Amount::from(1_000_000),
                    vec![Share::new(id(0), t), Share::new(id(1), 1), Share::new(id(2), 2)],
                )
            })
            .collect();

        let m = compute_debt_matrix(&reg, None, &expenses, &[]).unwrap();

        let bob: Amount = (1..=80i64)
            .map(|t| Amount::from(1_000_000) / (t + 3))
            .sum();
        assert_eq!(m.get(id(1), id(0)), bob);
        assert_eq!(m.get(id(2), id(0)), &bob * 2);
        assert!(m.is_netted());

        let total: Amount = (0..3).map(|i| m.net_balance(id(i))).sum();
        assert!(total.is_zero());
    }
}
