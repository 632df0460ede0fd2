//! Property-based tests for debt matrix invariants
//!
//! These tests use proptest to verify:
//! - Netting: at most one direction of every pair is nonzero
//! - Non-negativity: no netted cell is below zero
//! - Money conservation: net balances sum to zero
//! - Proportionality: weighted shares are exact and add back to the expense

use ledger_core::{
    compute_debt_matrix, Amount, DebtMatrix, Expense, ParticipantId, ParticipantRegistry, Share,
    Transaction,
};
use proptest::prelude::*;

const MAX_PARTICIPANTS: usize = 6;

fn registry(size: usize) -> ParticipantRegistry {
    ParticipantRegistry::from_entries((0..size).map(|i| (format!("member-{}", i), ()))).unwrap()
}

/// Strategy for generating positive amounts in minor units
fn amount_strategy() -> impl Strategy<Value = Amount> {
    (1i64..1_000_000).prop_map(Amount::from)
}

/// Strategy for generating an expense with at least one nonzero weight
fn expense_strategy(size: usize) -> impl Strategy<Value = Expense> {
    (
        0..size,
        amount_strategy(),
        prop::collection::vec(0u32..5, size),
        0..size,
    )
        .prop_map(|(payer, amount, mut weights, forced)| {
            if weights.iter().all(|w| *w == 0) {
                weights[forced] = 1;
            }
            let shares = weights
                .into_iter()
                .enumerate()
                .map(|(i, w)| Share::new(ParticipantId::new(i), w))
                .collect();
            Expense::new(ParticipantId::new(payer), amount, shares)
        })
}

/// Strategy for generating a transaction between two participants
fn transaction_strategy(size: usize) -> impl Strategy<Value = Transaction> {
    (0..size, 0..size, amount_strategy()).prop_map(|(payer, receiver, amount)| {
        Transaction::new(ParticipantId::new(payer), ParticipantId::new(receiver), amount)
    })
}

/// Strategy for generating a full ledger: participant count, expenses, transactions
fn ledger_strategy() -> impl Strategy<Value = (usize, Vec<Expense>, Vec<Transaction>)> {
    (2..=MAX_PARTICIPANTS).prop_flat_map(|size| {
        (
            Just(size),
            prop::collection::vec(expense_strategy(size), 0..15),
            prop::collection::vec(transaction_strategy(size), 0..15),
        )
    })
}

fn net_balances(matrix: &DebtMatrix) -> Vec<Amount> {
    (0..matrix.size())
        .map(|i| matrix.net_balance(ParticipantId::new(i)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: after aggregation every pair owes in at most one direction
    #[test]
    fn prop_netting_invariant((size, expenses, transactions) in ledger_strategy()) {
        let matrix = compute_debt_matrix(&registry(size), None, &expenses, &transactions).unwrap();

        for i in 0..size {
            for j in 0..size {
                if i == j {
                    continue;
                }
                let forward = matrix.get(ParticipantId::new(i), ParticipantId::new(j));
                let backward = matrix.get(ParticipantId::new(j), ParticipantId::new(i));
                prop_assert_eq!(forward.min(backward), Amount::zero());
            }
        }
    }

    /// Property: no netted cell is negative and the diagonal stays zero
    #[test]
    fn prop_non_negative((size, expenses, transactions) in ledger_strategy()) {
        let matrix = compute_debt_matrix(&registry(size), None, &expenses, &transactions).unwrap();

        for row in matrix.rows() {
            for cell in row {
                prop_assert!(!cell.is_negative());
            }
        }
        for i in 0..size {
            prop_assert!(matrix.get(ParticipantId::new(i), ParticipantId::new(i)).is_zero());
        }
    }

    /// Property: net balances always sum to exactly zero
    #[test]
    fn prop_money_conservation((size, expenses, transactions) in ledger_strategy()) {
        let matrix = compute_debt_matrix(&registry(size), None, &expenses, &transactions).unwrap();
        let total: Amount = net_balances(&matrix).into_iter().sum();
        prop_assert_eq!(total, Amount::zero());
    }

    /// Property: net balances do not depend on netting
    ///
    /// Netting only cancels opposing debts, so each participant's balance
    /// equals what the raw expenses and transactions imply.
    #[test]
    fn prop_balances_match_raw_events((size, expenses, transactions) in ledger_strategy()) {
        let matrix = compute_debt_matrix(&registry(size), None, &expenses, &transactions).unwrap();

        let mut expected = vec![Amount::zero(); size];
        for expense in &expenses {
            for (participant, owed) in expense.split().unwrap() {
                expected[participant.index()] -= &owed;
                expected[expense.payer.index()] += owed;
            }
        }
        for transaction in &transactions {
            expected[transaction.payer.index()] += &transaction.amount;
            expected[transaction.receiver.index()] -= &transaction.amount;
        }

        prop_assert_eq!(net_balances(&matrix), expected);
    }

    /// Property: each share is exactly A·w/W and the shares add back to A
    #[test]
    fn prop_weight_proportionality(
        amount in -1_000_000i64..1_000_000,
        weights in prop::collection::vec(0u32..20, 1..8),
    ) {
        prop_assume!(weights.iter().any(|w| *w > 0));
        let total: i64 = weights.iter().map(|w| i64::from(*w)).sum();
        let expense = Expense::new(
            ParticipantId::new(0),
            Amount::from(amount),
            weights
                .iter()
                .enumerate()
                .map(|(i, w)| Share::new(ParticipantId::new(i), *w))
                .collect(),
        );

        let split = expense.split().unwrap();
        for ((_, share), weight) in split.iter().zip(&weights) {
            prop_assert_eq!(share * total, Amount::from(amount) * i64::from(*weight));
        }
        prop_assert_eq!(split.into_iter().map(|(_, a)| a).sum::<Amount>(), Amount::from(amount));
    }

    /// Property: folding a base state equals folding its events directly
    ///
    /// Netting keeps each pair's difference, so resuming from a netted
    /// matrix lands on exactly the same cells.
    #[test]
    fn prop_base_state_is_additive(
        (size, expenses, transactions) in ledger_strategy(),
        cut in 0usize..15,
    ) {
        let reg = registry(size);
        let (early, late) = expenses.split_at(cut.min(expenses.len()));

        let base = compute_debt_matrix(&reg, None, early, &[]).unwrap();
        let resumed = compute_debt_matrix(&reg, Some(&base), late, &transactions).unwrap();
        let direct = compute_debt_matrix(&reg, None, &expenses, &transactions).unwrap();

        prop_assert_eq!(resumed, direct);
    }
}
