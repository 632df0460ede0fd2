//! Ledger input documents
//!
//! External collaborators hand the engine a JSON document that refers to
//! participants by name. [`LedgerInput::resolve`] turns it into the
//! index-based records the engine works on.

use crate::Result;
use ledger_core::{
    Amount, DebtMatrix, Expense, ParticipantId, ParticipantRegistry, Share, Transaction,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Full ledger as supplied by a collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerInput {
    /// Participants in registration order
    pub participants: Vec<ParticipantInput>,

    /// Matrix from the previous run, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_state: Option<BaseStateInput>,

    /// Expenses recorded since the base state
    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,

    /// Transactions recorded since the base state
    #[serde(default)]
    pub transactions: Vec<TransactionInput>,
}

/// Participant entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInput {
    /// Display name
    pub name: String,

    /// Opaque caller data, such as an external account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux: Option<String>,
}

/// Labeled debt matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStateInput {
    /// Column names, one per participant in registration order
    pub header: Vec<String>,

    /// Rows in registration order
    pub rows: Vec<BaseStateRow>,
}

/// One labeled row of the base state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStateRow {
    /// Debtor name
    pub name: String,

    /// What the debtor owes each column
    pub amounts: Vec<Decimal>,
}

/// Expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    /// Payer name
    pub payer: String,

    /// Total paid
    pub amount: Decimal,

    /// Free-text label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Weighted shares by participant name
    pub shares: Vec<ShareInput>,

    /// When the expense happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Share entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInput {
    /// Participant name
    pub participant: String,

    /// Relative weight
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// Transaction entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Who paid
    pub payer: String,

    /// Who received
    pub receiver: String,

    /// Amount transferred
    pub amount: Decimal,

    /// When the transfer happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Ledger with every name resolved to a [`ParticipantId`]
#[derive(Debug, Clone)]
pub struct ResolvedLedger {
    /// Registry built from the participant list
    pub registry: ParticipantRegistry<Option<String>>,

    /// Base state, checked against the registry
    pub base_state: Option<DebtMatrix>,

    /// Resolved expenses
    pub expenses: Vec<Expense>,

    /// Resolved transactions
    pub transactions: Vec<Transaction>,
}

impl LedgerInput {
    /// Parse from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build the registry and resolve every name reference
    pub fn resolve(&self) -> Result<ResolvedLedger> {
        let registry = ParticipantRegistry::from_entries(
            self.participants
                .iter()
                .map(|p| (p.name.as_str(), p.aux.clone())),
        )?;

        let base_state = match &self.base_state {
            Some(base) => {
                let rows = base
                    .rows
                    .iter()
                    .map(|row| (row.name.clone(), amounts(&row.amounts)))
                    .collect();
                Some(DebtMatrix::from_labeled_rows(&registry, base.header.as_slice(), rows)?)
            }
            None => None,
        };

        let expenses = self
            .expenses
            .iter()
            .map(|expense| {
                let shares = expense
                    .shares
                    .iter()
                    .map(|s| Ok(Share::new(resolve(&registry, &s.participant)?, s.weight)))
                    .collect::<Result<Vec<_>>>()?;
                let mut resolved = Expense::new(
                    resolve(&registry, &expense.payer)?,
                    Amount::from_decimal(expense.amount),
                    shares,
                );
                resolved.title = expense.title.clone();
                resolved.occurred_at = expense.occurred_at;
                Ok(resolved)
            })
            .collect::<Result<Vec<_>>>()?;

        let transactions = self
            .transactions
            .iter()
            .map(|t| {
                let mut resolved = Transaction::new(
                    resolve(&registry, &t.payer)?,
                    resolve(&registry, &t.receiver)?,
                    Amount::from_decimal(t.amount),
                );
                resolved.occurred_at = t.occurred_at;
                Ok(resolved)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            participants = registry.count(),
            expenses = expenses.len(),
            transactions = transactions.len(),
            "Resolved ledger input"
        );

        Ok(ResolvedLedger {
            registry,
            base_state,
            expenses,
            transactions,
        })
    }
}

fn resolve<A>(registry: &ParticipantRegistry<A>, name: &str) -> Result<ParticipantId> {
    Ok(registry.resolve(name)?)
}

fn amounts(values: &[Decimal]) -> Vec<Amount> {
    values.iter().copied().map(Amount::from_decimal).collect()
}
