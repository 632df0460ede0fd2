//! Input records for aggregation
//!
//! Every participant reference is already resolved to a [`ParticipantId`];
//! parsing names and amounts out of external text is the caller's job.

use crate::{Amount, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One participant's portion of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Participant who owes this share
    pub participant: ParticipantId,

    /// Relative weight (0 means "not sharing")
    pub weight: u32,
}

impl Share {
    /// Create a share
    pub fn new(participant: ParticipantId, weight: u32) -> Self {
        Self {
            participant,
            weight,
        }
    }
}

/// Shared expense paid by one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Who paid
    pub payer: ParticipantId,

    /// Total amount paid
    pub amount: Amount,

    /// Weighted split; the weights must not all be zero
    pub shares: Vec<Share>,

    /// Free-text label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// When the expense happened. Carried for callers, never used in sums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// Create an expense without a title
    pub fn new(payer: ParticipantId, amount: Amount, shares: Vec<Share>) -> Self {
        Self {
            payer,
            amount,
            shares,
            title: None,
            occurred_at: None,
        }
    }

    /// Attach a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach the time the expense happened
    pub fn with_time(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    /// Sum of all share weights
    pub fn total_weight(&self) -> u64 {
        self.shares.iter().map(|s| u64::from(s.weight)).sum()
    }

    /// Exact amount owed for each share, in share order
    ///
    /// Returns `None` when the total weight is zero.
    pub fn split(&self) -> Option<Vec<(ParticipantId, Amount)>> {
        let total = i64::try_from(self.total_weight()).ok()?;
        let per_unit = self.amount.checked_div(total)?;
        Some(
            self.shares
                .iter()
                .map(|s| (s.participant, &per_unit * i64::from(s.weight)))
                .collect(),
        )
    }
}

/// Money already moved from payer to receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Who sent the money
    pub payer: ParticipantId,

    /// Who received it
    pub receiver: ParticipantId,

    /// Amount moved
    pub amount: Amount,

    /// When the money moved. Carried for callers, never used in sums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Create a transaction
    pub fn new(payer: ParticipantId, receiver: ParticipantId, amount: Amount) -> Self {
        Self {
            payer,
            receiver,
            amount,
            occurred_at: None,
        }
    }

    /// Attach the time the money moved
    pub fn with_time(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}
