//! Pairwise debt matrix
//!
//! `cell[debtor][creditor]` is what `debtor` owes `creditor`. Cells live in a
//! flat row-major arena; rows and columns follow registration order, so a
//! participant's debts are found purely by index.
//!
//! # Netting
//!
//! ```text
//! before:  A owes B 30, B owes A 50
//! after:   A owes B 0,  B owes A 20
//! ```
//!
//! After [`DebtMatrix::net_pairs`] at most one direction of every pair is
//! nonzero and no cell is negative.

use crate::{Amount, Error, ParticipantId, ParticipantRegistry, Result};
use serde::{Deserialize, Serialize};

/// Square matrix of pairwise debts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Amount>>", into = "Vec<Vec<Amount>>")]
pub struct DebtMatrix {
    size: usize,
    cells: Vec<Amount>,
}

impl DebtMatrix {
    /// All-zero matrix for `size` participants
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![Amount::zero(); size * size],
        }
    }

    /// Build from rows, rejecting anything that is not square
    pub fn from_rows(rows: Vec<Vec<Amount>>) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::DimensionMismatch {
                    expected: size,
                    found: format!("row {} has {} cells", i, row.len()),
                });
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    /// Build a base state from externally labeled rows
    ///
    /// `header` names the columns and each row carries its own name. Every
    /// name must be the participant registered at that position, which
    /// catches external data that was reordered since the last run.
    pub fn from_labeled_rows<A, S>(
        registry: &ParticipantRegistry<A>,
        header: &[S],
        rows: Vec<(S, Vec<Amount>)>,
    ) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let n = registry.count();
        if header.len() != n || rows.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: format!("{} columns and {} rows", header.len(), rows.len()),
            });
        }

        for (index, name) in header.iter().enumerate() {
            check_position(registry, name.as_ref(), index)?;
        }

        let mut plain = Vec::with_capacity(n);
        for (index, (name, cells)) in rows.into_iter().enumerate() {
            check_position(registry, name.as_ref(), index)?;
            plain.push(cells);
        }

        let matrix = Self::from_rows(plain)?;
        matrix.ensure_zero_diagonal()?;
        Ok(matrix)
    }

    /// Number of participants (rows and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Fail unless the matrix is `expected x expected`
    pub fn ensure_size(&self, expected: usize) -> Result<()> {
        if self.size != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: format!("{}x{}", self.size, self.size),
            });
        }
        Ok(())
    }

    /// Fail if any participant owes itself
    pub fn ensure_zero_diagonal(&self) -> Result<()> {
        for i in 0..self.size {
            let cell = &self.cells[i * self.size + i];
            if !cell.is_zero() {
                return Err(Error::InconsistentBaseState(format!(
                    "diagonal cell {} is {}",
                    i, cell
                )));
            }
        }
        Ok(())
    }

    /// What `debtor` owes `creditor`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, debtor: ParticipantId, creditor: ParticipantId) -> Amount {
        self.cells[self.offset(debtor, creditor)].clone()
    }

    /// Overwrite a cell
    pub fn set(&mut self, debtor: ParticipantId, creditor: ParticipantId, amount: Amount) {
        let offset = self.offset(debtor, creditor);
        self.cells[offset] = amount;
    }

    /// Add to a cell
    pub fn credit(&mut self, debtor: ParticipantId, creditor: ParticipantId, amount: Amount) {
        let offset = self.offset(debtor, creditor);
        self.cells[offset] += amount;
    }

    /// Subtract from a cell; the result may go negative until netting
    pub fn debit(&mut self, debtor: ParticipantId, creditor: ParticipantId, amount: Amount) {
        let offset = self.offset(debtor, creditor);
        self.cells[offset] -= amount;
    }

    /// Rows in registration order
    pub fn rows(&self) -> impl Iterator<Item = &[Amount]> + '_ {
        // chunks(0) panics, and an empty matrix has no rows anyway
        self.cells.chunks(self.size.max(1)).take(self.size)
    }

    /// Total `participant` owes everyone else
    pub fn owed_by(&self, participant: ParticipantId) -> Amount {
        let i = participant.index();
        (0..self.size)
            .filter(|&j| j != i)
            .map(|j| &self.cells[i * self.size + j])
            .sum()
    }

    /// Total everyone else owes `participant`
    pub fn owed_to(&self, participant: ParticipantId) -> Amount {
        let j = participant.index();
        (0..self.size)
            .filter(|&i| i != j)
            .map(|i| &self.cells[i * self.size + j])
            .sum()
    }

    /// Owed to `participant` minus owed by `participant`
    pub fn net_balance(&self, participant: ParticipantId) -> Amount {
        self.owed_to(participant) - self.owed_by(participant)
    }

    /// Collapse opposing debts so each pair owes in one direction only
    ///
    /// Every unordered pair is visited once; the smaller side is subtracted
    /// from the larger and zeroed. Equal sides both end at zero. The
    /// diagonal is never touched.
    pub fn net_pairs(&mut self) {
        let n = self.size;
        for i in 0..n {
            for j in (i + 1)..n {
                let forward = &self.cells[i * n + j];
                let backward = &self.cells[j * n + i];
                if forward < backward {
                    self.cells[j * n + i] = backward - forward;
                    self.cells[i * n + j] = Amount::zero();
                } else {
                    self.cells[i * n + j] = forward - backward;
                    self.cells[j * n + i] = Amount::zero();
                }
            }
        }
    }

    /// True if every pair owes in at most one direction and no cell is negative
    pub fn is_netted(&self) -> bool {
        let n = self.size;
        (0..n).all(|i| {
            (0..n).filter(|&j| j != i).all(|j| {
                let forward = &self.cells[i * n + j];
                let backward = &self.cells[j * n + i];
                !forward.is_negative() && (forward.is_zero() || backward.is_zero())
            })
        })
    }

    /// Nonzero off-diagonal cells as `(debtor, creditor, amount)`
    pub fn debts(&self) -> impl Iterator<Item = (ParticipantId, ParticipantId, Amount)> + '_ {
        let n = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(offset, amount)| offset / n != offset % n && !amount.is_zero())
            .map(move |(offset, amount)| {
                (
                    ParticipantId::new(offset / n),
                    ParticipantId::new(offset % n),
                    amount.clone(),
                )
            })
    }

    /// Sum of all off-diagonal cells
    pub fn total(&self) -> Amount {
        self.debts().map(|(_, _, amount)| amount).sum()
    }

    /// True if no one owes anyone anything
    pub fn is_zero(&self) -> bool {
        self.cells.iter().all(Amount::is_zero)
    }

    fn offset(&self, debtor: ParticipantId, creditor: ParticipantId) -> usize {
        assert!(
            debtor.index() < self.size && creditor.index() < self.size,
            "matrix index ({}, {}) out of range for size {}",
            debtor.index(),
            creditor.index(),
            self.size
        );
        debtor.index() * self.size + creditor.index()
    }
}

fn check_position<A>(registry: &ParticipantRegistry<A>, name: &str, index: usize) -> Result<()> {
    if registry.is_valid_at(name, index) {
        Ok(())
    } else {
        Err(Error::MisplacedParticipant {
            name: name.to_string(),
            index,
        })
    }
}

impl TryFrom<Vec<Vec<Amount>>> for DebtMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<Amount>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<DebtMatrix> for Vec<Vec<Amount>> {
    fn from(matrix: DebtMatrix) -> Self {
        matrix.rows().map(<[Amount]>::to_vec).collect()
    }
}
