//! Joint count tables between two partitions.
//!
//! The contingency table records, for every observed pair of labels
//! `(a, b)`, how many nodes carry label `a` in the first partition and
//! label `b` in the second. Every pairwise similarity measure in
//! [`crate::metrics`] is a closed-form function of this table and its
//! marginals, so it is built once per comparison and thrown away.
//!
//! Storage is sparse (only observed pairs), because label spaces may be
//! large and non-contiguous; worst case O(k₁·k₂) entries for k₁ and k₂
//! distinct labels, built in O(N).

use crate::error::{Error, Result};
use crate::partition::Partition;
use std::collections::HashMap;

/// Sparse joint-count table between two partitions over the same node set.
#[derive(Debug, Clone)]
pub struct ContingencyTable {
    counts: HashMap<(usize, usize), usize>,
    row_sums: HashMap<usize, usize>,
    col_sums: HashMap<usize, usize>,
    n: usize,
}

impl ContingencyTable {
    /// Build the table for a pair of partitions.
    ///
    /// Fails with [`Error::DimensionMismatch`] if the partitions cover
    /// different node counts.
    pub fn build(a: &Partition, b: &Partition) -> Result<Self> {
        if a.len() != b.len() {
            return Err(Error::DimensionMismatch {
                expected: a.len(),
                found: b.len(),
            });
        }

        let mut counts = HashMap::new();
        let mut row_sums = HashMap::new();
        let mut col_sums = HashMap::new();
        for (&la, &lb) in a.labels().iter().zip(b.labels()) {
            *counts.entry((la, lb)).or_insert(0) += 1;
            *row_sums.entry(la).or_insert(0) += 1;
            *col_sums.entry(lb).or_insert(0) += 1;
        }

        Ok(Self {
            counts,
            row_sums,
            col_sums,
            n: a.len(),
        })
    }

    /// Co-occurrence count for a label pair (0 if never observed).
    pub fn count(&self, label_a: usize, label_b: usize) -> usize {
        self.counts.get(&(label_a, label_b)).copied().unwrap_or(0)
    }

    /// Observed `(label_a, label_b) → count` entries.
    pub fn entries(&self) -> impl Iterator<Item = (&(usize, usize), &usize)> {
        self.counts.iter()
    }

    /// Size of one community in the first partition (0 if absent).
    pub fn row_sum(&self, label: usize) -> usize {
        self.row_sums.get(&label).copied().unwrap_or(0)
    }

    /// Size of one community in the second partition (0 if absent).
    pub fn col_sum(&self, label: usize) -> usize {
        self.col_sums.get(&label).copied().unwrap_or(0)
    }

    /// Community sizes of the first partition (row marginals).
    pub fn row_sums(&self) -> impl Iterator<Item = (&usize, &usize)> {
        self.row_sums.iter()
    }

    /// Community sizes of the second partition (column marginals).
    pub fn col_sums(&self) -> impl Iterator<Item = (&usize, &usize)> {
        self.col_sums.iter()
    }

    /// Total node count N.
    pub fn n(&self) -> usize {
        self.n
    }
}
