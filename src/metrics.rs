//! Partition similarity measures.
//!
//! Measures for quantifying agreement between two community partitions of
//! the same node set, computed from a [`ContingencyTable`] rather than by
//! enumerating node pairs.
//!
//! # Measures Overview
//!
//! | Measure | Range | Identical partitions | Flavor |
//! |---------|-------|----------------------|--------|
//! | [`nmi`] | [0, 1] | 1 | Information-theoretic, normalized |
//! | [`variation_of_information`] | [0, ∞) | 0 | Information-theoretic, a true metric |
//! | [`rand_index`] | [0, 1] | 1 | Pair-counting |
//! | [`adjusted_rand_index`] | [-1, 1] | 1 | Pair-counting, chance-corrected |
//!
//! # Definitions
//!
//! With community sizes `n_x`, `n_y`, joint counts `n_xy` and `N` nodes
//! (all logarithms natural, `0·log 0 = 0`):
//!
//! ```text
//! H(X)    = -Σ_x (n_x/N) ln(n_x/N)
//! I(X;Y)  =  Σ_xy (n_xy/N) ln( (n_xy/N) / ((n_x/N)(n_y/N)) )
//! NMI     =  2·I(X;Y) / (H(X) + H(Y))
//! VI      =  H(X) + H(Y) - 2·I(X;Y)
//! ```
//!
//! The pair-counting measures use closed-form binomial sums over the table
//! (`Σ C(n_xy,2)`, `Σ C(n_x,2)`, `Σ C(n_y,2)`), which is O(k₁·k₂) instead
//! of the O(N²) a literal pairwise scan would cost.
//!
//! # Conventions for degenerate inputs
//!
//! Metrics are total over valid tables, with two documented exceptions:
//!
//! - NMI is 1.0 when both partitions are a single community (perfect
//!   agreement), and 0.0 when exactly one of them is.
//! - [`rand_index`] and [`adjusted_rand_index`] need at least one node
//!   pair, so N < 2 is [`Error::DegenerateInput`]. ARI's chance
//!   correction degenerates when `max_index == expected`; that case
//!   returns 1.0 (both clusterings are identical up to the correction).
//!
//! # Example
//!
//! ```rust
//! use concord::{compare, Partition};
//!
//! let louvain = Partition::new(vec![0, 0, 1, 1, 2], 5).unwrap();
//! let greedy = Partition::new(vec![0, 0, 0, 1, 1], 5).unwrap();
//!
//! let scores = compare(&louvain, &greedy).unwrap();
//! assert!(scores.nmi < 1.0);
//! assert!(scores.variation_of_information > 0.0);
//! ```
//!
//! # References
//!
//! - Rand (1971). "Objective criteria for the evaluation of clustering methods"
//! - Hubert & Arabie (1985). "Comparing partitions" (ARI)
//! - Strehl & Ghosh (2002). "Cluster ensembles" (NMI)
//! - Meilă (2007). "Comparing clusterings — an information based distance" (VI)

use crate::contingency::ContingencyTable;
use crate::error::{Error, Result};
use crate::partition::Partition;

/// Shannon entropy of one partition's community-size distribution.
fn marginal_entropy<'a>(sizes: impl Iterator<Item = &'a usize>, n: f64) -> f64 {
    sizes
        .map(|&c| {
            let p = c as f64 / n;
            if p > 0.0 {
                -p * p.ln()
            } else {
                0.0
            }
        })
        .sum()
}

/// C(n, 2) as a float.
fn comb2(n: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        (n * (n - 1) / 2) as f64
    }
}

/// Mutual information I(X;Y) between the two partitions, in nats.
///
/// Summed only over observed label pairs (`n_xy > 0`).
pub fn mutual_information(table: &ContingencyTable) -> f64 {
    let n = table.n() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let mut mi = 0.0;
    for (&(la, lb), &count) in table.entries() {
        let p_joint = count as f64 / n;
        let p_a = table.row_sum(la) as f64 / n;
        let p_b = table.col_sum(lb) as f64 / n;
        if p_joint > 0.0 && p_a > 0.0 && p_b > 0.0 {
            mi += p_joint * (p_joint / (p_a * p_b)).ln();
        }
    }
    mi
}

/// Normalized Mutual Information, `2·I / (H(X) + H(Y))`.
///
/// 1.0 when both partitions are trivial (single community each, perfect
/// agreement by convention); 0.0 when exactly one is trivial.
pub fn nmi(table: &ContingencyTable) -> f64 {
    let n = table.n() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let h_a = marginal_entropy(table.row_sums().map(|(_, c)| c), n);
    let h_b = marginal_entropy(table.col_sums().map(|(_, c)| c), n);

    match (h_a > 0.0, h_b > 0.0) {
        (false, false) => 1.0,
        (true, false) | (false, true) => 0.0,
        (true, true) => 2.0 * mutual_information(table) / (h_a + h_b),
    }
}

/// Variation of Information, `H(X) + H(Y) - 2·I(X;Y)`, in nats.
///
/// A true metric over partitions: non-negative, symmetric, and satisfying
/// the triangle inequality; zero iff the partitions induce the same
/// grouping up to label renaming. Clamped at zero to absorb float
/// round-off.
pub fn variation_of_information(table: &ContingencyTable) -> f64 {
    let n = table.n() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let h_a = marginal_entropy(table.row_sums().map(|(_, c)| c), n);
    let h_b = marginal_entropy(table.col_sums().map(|(_, c)| c), n);
    (h_a + h_b - 2.0 * mutual_information(table)).max(0.0)
}

/// Rand Index: the fraction of node pairs on which the partitions agree.
///
/// Agreement means the pair is co-clustered in both partitions or split in
/// both. Computed from binomial sums over the table; fails with
/// [`Error::DegenerateInput`] when N < 2 (no pairs exist).
pub fn rand_index(table: &ContingencyTable) -> Result<f64> {
    let n = table.n();
    if n < 2 {
        return Err(Error::DegenerateInput { n_items: n });
    }

    let sum_joint: f64 = table.entries().map(|(_, &c)| comb2(c)).sum();
    let sum_rows: f64 = table.row_sums().map(|(_, &c)| comb2(c)).sum();
    let sum_cols: f64 = table.col_sums().map(|(_, &c)| comb2(c)).sum();
    let total_pairs = comb2(n);

    // a11: co-clustered in both. a00: split in both, by inclusion-exclusion.
    let a11 = sum_joint;
    let a00 = total_pairs - sum_rows - sum_cols + sum_joint;

    Ok((a11 + a00) / total_pairs)
}

/// Adjusted Rand Index: Rand Index corrected for chance agreement.
///
/// ```text
/// ARI = (Σ C(n_xy,2) - E) / (max_index - E)
/// E         = Σ C(n_x,2) · Σ C(n_y,2) / C(N,2)
/// max_index = (Σ C(n_x,2) + Σ C(n_y,2)) / 2
/// ```
///
/// Fails with [`Error::DegenerateInput`] when N < 2. Returns 1.0 in the
/// degenerate `max_index == E` case.
pub fn adjusted_rand_index(table: &ContingencyTable) -> Result<f64> {
    let n = table.n();
    if n < 2 {
        return Err(Error::DegenerateInput { n_items: n });
    }

    let sum_joint: f64 = table.entries().map(|(_, &c)| comb2(c)).sum();
    let sum_rows: f64 = table.row_sums().map(|(_, &c)| comb2(c)).sum();
    let sum_cols: f64 = table.col_sums().map(|(_, &c)| comb2(c)).sum();

    let expected = sum_rows * sum_cols / comb2(n);
    let max_index = (sum_rows + sum_cols) / 2.0;

    let denom = max_index - expected;
    if denom.abs() < 1e-10 {
        return Ok(1.0);
    }
    Ok((sum_joint - expected) / denom)
}

/// All pairwise similarity scores for one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Normalized Mutual Information, [0, 1].
    pub nmi: f64,
    /// Variation of Information in nats, [0, ∞).
    pub variation_of_information: f64,
    /// Rand Index, [0, 1].
    pub rand_index: f64,
    /// Adjusted Rand Index, [-1, 1].
    pub adjusted_rand_index: f64,
}

/// Compare two partitions across all measures at once.
///
/// Builds the contingency table once and evaluates every metric from it,
/// which is how a detection-method report (Louvain vs. edge betweenness
/// vs. fast greedy, …) consumes the engine.
pub fn compare(a: &Partition, b: &Partition) -> Result<Comparison> {
    let table = ContingencyTable::build(a, b)?;
    Ok(Comparison {
        nmi: nmi(&table),
        variation_of_information: variation_of_information(&table),
        rand_index: rand_index(&table)?,
        adjusted_rand_index: adjusted_rand_index(&table)?,
    })
}

/// One entry of a pairwise comparison report over an ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairComparison {
    /// Index of the first partition in the ensemble.
    pub first: usize,
    /// Index of the second partition in the ensemble.
    pub second: usize,
    /// Similarity scores for the pair.
    pub scores: Comparison,
}

/// Compare every unordered pair of partitions in an ensemble.
///
/// Returns the upper triangle (`first < second`) in index order.
pub fn pairwise(ensemble: &[Partition]) -> Result<Vec<PairComparison>> {
    let mut report = Vec::with_capacity(ensemble.len().saturating_sub(1) * ensemble.len() / 2);
    for first in 0..ensemble.len() {
        for second in (first + 1)..ensemble.len() {
            report.push(PairComparison {
                first,
                second,
                scores: compare(&ensemble[first], &ensemble[second])?,
            });
        }
    }
    Ok(report)
}
