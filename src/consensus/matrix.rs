//! Co-membership frequency across an ensemble of partitions.

use crate::error::{Error, Result};
use crate::partition::Partition;
use ndarray::Array2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Index into condensed upper-triangle storage for the pair `(i, j)`, i < j.
#[inline]
fn pair_index(i: usize, j: usize, n: usize) -> usize {
    debug_assert!(i < j && j < n);
    i * (2 * n - i - 1) / 2 + (j - i - 1)
}

/// Accumulate one partition's co-membership counts into `counts`.
///
/// Nodes are grouped by label so only within-group pairs are touched:
/// O(Σ group²) per member instead of a full O(N²) scan.
fn accumulate(partition: &Partition, n: usize, counts: &mut [u32]) {
    for members in partition.groups().values() {
        for (slot, &i) in members.iter().enumerate() {
            for &j in &members[slot + 1..] {
                counts[pair_index(i, j, n)] += 1;
            }
        }
    }
}

/// Symmetric N×N matrix of co-membership fractions.
///
/// Entry `(i, j)` is the fraction of ensemble partitions assigning nodes
/// `i` and `j` the same community label. The diagonal is fixed at 1.0 and
/// carries no information; downstream distance computation must skip it.
#[derive(Debug, Clone)]
pub struct ConsensusMatrix {
    values: Array2<f64>,
    n: usize,
}

impl ConsensusMatrix {
    /// Build the consensus matrix for an ensemble.
    ///
    /// Fails with [`Error::EmptyEnsemble`] for zero partitions and
    /// [`Error::DimensionMismatch`] if members disagree on node count.
    /// With the `parallel` feature, per-member counts are computed across
    /// rayon workers and combined by elementwise sum, so worker scheduling
    /// cannot affect the result.
    pub fn build(ensemble: &[Partition]) -> Result<Self> {
        let first = ensemble.first().ok_or(Error::EmptyEnsemble)?;
        let n = first.len();
        for partition in ensemble {
            if partition.len() != n {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: partition.len(),
                });
            }
        }

        let n_pairs = n * n.saturating_sub(1) / 2;

        #[cfg(feature = "parallel")]
        let counts = ensemble
            .par_iter()
            .map(|partition| {
                let mut local = vec![0u32; n_pairs];
                accumulate(partition, n, &mut local);
                local
            })
            .reduce(
                || vec![0u32; n_pairs],
                |mut left, right| {
                    for (l, r) in left.iter_mut().zip(&right) {
                        *l += r;
                    }
                    left
                },
            );

        #[cfg(not(feature = "parallel"))]
        let counts = {
            let mut counts = vec![0u32; n_pairs];
            for partition in ensemble {
                accumulate(partition, n, &mut counts);
            }
            counts
        };

        let m = ensemble.len() as f64;
        let mut values = Array2::from_elem((n, n), 0.0);
        for i in 0..n {
            values[[i, i]] = 1.0;
            for j in (i + 1)..n {
                let fraction = counts[pair_index(i, j, n)] as f64 / m;
                values[[i, j]] = fraction;
                values[[j, i]] = fraction;
            }
        }

        Ok(Self { values, n })
    }

    /// Node count N.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Co-membership fraction for a node pair (1.0 on the diagonal).
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    /// The full matrix, for diagnostics and plotting.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn partition(labels: &[usize]) -> Partition {
        Partition::new(labels.to_vec(), labels.len()).unwrap()
    }

    #[test]
    fn test_single_member_is_indicator() {
        // Ensemble of size 1: the matrix is the 0/1 co-membership
        // indicator of that partition.
        let p = partition(&[0, 0, 1, 1, 2]);
        let matrix = ConsensusMatrix::build(std::slice::from_ref(&p)).unwrap();

        for i in 0..5 {
            for j in 0..5 {
                let expected = if i == j || p.same_community(i, j) {
                    1.0
                } else {
                    0.0
                };
                assert!((matrix.value(i, j) - expected).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_two_member_fractions() {
        // Ensemble {[0,0,1,1], [0,1,1,0]}: "adjacent" pairs agree in one
        // of the two members, "opposite" pairs in neither.
        let ensemble = vec![partition(&[0, 0, 1, 1]), partition(&[0, 1, 1, 0])];
        let matrix = ConsensusMatrix::build(&ensemble).unwrap();

        for &(i, j) in &[(0, 1), (0, 3), (1, 2), (2, 3)] {
            assert!((matrix.value(i, j) - 0.5).abs() < EPS);
        }
        for &(i, j) in &[(0, 2), (1, 3)] {
            assert!(matrix.value(i, j).abs() < EPS);
        }

        // Symmetric, unit diagonal, all values in [0, 1].
        for i in 0..4 {
            assert!((matrix.value(i, i) - 1.0).abs() < EPS);
            for j in 0..4 {
                assert!((matrix.value(i, j) - matrix.value(j, i)).abs() < EPS);
                assert!((0.0..=1.0).contains(&matrix.value(i, j)));
            }
        }
    }

    #[test]
    fn test_unanimous_ensemble() {
        let ensemble = vec![
            partition(&[0, 0, 1]),
            partition(&[5, 5, 9]),
            partition(&[1, 1, 0]),
        ];
        let matrix = ConsensusMatrix::build(&ensemble).unwrap();
        assert!((matrix.value(0, 1) - 1.0).abs() < EPS);
        assert!(matrix.value(0, 2).abs() < EPS);
        assert!(matrix.value(1, 2).abs() < EPS);
    }

    #[test]
    fn test_empty_ensemble() {
        assert_eq!(
            ConsensusMatrix::build(&[]).unwrap_err(),
            Error::EmptyEnsemble
        );
    }

    #[test]
    fn test_dimension_mismatch() {
        let ensemble = vec![partition(&[0, 0, 1]), partition(&[0, 1])];
        assert_eq!(
            ConsensusMatrix::build(&ensemble).unwrap_err(),
            Error::DimensionMismatch {
                expected: 3,
                found: 2
            }
        );
    }
}
