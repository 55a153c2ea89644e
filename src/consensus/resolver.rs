//! Threshold + agglomerate: turning a consensus matrix into one partition.

use super::matrix::ConsensusMatrix;
use crate::dendrogram::Dendrogram;
use crate::error::{Error, Result};
use crate::partition::Partition;
use kodama::{linkage as kodama_linkage, Method as KodamaMethod};

/// Default agreement cutoff applied before clustering.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Distance assigned to node pairs whose agreement fell below the
/// threshold. The transform `1 - consensus` never exceeds 1.0, so this is
/// the ceiling of the distance scale.
const DISCONNECTED: f64 = 1.0;

/// Inter-cluster distance rule for the agglomeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Minimum pairwise distance between clusters.
    Single,
    /// Maximum pairwise distance between clusters.
    Complete,
    /// Mean pairwise distance between clusters.
    Average,
}

/// How to flatten the dendrogram into the final partition.
///
/// The two criteria are mutually exclusive by construction; configuration
/// layers holding both as optionals go through [`CutCriterion::from_options`]
/// to get the same validation as a hand-built value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutCriterion {
    /// Cut into exactly this many clusters.
    Clusters(usize),
    /// Keep every merge at distance ≤ this value (inclusive).
    Distance(f64),
}

impl CutCriterion {
    /// Build a criterion from an optional-pair configuration surface.
    ///
    /// Exactly one of `target_clusters` and `cut_distance` must be set.
    pub fn from_options(
        target_clusters: Option<usize>,
        cut_distance: Option<f64>,
    ) -> Result<Self> {
        match (target_clusters, cut_distance) {
            (Some(k), None) => Ok(CutCriterion::Clusters(k)),
            (None, Some(d)) => Ok(CutCriterion::Distance(d)),
            (Some(_), Some(_)) => Err(Error::InvalidConfiguration {
                name: "cut",
                message: "target_clusters and cut_distance are mutually exclusive",
            }),
            (None, None) => Err(Error::InvalidConfiguration {
                name: "cut",
                message: "one of target_clusters or cut_distance is required",
            }),
        }
    }
}

/// Everything one consensus run produces.
///
/// The matrix and dendrogram are returned here, and only here; the
/// resolver retains no state between runs, so callers wanting diagnostics
/// must ask for them up front via [`ConsensusClustering::resolve_full`].
#[derive(Debug, Clone)]
pub struct ConsensusRun {
    /// The final consensus partition.
    pub partition: Partition,
    /// The co-membership matrix the run was derived from.
    pub matrix: ConsensusMatrix,
    /// The merge history over thresholded distances.
    pub dendrogram: Dendrogram,
}

/// Consensus clustering over an ensemble of candidate partitions.
///
/// Entries of the consensus matrix below the threshold are treated as "no
/// agreement" and mapped to the ceiling distance; retained entries become
/// `1 - consensus`. Agglomeration runs over those distances with the
/// configured linkage, and the dendrogram is cut by the configured
/// criterion.
///
/// The run is deterministic for a fixed ensemble and configuration: the
/// accumulation order of the matrix cannot affect its sums, and the
/// agglomeration resolves equal-distance ties by kodama's fixed internal
/// ordering, so repeated runs yield the same partition.
///
/// # Example
///
/// ```rust
/// use concord::{ConsensusClustering, CutCriterion, Linkage, Partition};
///
/// let ensemble = vec![
///     Partition::new(vec![0, 0, 1, 1], 4).unwrap(),
///     Partition::new(vec![0, 0, 1, 1], 4).unwrap(),
///     Partition::new(vec![0, 1, 1, 1], 4).unwrap(),
/// ];
///
/// let consensus = ConsensusClustering::new(CutCriterion::Clusters(2))
///     .with_linkage(Linkage::Average)
///     .resolve(&ensemble)
///     .unwrap();
///
/// assert!(consensus.same_community(0, 1));
/// assert!(consensus.same_community(2, 3));
/// assert!(!consensus.same_community(0, 2));
/// ```
#[derive(Debug, Clone)]
pub struct ConsensusClustering {
    threshold: f64,
    linkage: Linkage,
    cut: CutCriterion,
}

impl ConsensusClustering {
    /// Create a resolver with the default threshold
    /// ([`DEFAULT_THRESHOLD`] = 0.5) and average linkage.
    pub fn new(cut: CutCriterion) -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            linkage: Linkage::Average,
            cut,
        }
    }

    /// Set the agreement cutoff, in [0, 1]. Inclusive: a consensus value
    /// exactly at the threshold is retained.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the linkage rule.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfiguration {
                name: "threshold",
                message: "must be within [0, 1]",
            });
        }
        match self.cut {
            CutCriterion::Clusters(0) => Err(Error::InvalidConfiguration {
                name: "target_clusters",
                message: "must be at least 1",
            }),
            CutCriterion::Distance(d) if d.is_nan() || d < 0.0 => {
                Err(Error::InvalidConfiguration {
                    name: "cut_distance",
                    message: "must be a non-negative number",
                })
            }
            _ => Ok(()),
        }
    }

    /// Resolve the ensemble into a single consensus partition.
    pub fn resolve(&self, ensemble: &[Partition]) -> Result<Partition> {
        Ok(self.resolve_full(ensemble)?.partition)
    }

    /// Resolve, also returning the consensus matrix and dendrogram.
    pub fn resolve_full(&self, ensemble: &[Partition]) -> Result<ConsensusRun> {
        self.validate()?;

        let matrix = ConsensusMatrix::build(ensemble)?;
        let n = matrix.n();
        if n < 2 {
            return Err(Error::DegenerateInput { n_items: n });
        }

        // Condensed upper-triangle distances, thresholded.
        let mut condensed = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..(n - 1) {
            for j in (i + 1)..n {
                let agreement = matrix.value(i, j);
                condensed.push(if agreement >= self.threshold {
                    1.0 - agreement
                } else {
                    DISCONNECTED
                });
            }
        }

        let method = match self.linkage {
            Linkage::Single => KodamaMethod::Single,
            Linkage::Complete => KodamaMethod::Complete,
            Linkage::Average => KodamaMethod::Average,
        };

        let steps = kodama_linkage(&mut condensed, n, method);
        let mut dendrogram = Dendrogram::new(n);
        for step in steps.steps() {
            dendrogram.add_merge(step.cluster1, step.cluster2, step.dissimilarity, step.size);
        }

        let partition = match self.cut {
            CutCriterion::Clusters(k) => dendrogram.cut_to_k(k)?,
            CutCriterion::Distance(d) => dendrogram.cut_at_distance(d),
        };

        Ok(ConsensusRun {
            partition,
            matrix,
            dendrogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn partition(labels: &[usize]) -> Partition {
        Partition::new(labels.to_vec(), labels.len()).unwrap()
    }

    /// Pair-equivalence comparison: same grouping regardless of label names.
    fn same_grouping(a: &Partition, b: &Partition) -> bool {
        let n = a.len();
        (0..n).all(|i| ((i + 1)..n).all(|j| a.same_community(i, j) == b.same_community(i, j)))
    }

    #[test]
    fn test_majority_structure_recovered() {
        let ensemble = vec![
            partition(&[0, 0, 1, 1]),
            partition(&[0, 0, 1, 1]),
            partition(&[0, 1, 1, 1]),
        ];

        for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average] {
            let result = ConsensusClustering::new(CutCriterion::Clusters(2))
                .with_linkage(linkage)
                .resolve(&ensemble)
                .unwrap();
            assert!(same_grouping(&result, &partition(&[0, 0, 1, 1])));
        }
    }

    #[test]
    fn test_distance_cut() {
        let ensemble = vec![partition(&[0, 0, 1])];
        let result = ConsensusClustering::new(CutCriterion::Distance(0.0))
            .resolve(&ensemble)
            .unwrap();
        assert!(same_grouping(&result, &partition(&[0, 0, 1])));
    }

    #[test]
    fn test_threshold_boundary_inclusive() {
        // Two members, one agreeing on (0,1): consensus exactly 0.5.
        let ensemble = vec![partition(&[0, 0, 1]), partition(&[0, 1, 2])];

        // At threshold 0.5 the pair is retained and merges at distance 0.5.
        let kept = ConsensusClustering::new(CutCriterion::Distance(0.5))
            .with_threshold(0.5)
            .resolve(&ensemble)
            .unwrap();
        assert!(kept.same_community(0, 1));
        assert!(!kept.same_community(0, 2));

        // Just above it the pair is discarded: all singletons survive.
        let dropped = ConsensusClustering::new(CutCriterion::Distance(0.5))
            .with_threshold(0.51)
            .resolve(&ensemble)
            .unwrap();
        assert!(!dropped.same_community(0, 1));
        assert_eq!(dropped.n_communities(), 3);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20;
        let ensemble: Vec<Partition> = (0..6)
            .map(|_| {
                let labels: Vec<usize> = (0..n).map(|_| rng.random_range(0..3)).collect();
                Partition::new(labels, n).unwrap()
            })
            .collect();

        let resolver = ConsensusClustering::new(CutCriterion::Clusters(3));
        let first = resolver.resolve(&ensemble).unwrap();
        let second = resolver.resolve(&ensemble).unwrap();
        assert!(same_grouping(&first, &second));
    }

    #[test]
    fn test_resolve_full_outputs() {
        let ensemble = vec![partition(&[0, 0, 1, 1]), partition(&[0, 0, 1, 1])];
        let run = ConsensusClustering::new(CutCriterion::Clusters(2))
            .resolve_full(&ensemble)
            .unwrap();

        assert_eq!(run.matrix.n(), 4);
        assert_eq!(run.dendrogram.n_merges(), 3);
        assert!(same_grouping(&run.partition, &partition(&[0, 0, 1, 1])));
        // Merge distances are non-decreasing.
        let distances = run.dendrogram.distances();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_invalid_configuration() {
        let ensemble = vec![partition(&[0, 1]), partition(&[0, 1])];

        let err = ConsensusClustering::new(CutCriterion::Clusters(2))
            .with_threshold(1.5)
            .resolve(&ensemble)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { name: "threshold", .. }));

        let err = ConsensusClustering::new(CutCriterion::Clusters(0))
            .resolve(&ensemble)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfiguration { name: "target_clusters", .. }
        ));

        let err = ConsensusClustering::new(CutCriterion::Distance(-0.1))
            .resolve(&ensemble)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfiguration { name: "cut_distance", .. }
        ));
    }

    #[test]
    fn test_cut_criterion_from_options() {
        assert_eq!(
            CutCriterion::from_options(Some(3), None).unwrap(),
            CutCriterion::Clusters(3)
        );
        assert_eq!(
            CutCriterion::from_options(None, Some(0.4)).unwrap(),
            CutCriterion::Distance(0.4)
        );
        assert!(CutCriterion::from_options(Some(3), Some(0.4)).is_err());
        assert!(CutCriterion::from_options(None, None).is_err());
    }

    #[test]
    fn test_degenerate_and_empty_inputs() {
        let resolver = ConsensusClustering::new(CutCriterion::Clusters(1));

        assert_eq!(resolver.resolve(&[]).unwrap_err(), Error::EmptyEnsemble);

        let tiny = vec![partition(&[0])];
        assert_eq!(
            resolver.resolve(&tiny).unwrap_err(),
            Error::DegenerateInput { n_items: 1 }
        );
    }
}
