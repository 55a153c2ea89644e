//! Validated community partitions.
//!
//! A [`Partition`] assigns every node `0..N-1` to exactly one community.
//! It is the unit of exchange between community-detection collaborators
//! (which produce membership vectors), the similarity metrics, and the
//! consensus machinery. Once constructed it is immutable.
//!
//! Labels are plain `usize` values and need not be contiguous;
//! [`Partition::from_labels`] densifies arbitrary hashable labels into
//! `0..k` ids in first-appearance order, which is how raw memberships from
//! external detectors (string-keyed, sparse integer, …) enter the engine.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// An immutable assignment of every node to exactly one community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    labels: Vec<usize>,
}

impl Partition {
    /// Create a partition from a membership vector.
    ///
    /// `n_nodes` is the expected node count of the reference graph; the
    /// vector must carry exactly one label per node.
    pub fn new(labels: Vec<usize>, n_nodes: usize) -> Result<Self> {
        if labels.len() != n_nodes {
            return Err(Error::LengthMismatch {
                expected: n_nodes,
                found: labels.len(),
            });
        }
        Ok(Self { labels })
    }

    /// Create a partition from arbitrary hashable labels.
    ///
    /// Labels are densified to `0..k` in first-appearance order, so
    /// `["a", "a", "b"]` and `[7, 7, 42]` both become `[0, 0, 1]`.
    pub fn from_labels<L>(labels: &[L], n_nodes: usize) -> Result<Self>
    where
        L: Hash + Eq,
    {
        if labels.len() != n_nodes {
            return Err(Error::LengthMismatch {
                expected: n_nodes,
                found: labels.len(),
            });
        }

        let mut ids: HashMap<&L, usize> = HashMap::new();
        let mut dense = Vec::with_capacity(labels.len());
        for label in labels {
            let next = ids.len();
            let id = *ids.entry(label).or_insert(next);
            dense.push(id);
        }
        Ok(Self { labels: dense })
    }

    /// Create a partition from labels that may be missing.
    ///
    /// Fails with [`Error::MissingLabel`] on the first `None` entry.
    pub fn from_optional_labels<L>(labels: &[Option<L>], n_nodes: usize) -> Result<Self>
    where
        L: Hash + Eq,
    {
        let mut present = Vec::with_capacity(labels.len());
        for (node, label) in labels.iter().enumerate() {
            match label {
                Some(l) => present.push(l),
                None => return Err(Error::MissingLabel { node }),
            }
        }
        Self::from_labels(&present, n_nodes)
    }

    /// Community label of a node, or `None` if the index is out of range.
    pub fn membership_of(&self, node: usize) -> Option<usize> {
        self.labels.get(node).copied()
    }

    /// The full membership vector.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Distinct community labels, sorted ascending.
    pub fn distinct_labels(&self) -> Vec<usize> {
        let mut unique = self.labels.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Number of distinct communities.
    pub fn n_communities(&self) -> usize {
        self.distinct_labels().len()
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the partition covers zero nodes.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether two nodes share a community label.
    ///
    /// Out-of-range indices count as not sharing.
    pub fn same_community(&self, i: usize, j: usize) -> bool {
        match (self.labels.get(i), self.labels.get(j)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Wrap an already-dense membership vector without revalidation.
    pub(crate) fn from_dense(labels: Vec<usize>) -> Self {
        Self { labels }
    }

    /// Group node indices by community label.
    ///
    /// This is the access pattern the consensus builder relies on: it lets
    /// co-membership counts be accumulated per group instead of scanning
    /// all N² node pairs.
    pub fn groups(&self) -> HashMap<usize, Vec<usize>> {
        let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
        for (node, &label) in self.labels.iter().enumerate() {
            groups.entry(label).or_default().push(node);
        }
        groups
    }
}

/// A collaborator that can produce a partition for a fixed node count.
///
/// Community-detection algorithms (Louvain, edge betweenness, fast greedy,
/// label propagation, …) live behind this seam: the engine never calls into
/// a graph library, it only consumes memberships. Implementing the trait on
/// a stub makes detection trivially mockable in tests.
pub trait PartitionSource {
    /// Produce a partition covering `n_nodes` nodes.
    fn partition(&self, n_nodes: usize) -> Result<Partition>;
}

impl<F> PartitionSource for F
where
    F: Fn(usize) -> Result<Partition>,
{
    fn partition(&self, n_nodes: usize) -> Result<Partition> {
        self(n_nodes)
    }
}

/// Collect one partition from each source, validating the shared node count.
pub fn collect_ensemble(sources: &[&dyn PartitionSource], n_nodes: usize) -> Result<Vec<Partition>> {
    let mut ensemble = Vec::with_capacity(sources.len());
    for source in sources {
        let partition = source.partition(n_nodes)?;
        if partition.len() != n_nodes {
            return Err(Error::DimensionMismatch {
                expected: n_nodes,
                found: partition.len(),
            });
        }
        ensemble.push(partition);
    }
    Ok(ensemble)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_length_checked() {
        assert!(Partition::new(vec![0, 0, 1], 3).is_ok());
        let err = Partition::new(vec![0, 0, 1], 4).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_from_labels_densifies() {
        let p = Partition::from_labels(&["red", "red", "blue", "red"], 4).unwrap();
        assert_eq!(p.labels(), &[0, 0, 1, 0]);

        let q = Partition::from_labels(&[7usize, 7, 42, 7], 4).unwrap();
        assert_eq!(p, q);
    }

    #[test]
    fn test_from_optional_labels_missing() {
        let labels = [Some(0usize), None, Some(1)];
        let err = Partition::from_optional_labels(&labels, 3).unwrap_err();
        assert_eq!(err, Error::MissingLabel { node: 1 });
    }

    #[test]
    fn test_accessors() {
        let p = Partition::new(vec![3, 3, 5, 9], 4).unwrap();
        assert_eq!(p.membership_of(2), Some(5));
        assert_eq!(p.membership_of(10), None);
        assert_eq!(p.distinct_labels(), vec![3, 5, 9]);
        assert_eq!(p.n_communities(), 3);
        assert!(p.same_community(0, 1));
        assert!(!p.same_community(0, 2));
        assert!(!p.same_community(0, 99));
    }

    #[test]
    fn test_groups() {
        let p = Partition::new(vec![0, 1, 0, 1], 4).unwrap();
        let groups = p.groups();
        assert_eq!(groups[&0], vec![0, 2]);
        assert_eq!(groups[&1], vec![1, 3]);
    }

    #[test]
    fn test_collect_ensemble_checks_width() {
        let wide = |_n: usize| Partition::new(vec![0, 0, 1], 3);
        let sources: Vec<&dyn PartitionSource> = vec![&wide];
        let err = collect_ensemble(&sources, 4).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 4,
                found: 3
            }
        );
    }
}
