//! Agglomerative merge history, cuttable into a flat partition.
//!
//! A dendrogram records the sequence of merges performed by hierarchical
//! clustering. Cluster ids follow the SciPy/kodama convention: the original
//! items are clusters `0..n-1`, and the i-th merge creates cluster `n + i`.
//! Merge distances are non-decreasing in merge order.
//!
//! Cutting converts the tree into a flat [`Partition`]: either keep every
//! merge at distance ≤ some threshold ([`Dendrogram::cut_at_distance`],
//! inclusive), or apply exactly the number of merges that leaves k clusters
//! standing ([`Dendrogram::cut_to_k`]). Labels in the result are renumbered
//! to consecutive integers in order of each cluster's lowest member index.

use crate::error::{Error, Result};
use crate::partition::Partition;

/// A single merge step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First merged cluster id.
    pub cluster_a: usize,
    /// Second merged cluster id.
    pub cluster_b: usize,
    /// Dissimilarity at which the merge occurred.
    pub distance: f64,
    /// Size of the resulting cluster.
    pub size: usize,
}

/// Record of agglomerative merges over `n_items` original items.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    n_items: usize,
}

impl Dendrogram {
    /// Create an empty dendrogram over `n_items` items.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Append a merge step.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of recorded merges.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// The merge steps, in merge order.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Merge distances in merge order (non-decreasing).
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Flat partition after applying every merge with distance ≤ `threshold`.
    ///
    /// The threshold is inclusive: a merge at exactly `threshold` is kept.
    pub fn cut_at_distance(&self, threshold: f64) -> Partition {
        let applied = self
            .merges
            .iter()
            .take_while(|m| m.distance <= threshold)
            .count();
        self.flatten(applied)
    }

    /// Flat partition with exactly `k` clusters.
    ///
    /// Applies the first `n_items - k` merges, regardless of distance ties,
    /// so the requested count is always met when the dendrogram is complete.
    pub fn cut_to_k(&self, k: usize) -> Result<Partition> {
        if k == 0 || k > self.n_items {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: self.n_items,
            });
        }
        let wanted = self.n_items - k;
        if wanted > self.merges.len() {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: self.n_items,
            });
        }
        Ok(self.flatten(wanted))
    }

    /// Resolve item labels after the first `applied` merges.
    fn flatten(&self, applied: usize) -> Partition {
        // parent[c] points at the cluster that absorbed c; roots point at
        // themselves.
        let mut parent: Vec<usize> = (0..self.n_items + applied).collect();
        for (i, merge) in self.merges.iter().take(applied).enumerate() {
            let created = self.n_items + i;
            parent[merge.cluster_a] = created;
            parent[merge.cluster_b] = created;
        }

        let mut labels = Vec::with_capacity(self.n_items);
        for item in 0..self.n_items {
            let mut cluster = item;
            while parent[cluster] != cluster {
                cluster = parent[cluster];
            }
            labels.push(cluster);
        }

        // Renumber roots to consecutive ids, ordered by lowest member index.
        let mut next = 0;
        let mut remap = vec![usize::MAX; self.n_items + applied];
        for label in labels.iter_mut() {
            if remap[*label] == usize::MAX {
                remap[*label] = next;
                next += 1;
            }
            *label = remap[*label];
        }

        Partition::from_dense(labels)
    }
}
