//! Consensus clustering over an ensemble of candidate partitions.
//!
//! Different community-detection algorithms (or different runs of one
//! stochastic algorithm) rarely agree exactly. Consensus clustering
//! reconciles an ensemble of candidate partitions into a single partition
//! that keeps the structure the ensemble agrees on and discards the rest.
//!
//! ## Pipeline
//!
//! ```text
//! ensemble of Partitions
//!        │
//!        ▼
//! ConsensusMatrix        entry (i,j) = fraction of members that
//!        │               co-cluster nodes i and j
//!        ▼
//! thresholding           agreement < threshold ⇒ "no agreement",
//!        │               distance forced to the ceiling (1.0)
//!        ▼
//! agglomeration          distance = 1 − agreement; single / complete /
//!        │               average linkage over the thresholded distances
//!        ▼
//! dendrogram cut         fixed cluster count k, or maximum merge
//!        │               distance d (mutually exclusive)
//!        ▼
//! final Partition
//! ```
//!
//! ## Complexity
//!
//! The matrix costs O(N²) memory and, because accumulation walks label
//! groups rather than all node pairs, O(|ensemble| · Σ group²) time. The
//! matrix lives only for the duration of one resolver run unless the
//! caller requests it via [`ConsensusClustering::resolve_full`].
//!
//! ## References
//!
//! - Lancichinetti & Fortunato (2012). "Consensus clustering in complex
//!   networks." Scientific Reports 2, 336.
//! - Strehl & Ghosh (2002). "Cluster ensembles — a knowledge reuse
//!   framework for combining multiple partitions."

mod matrix;
mod resolver;

pub use matrix::ConsensusMatrix;
pub use resolver::{
    ConsensusClustering, ConsensusRun, CutCriterion, Linkage, DEFAULT_THRESHOLD,
};
