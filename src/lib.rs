//! # concord
//!
//! Partition similarity measures and consensus clustering for
//! community-detection ensembles.
//!
//! Community-detection algorithms are consumed as black boxes here: anything
//! that emits a membership vector for a fixed node count (see
//! [`PartitionSource`]) can feed the engine. `concord` then answers two
//! questions about their outputs:
//!
//! 1. **How similar are two partitions?** — NMI, Variation of Information,
//!    Rand Index and Adjusted Rand Index, computed from a sparse
//!    contingency table ([`metrics`]).
//! 2. **What do several partitions agree on?** — a consensus matrix of
//!    co-membership fractions, thresholded and agglomerated into one final
//!    partition ([`consensus`]).
//!
//! ## Example
//!
//! ```rust
//! use concord::{compare, ConsensusClustering, CutCriterion, Partition};
//!
//! // Memberships from three detection runs over the same 5-node graph.
//! let runs = vec![
//!     Partition::new(vec![0, 0, 0, 1, 1], 5).unwrap(),
//!     Partition::new(vec![0, 0, 0, 1, 1], 5).unwrap(),
//!     Partition::new(vec![0, 0, 1, 1, 1], 5).unwrap(),
//! ];
//!
//! // Pairwise agreement between the first two runs.
//! let scores = compare(&runs[0], &runs[1]).unwrap();
//! assert!((scores.nmi - 1.0).abs() < 1e-12);
//!
//! // Reconcile the ensemble into a single partition.
//! let consensus = ConsensusClustering::new(CutCriterion::Clusters(2))
//!     .resolve(&runs)
//!     .unwrap();
//! assert!(consensus.same_community(0, 1));
//! assert!(!consensus.same_community(0, 4));
//! ```
//!
//! ## Feature flags
//!
//! - `parallel`: accumulate the consensus matrix across ensemble members
//!   with rayon. The reduction is an elementwise sum, so the result is
//!   identical to the serial build.

pub mod consensus;
pub mod contingency;
pub mod dendrogram;
/// Error types used across `concord`.
pub mod error;
pub mod metrics;
pub mod partition;


pub use consensus::{
    ConsensusClustering, ConsensusMatrix, ConsensusRun, CutCriterion, Linkage, DEFAULT_THRESHOLD,
};
pub use contingency::ContingencyTable;
pub use dendrogram::{Dendrogram, Merge};
pub use error::{Error, Result};
pub use metrics::{
    adjusted_rand_index, compare, mutual_information, nmi, pairwise, rand_index,
    variation_of_information, Comparison, PairComparison,
};
pub use partition::{collect_ensemble, Partition, PartitionSource};
