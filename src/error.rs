use core::fmt;

/// Result alias for `concord`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by partition validation, comparison and consensus
/// clustering.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A membership vector's length disagrees with the declared node count.
    LengthMismatch {
        /// Declared node count.
        expected: usize,
        /// Number of labels actually supplied.
        found: usize,
    },

    /// A node has no community label.
    MissingLabel {
        /// Index of the unlabelled node.
        node: usize,
    },

    /// Two partitions (or ensemble members) cover different node sets.
    DimensionMismatch {
        /// Node count of the reference partition.
        expected: usize,
        /// Node count of the offending partition.
        found: usize,
    },

    /// Consensus requested over zero partitions.
    EmptyEnsemble,

    /// Conflicting or out-of-range resolver configuration.
    InvalidConfiguration {
        /// Option name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Invalid number of clusters requested from a dendrogram cut.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items in the dendrogram.
        n_items: usize,
    },

    /// Input too small for the operation (e.g. fewer than two nodes).
    DegenerateInput {
        /// Number of items supplied.
        n_items: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LengthMismatch { expected, found } => {
                write!(
                    f,
                    "membership length mismatch: expected {expected} labels, found {found}"
                )
            }
            Error::MissingLabel { node } => {
                write!(f, "node {node} has no community label")
            }
            Error::DimensionMismatch { expected, found } => {
                write!(f, "partition covers {found} nodes, expected {expected}")
            }
            Error::EmptyEnsemble => write!(f, "consensus requires at least one partition"),
            Error::InvalidConfiguration { name, message } => {
                write!(f, "invalid configuration '{name}': {message}")
            }
            Error::InvalidClusterCount { requested, n_items } => {
                write!(f, "cannot cut {n_items} items into {requested} clusters")
            }
            Error::DegenerateInput { n_items } => {
                write!(f, "operation undefined for {n_items} item(s)")
            }
        }
    }
}

impl std::error::Error for Error {}
