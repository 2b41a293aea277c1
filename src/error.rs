//! Error types for the `genie-core` library.
//!
//! Defines the error enum exposed by the public API, a stable
//! machine-readable code for each variant, and a convenient result alias.

use thiserror::Error;

/// Error type produced when constructing or running [`crate::GenieEngine`].
///
/// Input-shape and configuration violations are raised before any merging
/// starts; the `AlreadyJoined` and `InvariantViolation` variants report
/// internal-consistency failures that cannot arise from a well-formed
/// minimum spanning tree and indicate malformed input or a logic error.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenieError {
    /// The engine requires at least two points.
    #[error("clustering requires at least 2 points (got {node_count})")]
    TooFewPoints {
        /// Number of points supplied by the caller.
        node_count: usize,
    },
    /// The edge list does not contain exactly `node_count - 1` entries.
    #[error("edge count {edges} does not form a spanning tree over {node_count} points")]
    EdgeCountMismatch {
        /// Number of points supplied by the caller.
        node_count: usize,
        /// Number of edges supplied by the caller.
        edges: usize,
    },
    /// The weight sequence does not pair up with the edge sequence.
    #[error("{edges} edges were given but {weights} weights")]
    WeightCountMismatch {
        /// Number of edges supplied by the caller.
        edges: usize,
        /// Number of weights supplied by the caller.
        weights: usize,
    },
    /// An edge weight was NaN or infinite.
    #[error("edge {index} has non-finite weight")]
    NonFiniteWeight {
        /// Position of the offending weight.
        index: usize,
    },
    /// The edge weights were not sorted in non-decreasing order.
    #[error("edge weights must be non-decreasing; weight {index} is below its predecessor")]
    UnsortedWeights {
        /// Position of the first weight below its predecessor.
        index: usize,
    },
    /// An edge referenced a vertex id that is not present in the graph.
    #[error("edge references vertex {node}, but node_count is {node_count}")]
    InvalidNodeId {
        /// The invalid vertex id referenced by an edge.
        node: usize,
        /// The number of vertices in the graph.
        node_count: usize,
    },
    /// An edge connected a vertex to itself.
    #[error("self-loop on vertex {node} is not allowed")]
    SelfLoop {
        /// The vertex carrying the self-loop.
        node: usize,
    },
    /// Leaf-as-noise mode found fewer than two degree-one vertices.
    #[error("noise mode requires at least 2 leaves, found {leaves}")]
    TooFewLeaves {
        /// Number of degree-one vertices detected.
        leaves: usize,
    },
    /// The requested cluster count was zero.
    #[error("n_clusters must be at least 1")]
    ZeroClusters,
    /// More clusters were requested than there are clusterable points.
    #[error("requested {requested} clusters but only {available} non-noise points are available")]
    TooManyClusters {
        /// Cluster count requested by the caller.
        requested: usize,
        /// Number of non-noise points.
        available: usize,
    },
    /// The Gini threshold was NaN or outside `[0, 1]`.
    #[error("gini_threshold must lie in [0, 1], got {got}")]
    InvalidGiniThreshold {
        /// The rejected threshold value.
        got: f64,
    },
    /// The caller-provided label buffer has the wrong length.
    #[error("label buffer has length {got} but {expected} points were given")]
    LabelBufferMismatch {
        /// Required buffer length (`node_count`).
        expected: usize,
        /// Length of the buffer supplied by the caller.
        got: usize,
    },
    /// A merge was requested for two members of the same set.
    #[error("elements {left} and {right} are already in the same set")]
    AlreadyJoined {
        /// First merge operand, as passed to `merge`.
        left: usize,
        /// Second merge operand, as passed to `merge`.
        right: usize,
    },
    /// An internal invariant was violated, indicating malformed input or a
    /// logic error.
    #[error("merge engine invariant violated: {invariant}")]
    InvariantViolation {
        /// Name of the violated invariant to assist debugging.
        invariant: &'static str,
    },
}

impl GenieError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> GenieErrorCode {
        match self {
            Self::TooFewPoints { .. } => GenieErrorCode::TooFewPoints,
            Self::EdgeCountMismatch { .. } => GenieErrorCode::EdgeCountMismatch,
            Self::WeightCountMismatch { .. } => GenieErrorCode::WeightCountMismatch,
            Self::NonFiniteWeight { .. } => GenieErrorCode::NonFiniteWeight,
            Self::UnsortedWeights { .. } => GenieErrorCode::UnsortedWeights,
            Self::InvalidNodeId { .. } => GenieErrorCode::InvalidNodeId,
            Self::SelfLoop { .. } => GenieErrorCode::SelfLoop,
            Self::TooFewLeaves { .. } => GenieErrorCode::TooFewLeaves,
            Self::ZeroClusters => GenieErrorCode::ZeroClusters,
            Self::TooManyClusters { .. } => GenieErrorCode::TooManyClusters,
            Self::InvalidGiniThreshold { .. } => GenieErrorCode::InvalidGiniThreshold,
            Self::LabelBufferMismatch { .. } => GenieErrorCode::LabelBufferMismatch,
            Self::AlreadyJoined { .. } => GenieErrorCode::AlreadyJoined,
            Self::InvariantViolation { .. } => GenieErrorCode::InvariantViolation,
        }
    }
}

/// Machine-readable error codes for [`GenieError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum GenieErrorCode {
    /// The engine requires at least two points.
    TooFewPoints,
    /// The edge list does not contain exactly `node_count - 1` entries.
    EdgeCountMismatch,
    /// The weight sequence does not pair up with the edge sequence.
    WeightCountMismatch,
    /// An edge weight was NaN or infinite.
    NonFiniteWeight,
    /// The edge weights were not sorted in non-decreasing order.
    UnsortedWeights,
    /// An edge referenced a vertex id that is not present in the graph.
    InvalidNodeId,
    /// An edge connected a vertex to itself.
    SelfLoop,
    /// Leaf-as-noise mode found fewer than two degree-one vertices.
    TooFewLeaves,
    /// The requested cluster count was zero.
    ZeroClusters,
    /// More clusters were requested than there are clusterable points.
    TooManyClusters,
    /// The Gini threshold was NaN or outside `[0, 1]`.
    InvalidGiniThreshold,
    /// The caller-provided label buffer has the wrong length.
    LabelBufferMismatch,
    /// A merge was requested for two members of the same set.
    AlreadyJoined,
    /// An internal invariant was violated.
    InvariantViolation,
}

impl GenieErrorCode {
    /// Returns the symbolic identifier for logging and metrics surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooFewPoints => "TOO_FEW_POINTS",
            Self::EdgeCountMismatch => "EDGE_COUNT_MISMATCH",
            Self::WeightCountMismatch => "WEIGHT_COUNT_MISMATCH",
            Self::NonFiniteWeight => "NON_FINITE_WEIGHT",
            Self::UnsortedWeights => "UNSORTED_WEIGHTS",
            Self::InvalidNodeId => "INVALID_NODE_ID",
            Self::SelfLoop => "SELF_LOOP",
            Self::TooFewLeaves => "TOO_FEW_LEAVES",
            Self::ZeroClusters => "ZERO_CLUSTERS",
            Self::TooManyClusters => "TOO_MANY_CLUSTERS",
            Self::InvalidGiniThreshold => "INVALID_GINI_THRESHOLD",
            Self::LabelBufferMismatch => "LABEL_BUFFER_MISMATCH",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
        }
    }
}

impl core::fmt::Display for GenieErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GenieError>;
