use thiserror::Error;

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors from Merkle tree operations.
///
/// Proof verification never produces one of these: a proof that does not
/// chain to the claimed root is reported as `false`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum Error {
    /// A leaf or proof was requested for an index beyond the leaf count.
    #[error("leaf index {index} out of range (leaf_count={leaf_count})")]
    IndexOutOfRange {
        /// The requested index.
        index: u64,
        /// Number of leaves the lookup was checked against.
        leaf_count: u64,
    },
    /// An encoded proof could not be decoded or is structurally invalid.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// A snapshot or other encoded tree state is malformed.
    #[error("invalid tree data: {0}")]
    InvalidData(String),
    /// A stored internal node does not hash to its children.
    #[error("corrupted node at level {level}, position {position}")]
    CorruptedNode {
        /// Level of the node, 0 being the base level.
        level: usize,
        /// Position of the node within its level.
        position: usize,
    },
}
