//! Error types for streaming Merkle tree operations.

use thiserror::Error;

/// Alias for `core::result::Result<T, StreamTreeError>`.
pub type Result<T> = core::result::Result<T, StreamTreeError>;

/// Errors from streaming Merkle tree operations.
///
/// Proof verification never produces one of these: a malformed proof simply
/// fails to verify.
#[derive(Debug, Error)]
pub enum StreamTreeError {
    /// The proof range was changed after leaves were pushed.
    #[error("cannot select a proof range after {pushed} leaves have been pushed")]
    AlreadyStarted {
        /// Leaves pushed so far.
        pushed: u64,
    },
    /// A cached tree slice spans several cached nodes without covering each
    /// of them entirely.
    #[error(
        "slice [{begin}, {end}) spans several cached nodes of {leaves_per_node} leaves but is not \
         aligned to them"
    )]
    MisalignedCachedSlice {
        /// First leaf of the requested slice.
        begin: u64,
        /// One past the last leaf of the requested slice.
        end: u64,
        /// Leaves covered by each cached node.
        leaves_per_node: u64,
    },
    /// Invalid input parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Proof bytes could not be encoded or decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// The stream ended before the leaf to prove was read.
    #[error("leaf {index} was not reached, the stream holds {num_leaves} leaves")]
    IndexNotReached {
        /// Leaf that was asked for.
        index: u64,
        /// Leaves the stream produced.
        num_leaves: u64,
    },
    /// Reading from the underlying stream failed.
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}
