//! Streaming Merkle tree: roots and leaf range proofs in `O(log n)` memory.
//!
//! Leaves are pushed one at a time and folded into a stack of complete
//! subtrees, so the full tree is never materialized. A proof target (a single
//! leaf or a contiguous slice of leaves) is chosen before the first push and
//! the hashes needed to prove it are captured while the tree is being built.
//!
//! Hash domain separation:
//! - Leaf nodes:     `H(0x00 || data)`
//! - Internal nodes: `H(0x01 || left || right)`
//!
//! Trees with a leaf count that is not a power of two are not padded: an
//! unpaired subtree is promoted as-is and joined with the taller subtree on
//! its left when the root is computed.
//!
//! # Core types
//!
//! - [`MerkleTree`]: push leaves, compute the root, build a [`SliceProof`].
//! - [`CachedMerkleTree`]: the same over precomputed roots of fixed-height
//!   subtrees, splicing a sub-tree proof into a whole-tree proof.
//! - [`SliceProof`]: proof value returned by the trees (bincode encodable).
//! - [`verify_proof`], [`verify_proof_of_slice`],
//!   [`verify_proof_of_cached_elements`]: stateless verification.
//!
//! # Hashers
//!
//! - [`MerkleHasher`]: the injected hash function.
//! - [`Blake3Hasher`]: Blake3, the GroveDB default.
//! - [`Sha256Hasher`]: SHA-256 (requires the `sha2` feature, on by default).

#![warn(missing_docs)]

mod cached;
mod error;
/// Domain-separated hashing primitives.
pub mod hash;
mod ladder;
mod proof;
mod readers;
mod stack;
mod tree;
mod verify;

#[cfg(test)]
mod tests;

pub use cached::CachedMerkleTree;
pub use error::{Result, StreamTreeError};
#[cfg(feature = "sha2")]
pub use hash::Sha256Hasher;
pub use hash::{Blake3Hasher, MerkleHasher, leaf_hash, node_hash, raw_hash};
pub use ladder::ProofLadder;
pub use proof::SliceProof;
pub use readers::{build_reader_proof, reader_root};
pub use tree::MerkleTree;
pub use verify::{verify_proof, verify_proof_of_cached_elements, verify_proof_of_slice};
