//! The proof value produced by [`MerkleTree::prove`](crate::MerkleTree::prove)
//! and [`CachedMerkleTree::prove`](crate::CachedMerkleTree::prove).
//!
//! Proof set layout: the raw data of every leaf in `[proof_begin, proof_end)`
//! in leaf order, followed by sibling hashes in ascending height order. Two
//! siblings of the same height appear in leaf order.

use bincode::{Decode, Encode};

use crate::{
    MerkleHasher, Result, StreamTreeError,
    verify::{verify_proof_of_cached_elements, verify_proof_of_slice},
};

/// A Merkle proof for a contiguous range of leaves.
///
/// A proof built before enough leaves were pushed to cover its range is
/// "not ready": it carries the current root and leaf count but no proof set.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SliceProof {
    root: Option<Vec<u8>>,
    proof_set: Option<Vec<Vec<u8>>>,
    proof_begin: u64,
    proof_end: u64,
    num_leaves: u64,
}

impl SliceProof {
    /// Create a proof from its constituent parts.
    pub fn new(
        root: Option<Vec<u8>>,
        proof_set: Option<Vec<Vec<u8>>>,
        proof_begin: u64,
        proof_end: u64,
        num_leaves: u64,
    ) -> Self {
        SliceProof {
            root,
            proof_set,
            proof_begin,
            proof_end,
            num_leaves,
        }
    }

    /// The Merkle root of the tree at proof time; `None` for an empty tree.
    pub fn root(&self) -> Option<&[u8]> {
        self.root.as_deref()
    }

    /// The proof set, or `None` if the proof is not ready.
    pub fn proof_set(&self) -> Option<&[Vec<u8>]> {
        self.proof_set.as_deref()
    }

    /// Consume the proof and return its proof set.
    pub fn into_proof_set(self) -> Option<Vec<Vec<u8>>> {
        self.proof_set
    }

    /// First leaf of the proven range.
    pub fn proof_begin(&self) -> u64 {
        self.proof_begin
    }

    /// One past the last leaf of the proven range.
    pub fn proof_end(&self) -> u64 {
        self.proof_end
    }

    /// Number of leaves in the tree at proof time.
    pub fn num_leaves(&self) -> u64 {
        self.num_leaves
    }

    /// Returns `true` if the proof carries a proof set.
    pub fn is_ready(&self) -> bool {
        self.proof_set.is_some()
    }

    /// The raw leaf data proven by this proof, in leaf order.
    pub fn leaves(&self) -> &[Vec<u8>] {
        let count = usize::try_from(self.proof_end.saturating_sub(self.proof_begin))
            .unwrap_or(usize::MAX);
        match &self.proof_set {
            Some(set) => &set[..count.min(set.len())],
            None => &[],
        }
    }

    /// Verify this proof against its own root, range and leaf count.
    ///
    /// A proof that is not ready never verifies.
    pub fn verify<H: MerkleHasher + ?Sized>(&self, hasher: &H) -> bool {
        match (&self.root, &self.proof_set) {
            (Some(root), Some(set)) => verify_proof_of_slice(
                hasher,
                root,
                set,
                self.proof_begin,
                self.proof_end,
                self.num_leaves,
            ),
            _ => false,
        }
    }

    /// Verify a proof produced by
    /// [`CachedMerkleTree::prove_cached`](crate::CachedMerkleTree::prove_cached)
    /// for a tree whose cached nodes have height `cached_node_height`.
    pub fn verify_cached<H: MerkleHasher + ?Sized>(
        &self,
        hasher: &H,
        cached_node_height: u32,
    ) -> bool {
        match (&self.root, &self.proof_set) {
            (Some(root), Some(set)) => verify_proof_of_cached_elements(
                hasher,
                root,
                set,
                cached_node_height,
                self.proof_begin,
                self.proof_end,
                self.num_leaves,
            ),
            _ => false,
        }
    }

    /// Serialize this proof to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| StreamTreeError::InvalidData(format!("failed to encode SliceProof: {}", e)))
    }

    /// Deserialize a proof from bytes.
    ///
    /// The bincode size limit is capped at 100 MiB to prevent crafted length
    /// headers from causing huge allocations.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 100 * 1024 * 1024 }>();
        let (proof, _) = bincode::decode_from_slice(bytes, config).map_err(|e| {
            StreamTreeError::InvalidData(format!("failed to decode SliceProof: {}", e))
        })?;
        Ok(proof)
    }
}
