//! Merkle trees built from cached subtree roots.
//!
//! A cached tree keeps the roots of every subtree of some fixed height `h`
//! (say, one per 2^16 leaves) so that a change to a few leaves only rehashes
//! the subtrees they belong to. Each element pushed into a
//! [`CachedMerkleTree`] is such a root. The resulting root is identical to
//! the root of an ordinary [`MerkleTree`] over all of the original leaves.

use std::ops::Range;

use tracing::debug;

use crate::{MerkleHasher, MerkleTree, Result, SliceProof, StreamTreeError};

/// A Merkle tree whose elements are roots of complete subtrees of height
/// `cached_node_height`.
///
/// Proof ranges are given in original leaf units. A proof is assembled from
/// a proof that the range belongs to its cached subtree (built separately by
/// the caller with an ordinary [`MerkleTree`] over that subtree's leaves) and
/// the sibling hashes this tree captures above the cached level.
#[derive(Debug, Clone)]
pub struct CachedMerkleTree<H> {
    tree: MerkleTree<H>,
    cached_node_height: u32,
    true_range: Range<u64>,
    cached_range: Range<u64>,
}

impl<H: MerkleHasher> CachedMerkleTree<H> {
    /// Create an empty cached tree. Every pushed element must be the root of
    /// `2^cached_node_height` leaves.
    pub fn new(hasher: H, cached_node_height: u32) -> Result<Self> {
        if cached_node_height >= u64::BITS {
            return Err(StreamTreeError::InvalidInput(format!(
                "cached node height {} must be below {}",
                cached_node_height,
                u64::BITS
            )));
        }
        Ok(CachedMerkleTree {
            tree: MerkleTree::new(hasher),
            cached_node_height,
            true_range: 0..1,
            cached_range: 0..1,
        })
    }

    /// Height of the subtree behind each cached element.
    pub fn cached_node_height(&self) -> u32 {
        self.cached_node_height
    }

    /// Leaves covered by each cached element.
    pub fn leaves_per_node(&self) -> u64 {
        1 << self.cached_node_height
    }

    /// Number of original leaves covered by the elements pushed so far.
    pub fn num_leaves(&self) -> u64 {
        self.tree.num_leaves().saturating_mul(self.leaves_per_node())
    }

    /// Number of cached elements pushed so far.
    pub fn num_cached_nodes(&self) -> u64 {
        self.tree.num_leaves()
    }

    /// Returns `true` if no element has been pushed.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Add the root of the next cached subtree. It is used as a height-0
    /// hash as is, without leaf hashing.
    pub fn push(&mut self, cached_root: &[u8]) {
        self.tree.push_with(cached_root, |_, root| root.to_vec());
    }

    /// The Merkle root over all original leaves, or `None` if empty.
    pub fn root(&self) -> Option<Vec<u8>> {
        self.tree.root()
    }

    /// Build a proof for original leaf `index`. Must be called on an empty
    /// tree.
    pub fn set_index(&mut self, index: u64) -> Result<()> {
        let end = index.checked_add(1).ok_or_else(|| {
            StreamTreeError::InvalidInput(format!("leaf index {} is too large", index))
        })?;
        self.set_slice(index, end)
    }

    /// Build a proof for original leaves `[begin, end)`. Must be called on an
    /// empty tree.
    ///
    /// A slice inside one cached element may start and end anywhere; a slice
    /// spanning several cached elements must cover each of them entirely.
    pub fn set_slice(&mut self, begin: u64, end: u64) -> Result<()> {
        if !self.is_empty() {
            debug!(
                begin,
                end,
                pushed = self.tree.num_leaves(),
                "rejected cached proof range on a non-empty tree"
            );
            return Err(StreamTreeError::AlreadyStarted {
                pushed: self.tree.num_leaves(),
            });
        }
        if begin >= end {
            return Err(StreamTreeError::InvalidInput(format!(
                "empty proof range [{}, {})",
                begin, end
            )));
        }

        let height = self.cached_node_height;
        let cached_begin = begin >> height;
        let cached_end = ((end - 1) >> height) + 1;
        if cached_end != cached_begin + 1 {
            let mask = self.leaves_per_node() - 1;
            if begin & mask != 0 || end & mask != 0 {
                debug!(begin, end, height, "rejected misaligned cached proof range");
                return Err(StreamTreeError::MisalignedCachedSlice {
                    begin,
                    end,
                    leaves_per_node: self.leaves_per_node(),
                });
            }
        }

        self.tree.set_slice(cached_begin, cached_end)?;
        self.true_range = begin..end;
        self.cached_range = cached_begin..cached_end;
        Ok(())
    }

    /// Build a proof that the selected leaves belong to the tree.
    ///
    /// `sub_proof_set` proves the selected leaves within their cached
    /// element: it is the proof set of an ordinary [`MerkleTree`] over that
    /// element's leaves, with the slice rebased to the element's first leaf.
    /// When the slice covers several whole elements, it is the concatenation
    /// of their leaves.
    ///
    /// The result verifies with
    /// [`verify_proof_of_slice`](crate::verify_proof_of_slice). Its proof set
    /// is `None` if the selected elements have not all been pushed yet. The
    /// tree is not modified.
    pub fn prove(&self, sub_proof_set: &[Vec<u8>]) -> SliceProof {
        let num_leaves = self.num_leaves();
        let inner = self.tree.prove();
        let cut = (self.cached_range.end - self.cached_range.start) as usize;

        let root = inner.root().map(<[u8]>::to_vec);
        // The inner proof starts with the cached roots of the selected
        // elements; the sub proof set stands in for them.
        let proof_set = inner
            .into_proof_set()
            .filter(|tail| tail.len() >= cut)
            .map(|tail| {
                let mut proof_set = sub_proof_set.to_vec();
                proof_set.extend(tail.into_iter().skip(cut));
                proof_set
            });

        SliceProof::new(
            root,
            proof_set,
            self.true_range.start,
            self.true_range.end,
            num_leaves,
        )
    }

    /// Build a proof whose leaves are the cached roots of the selected
    /// elements rather than the original leaves.
    ///
    /// Only available when the selected slice is made of whole cached
    /// elements; otherwise the proof set is `None`. The result verifies with
    /// [`verify_proof_of_cached_elements`](crate::verify_proof_of_cached_elements).
    pub fn prove_cached(&self) -> SliceProof {
        let num_leaves = self.num_leaves();
        let inner = self.tree.prove();
        let root = inner.root().map(<[u8]>::to_vec);

        let mask = self.leaves_per_node() - 1;
        let whole_nodes = self.true_range.start & mask == 0 && self.true_range.end & mask == 0;
        let proof_set = inner
            .into_proof_set()
            .filter(|set| whole_nodes && !set.is_empty());

        SliceProof::new(
            root,
            proof_set,
            self.true_range.start,
            self.true_range.end,
            num_leaves,
        )
    }

    /// Return the tree to its freshly created state, with leaf 0 as the
    /// proof target.
    pub fn reset(&mut self) {
        self.tree.reset();
        self.true_range = 0..1;
        self.cached_range = 0..1;
    }
}
