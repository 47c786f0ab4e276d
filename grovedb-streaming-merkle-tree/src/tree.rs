//! Streaming Merkle tree with single-leaf and leaf-range proofs.

use std::ops::Range;

use tracing::{debug, trace};

use crate::{
    MerkleHasher, ProofLadder, Result, SliceProof, StreamTreeError, leaf_hash,
    stack::{Subtree, SubtreeStack},
};

/// A Merkle tree built one leaf at a time in `O(log n)` memory.
///
/// Each call to [`MerkleTree::push`] adds one leaf; [`MerkleTree::root`]
/// returns the Merkle root of everything pushed so far. The tree can also
/// prove that a single leaf ([`MerkleTree::set_index`]) or a slice of leaves
/// ([`MerkleTree::set_slice`]) belongs to it. The target must be chosen
/// before the first push, because the hashes needed for the proof are
/// captured while the tree is built and the leaves themselves are not kept.
///
/// By default the target is leaf 0.
#[derive(Debug, Clone)]
pub struct MerkleTree<H> {
    hasher: H,
    stack: SubtreeStack,
    current_index: u64,
    proof_range: Range<u64>,
    // Raw data of the leaves inside `proof_range`, in leaf order.
    bases: Vec<Vec<u8>>,
    ladder: ProofLadder,
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Create an empty tree that hashes with `hasher`.
    pub fn new(hasher: H) -> Self {
        MerkleTree {
            hasher,
            stack: SubtreeStack::new(),
            current_index: 0,
            proof_range: 0..1,
            bases: Vec::new(),
            ladder: ProofLadder::new(),
        }
    }

    /// The hasher this tree was created with.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Number of leaves pushed so far.
    pub fn num_leaves(&self) -> u64 {
        self.current_index
    }

    /// Returns `true` if no leaf has been pushed.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The leaf range the tree is collecting a proof for.
    pub fn proof_range(&self) -> Range<u64> {
        self.proof_range.clone()
    }

    /// Add a leaf with the given data: its leaf hash is `H(0x00 || data)`.
    pub fn push(&mut self, data: &[u8]) {
        self.push_with(data, |hasher, data| leaf_hash(hasher, data));
    }

    /// Add a leaf whose height-0 hash is `leaf_sum(hasher, data)`.
    ///
    /// Ordinary trees leaf-hash the data; cached trees use it as is.
    pub(crate) fn push_with<F>(&mut self, data: &[u8], leaf_sum: F)
    where
        F: FnOnce(&H, &[u8]) -> Vec<u8>,
    {
        if self.proof_range.contains(&self.current_index) {
            self.bases.push(data.to_vec());
        }

        let node = Subtree::leaf(self.current_index, leaf_sum(&self.hasher, data));
        let range = &self.proof_range;
        let ladder = &mut self.ladder;
        self.stack.push(&self.hasher, node, |older, newer| {
            ladder.capture(range, older, newer)
        });
        self.current_index += 1;
    }

    /// The Merkle root of the leaves pushed so far, or `None` if the tree is
    /// empty.
    ///
    /// Subtrees are joined from the shortest to the tallest, the taller one
    /// always being the left operand.
    pub fn root(&self) -> Option<Vec<u8>> {
        self.stack
            .collapse(&self.hasher, |_, _| {})
            .map(|subtree| subtree.sum)
    }

    /// Build a proof for leaf `index`. Must be called on an empty tree.
    pub fn set_index(&mut self, index: u64) -> Result<()> {
        let end = index.checked_add(1).ok_or_else(|| {
            StreamTreeError::InvalidInput(format!("leaf index {} is too large", index))
        })?;
        self.set_slice(index, end)
    }

    /// Build a proof for the leaves in `[begin, end)`. Must be called on an
    /// empty tree.
    pub fn set_slice(&mut self, begin: u64, end: u64) -> Result<()> {
        if !self.is_empty() {
            debug!(
                begin,
                end,
                pushed = self.current_index,
                "rejected proof range on a non-empty tree"
            );
            return Err(StreamTreeError::AlreadyStarted {
                pushed: self.current_index,
            });
        }
        if begin >= end {
            return Err(StreamTreeError::InvalidInput(format!(
                "empty proof range [{}, {})",
                begin, end
            )));
        }
        self.proof_range = begin..end;
        self.bases.clear();
        self.ladder = ProofLadder::new();
        Ok(())
    }

    /// Build a proof that the leaves selected with [`MerkleTree::set_slice`]
    /// (or [`MerkleTree::set_index`]) belong to the tree.
    ///
    /// If the tree is empty or the selected range has not been fully pushed
    /// yet, the returned proof has no proof set. The tree is not modified;
    /// more leaves can be pushed afterwards.
    pub fn prove(&self) -> SliceProof {
        let range = self.proof_range.clone();
        if self.is_empty() || self.current_index < range.end {
            trace!(
                begin = range.start,
                end = range.end,
                pushed = self.current_index,
                "proof range not covered yet"
            );
            return SliceProof::new(self.root(), None, range.start, range.end, self.current_index);
        }

        // Collapsing ignores heights: the remaining subtrees are folded into
        // the root and every sibling met on the way is captured.
        let mut ladder = self.ladder.clone();
        let root = self
            .stack
            .collapse(&self.hasher, |older, newer| {
                ladder.capture(&range, older, newer)
            })
            .map(|subtree| subtree.sum);

        let mut proof_set = Vec::with_capacity(self.bases.len() + ladder.len());
        proof_set.extend(self.bases.iter().cloned());
        proof_set.extend(ladder.into_proof_tail());

        SliceProof::new(
            root,
            Some(proof_set),
            range.start,
            range.end,
            self.current_index,
        )
    }

    /// Return the tree to its freshly created state, with leaf 0 as the
    /// proof target.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.current_index = 0;
        self.proof_range = 0..1;
        self.bases.clear();
        self.ladder = ProofLadder::new();
    }
}
