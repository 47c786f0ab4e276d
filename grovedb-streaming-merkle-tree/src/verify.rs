//! Proof verification.
//!
//! These are pure functions and need no tree. The root is rebuilt one level at a time
//! from the proven leaves, and the same asymmetric joins the tree made are
//! replayed from index arithmetic alone: at every level the proven range is
//! widened by one sibling on the left when it starts at an odd index, and by
//! one on the right when its width is odd and more leaves follow it.
//!
//! Verification never fails with an error: malformed input (truncated or
//! overlong proof sets, empty roots, ranges out of bounds) just does not
//! verify.

use std::collections::VecDeque;

use crate::{MerkleHasher, leaf_hash, node_hash};

/// Check that the first element of `proof_set` is the data of leaf
/// `proof_index` in a tree of `num_leaves` leaves with root `merkle_root`.
pub fn verify_proof<H: MerkleHasher + ?Sized>(
    hasher: &H,
    merkle_root: &[u8],
    proof_set: &[Vec<u8>],
    proof_index: u64,
    num_leaves: u64,
) -> bool {
    match proof_index.checked_add(1) {
        Some(proof_end) => verify_proof_of_slice(
            hasher,
            merkle_root,
            proof_set,
            proof_index,
            proof_end,
            num_leaves,
        ),
        None => false,
    }
}

/// Check that the first `proof_end - proof_begin` elements of `proof_set` are
/// the data of leaves `[proof_begin, proof_end)` in a tree of `num_leaves`
/// leaves with root `merkle_root`.
///
/// Accepts proofs from both [`MerkleTree::prove`](crate::MerkleTree::prove)
/// and [`CachedMerkleTree::prove`](crate::CachedMerkleTree::prove).
pub fn verify_proof_of_slice<H: MerkleHasher + ?Sized>(
    hasher: &H,
    merkle_root: &[u8],
    proof_set: &[Vec<u8>],
    proof_begin: u64,
    proof_end: u64,
    num_leaves: u64,
) -> bool {
    verify_levels(
        hasher,
        merkle_root,
        proof_set,
        proof_begin,
        proof_end,
        num_leaves,
        |hasher, data| leaf_hash(hasher, data),
    )
}

/// Check a proof of cached elements built by
/// [`CachedMerkleTree::prove_cached`](crate::CachedMerkleTree::prove_cached).
///
/// The range and leaf count are in original leaf units and must all be
/// multiples of `2^cached_node_height`. The first elements of `proof_set`
/// are the cached subtree roots of the range, used as they are rather than
/// leaf-hashed.
pub fn verify_proof_of_cached_elements<H: MerkleHasher + ?Sized>(
    hasher: &H,
    merkle_root: &[u8],
    proof_set: &[Vec<u8>],
    cached_node_height: u32,
    proof_begin: u64,
    proof_end: u64,
    num_leaves: u64,
) -> bool {
    let Some(leaves_per_node) = 1u64.checked_shl(cached_node_height) else {
        return false;
    };
    if proof_begin % leaves_per_node != 0
        || proof_end % leaves_per_node != 0
        || num_leaves % leaves_per_node != 0
    {
        return false;
    }
    verify_levels(
        hasher,
        merkle_root,
        proof_set,
        proof_begin / leaves_per_node,
        proof_end / leaves_per_node,
        num_leaves / leaves_per_node,
        |_, data| data.to_vec(),
    )
}

fn verify_levels<H, F>(
    hasher: &H,
    merkle_root: &[u8],
    proof_set: &[Vec<u8>],
    mut proof_begin: u64,
    mut proof_end: u64,
    mut num_leaves: u64,
    leaf_sum: F,
) -> bool
where
    H: MerkleHasher + ?Sized,
    F: Fn(&H, &[u8]) -> Vec<u8>,
{
    if merkle_root.is_empty() || proof_begin >= proof_end || proof_end > num_leaves {
        return false;
    }
    let width = proof_end - proof_begin;
    if width > proof_set.len() as u64 {
        return false;
    }

    let (leaves, mut siblings) = proof_set.split_at(width as usize);
    let mut sums: VecDeque<Vec<u8>> = leaves.iter().map(|data| leaf_sum(hasher, data)).collect();

    while num_leaves > 1 {
        if proof_begin % 2 == 1 {
            let Some((left, rest)) = siblings.split_first() else {
                return false;
            };
            siblings = rest;
            sums.push_front(left.clone());
            proof_begin -= 1;
        }
        if sums.len() % 2 == 1 && proof_end < num_leaves {
            let Some((right, rest)) = siblings.split_first() else {
                return false;
            };
            siblings = rest;
            sums.push_back(right.clone());
            proof_end += 1;
        }

        let mut next_level = VecDeque::with_capacity(sums.len().div_ceil(2));
        while sums.len() >= 2 {
            let (Some(left), Some(right)) = (sums.pop_front(), sums.pop_front()) else {
                break;
            };
            next_level.push_back(node_hash(hasher, &left, &right));
        }
        // An unpaired hash at the end of the level is promoted unchanged.
        if let Some(orphan) = sums.pop_front() {
            next_level.push_back(orphan);
        }
        sums = next_level;

        proof_begin /= 2;
        proof_end = proof_end.div_ceil(2);
        num_leaves = num_leaves.div_ceil(2);
    }

    if !siblings.is_empty() {
        return false;
    }

    sums.len() == 1 && sums.front().is_some_and(|sum| sum.as_slice() == merkle_root)
}
