mod test_proofs;
mod test_readers;

use crate::{Blake3Hasher, MerkleHasher, MerkleTree, leaf_hash, node_hash};

/// Single-byte leaf data `[i]`, distinct for `i < 256`.
fn byte_leaf(i: u64) -> Vec<u8> {
    vec![i as u8]
}

/// Leaf data that stays distinct for any index.
fn unique_leaf(i: u64) -> Vec<u8> {
    format!("leaf-{}", i).into_bytes()
}

/// Merkle root computed top-down: the left subtree covers the largest power
/// of two strictly below the leaf count.
fn reference_root<H: MerkleHasher>(hasher: &H, leaves: &[Vec<u8>]) -> Option<Vec<u8>> {
    match leaves.len() {
        0 => None,
        1 => Some(leaf_hash(hasher, &leaves[0])),
        n => {
            let split = 1usize << (usize::BITS - 1 - (n - 1).leading_zeros());
            let left = reference_root(hasher, &leaves[..split])?;
            let right = reference_root(hasher, &leaves[split..])?;
            Some(node_hash(hasher, &left, &right))
        }
    }
}

/// A Blake3 tree proving `[begin, end)` over the given leaves.
fn build_tree(leaves: &[Vec<u8>], begin: u64, end: u64) -> MerkleTree<Blake3Hasher> {
    let mut tree = MerkleTree::new(Blake3Hasher);
    tree.set_slice(begin, end).expect("set slice on empty tree");
    for leaf in leaves {
        tree.push(leaf);
    }
    tree
}
