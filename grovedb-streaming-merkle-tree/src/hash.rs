//! Hash domain separation:
//! - Leaf nodes:     `H(0x00 || data)`
//! - Internal nodes: `H(0x01 || left || right)`
//!
//! The 0x00/0x01 domain tags prevent second-preimage attacks where a crafted
//! leaf could produce the same hash as an internal node, or the reverse.

/// Domain tag prepended to leaf hash inputs: `H(LEAF_TAG || data)`.
pub const LEAF_TAG: u8 = 0x00;
/// Domain tag prepended to internal node inputs: `H(NODE_TAG || left ||
/// right)`.
pub const NODE_TAG: u8 = 0x01;

/// The hash function a tree is built with.
///
/// `hash_parts` hashes the concatenation of `parts` in a single pass. Output
/// must be deterministic and of a fixed length, and no state may carry over
/// from one call to the next.
pub trait MerkleHasher {
    /// Hash the concatenation of `parts`.
    fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8>;
}

impl<H: MerkleHasher + ?Sized> MerkleHasher for &H {
    fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
        (**self).hash_parts(parts)
    }
}

/// Blake3 with a 32 byte output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().as_bytes().to_vec()
    }
}

/// SHA-256.
#[cfg(feature = "sha2")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sha256Hasher;

#[cfg(feature = "sha2")]
impl MerkleHasher for Sha256Hasher {
    fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().to_vec()
    }
}

/// Compute the domain-separated leaf hash: `H(0x00 || data)`.
pub fn leaf_hash<H: MerkleHasher + ?Sized>(hasher: &H, data: &[u8]) -> Vec<u8> {
    hasher.hash_parts(&[&[LEAF_TAG], data])
}

/// Combine two sibling hashes into their parent: `H(0x01 || left || right)`.
pub fn node_hash<H: MerkleHasher + ?Sized>(hasher: &H, left: &[u8], right: &[u8]) -> Vec<u8> {
    hasher.hash_parts(&[&[NODE_TAG], left, right])
}

/// Hash `data` without a domain tag.
pub fn raw_hash<H: MerkleHasher + ?Sized>(hasher: &H, data: &[u8]) -> Vec<u8> {
    hasher.hash_parts(&[data])
}
