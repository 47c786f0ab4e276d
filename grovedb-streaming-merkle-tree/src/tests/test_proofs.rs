use super::{build_tree, byte_leaf};
use crate::{Blake3Hasher, MerkleTree, SliceProof, StreamTreeError};

fn sample_proof() -> SliceProof {
    let leaves: Vec<Vec<u8>> = (0..19).map(byte_leaf).collect();
    build_tree(&leaves, 6, 9).prove()
}

#[test]
fn test_proof_serialization_round_trip() {
    let proof = sample_proof();
    let bytes = proof.encode_to_vec().expect("encode");
    let decoded = SliceProof::decode_from_slice(&bytes).expect("decode");
    assert_eq!(decoded, proof);
    assert!(decoded.verify(&Blake3Hasher));
}

#[test]
fn test_not_ready_proof_serialization() {
    let mut tree = MerkleTree::new(Blake3Hasher);
    tree.set_index(4).expect("set index");
    tree.push(b"only");
    let proof = tree.prove();
    assert!(!proof.is_ready());

    let decoded =
        SliceProof::decode_from_slice(&proof.encode_to_vec().expect("encode")).expect("decode");
    assert!(!decoded.is_ready());
    assert_eq!(decoded.root(), proof.root());
    assert_eq!(decoded.num_leaves(), 1);
}

#[test]
fn test_decode_rejects_garbage() {
    let bytes = sample_proof().encode_to_vec().expect("encode");
    assert!(matches!(
        SliceProof::decode_from_slice(&bytes[..bytes.len() / 2]),
        Err(StreamTreeError::InvalidData(_))
    ));
    assert!(matches!(
        SliceProof::decode_from_slice(&[]),
        Err(StreamTreeError::InvalidData(_))
    ));
}

#[test]
fn test_leaves_and_accessors() {
    let proof = sample_proof();
    assert_eq!(proof.proof_begin(), 6);
    assert_eq!(proof.proof_end(), 9);
    assert_eq!(proof.num_leaves(), 19);
    assert_eq!(proof.leaves(), &[byte_leaf(6), byte_leaf(7), byte_leaf(8)]);

    let set = proof.clone().into_proof_set().expect("proof set");
    assert_eq!(proof.proof_set(), Some(set.as_slice()));
}

#[test]
fn test_hand_built_proofs_fail() {
    let proof = sample_proof();
    let root = proof.root().map(<[u8]>::to_vec);
    let set = proof.proof_set().map(<[Vec<u8>]>::to_vec);

    let relabelled = SliceProof::new(root.clone(), set.clone(), 6, 9, 40);
    assert!(!relabelled.verify(&Blake3Hasher));

    let rootless = SliceProof::new(None, set, 6, 9, 19);
    assert!(!rootless.verify(&Blake3Hasher));

    let setless = SliceProof::new(root, None, 6, 9, 19);
    assert!(!setless.verify(&Blake3Hasher));
}
