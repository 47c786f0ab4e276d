use std::io::{self, Cursor, ErrorKind, Read};

use super::build_tree;
use crate::{
    Blake3Hasher, MerkleTree, StreamTreeError, build_reader_proof, leaf_hash, node_hash,
    reader_root,
};

/// Reader that hands out at most `chunk` bytes per call and is interrupted
/// before every successful read.
struct Choppy {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    interrupt_next: bool,
}

impl Choppy {
    fn new(data: Vec<u8>, chunk: usize) -> Self {
        Choppy {
            data,
            pos: 0,
            chunk,
            interrupt_next: true,
        }
    }
}

impl Read for Choppy {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            return Err(io::Error::new(ErrorKind::Interrupted, "try again"));
        }
        self.interrupt_next = true;
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(ErrorKind::BrokenPipe, "gone"))
    }
}

#[test]
fn test_one_byte_segments() {
    let data: Vec<u8> = (0..8).collect();
    let segments: Vec<Vec<u8>> = data.iter().map(|b| vec![*b]).collect();
    let root = reader_root(Cursor::new(&data), Blake3Hasher, 1).expect("read");
    assert_eq!(root, build_tree(&segments, 0, 1).root());
}

#[test]
fn test_last_segment_is_not_padded() {
    let root = reader_root(Cursor::new([1u8]), Blake3Hasher, 2).expect("read");
    assert_eq!(root, Some(leaf_hash(&Blake3Hasher, &[1])));

    let root = reader_root(Cursor::new([1u8, 2, 3]), Blake3Hasher, 2).expect("read");
    let expected = node_hash(
        &Blake3Hasher,
        &leaf_hash(&Blake3Hasher, &[1, 2]),
        &leaf_hash(&Blake3Hasher, &[3]),
    );
    assert_eq!(root, Some(expected));
}

#[test]
fn test_empty_reader() {
    let root = reader_root(io::empty(), Blake3Hasher, 64).expect("read");
    assert_eq!(root, None);

    assert!(matches!(
        build_reader_proof(io::empty(), Blake3Hasher, 64, 0),
        Err(StreamTreeError::IndexNotReached {
            index: 0,
            num_leaves: 0
        })
    ));
}

#[test]
fn test_zero_segment_size_is_rejected() {
    assert!(matches!(
        reader_root(Cursor::new([1u8]), Blake3Hasher, 0),
        Err(StreamTreeError::InvalidInput(_))
    ));
    assert!(matches!(
        build_reader_proof(Cursor::new([1u8]), Blake3Hasher, 0, 0),
        Err(StreamTreeError::InvalidInput(_))
    ));
}

#[test]
fn test_reader_proof_matches_pushed_proof() {
    let data: Vec<u8> = (0..7).collect();
    let proof = build_reader_proof(Cursor::new(&data), Blake3Hasher, 1, 5).expect("proof");
    let segments: Vec<Vec<u8>> = data.iter().map(|b| vec![*b]).collect();

    assert_eq!(proof.num_leaves(), 7);
    assert_eq!(proof.leaves(), &[vec![5u8]]);
    assert_eq!(proof, build_tree(&segments, 5, 6).prove());
    assert!(proof.verify(&Blake3Hasher));
}

#[test]
fn test_reader_proof_index_not_reached() {
    let data = vec![0xabu8; 100];
    assert!(matches!(
        build_reader_proof(Cursor::new(&data), Blake3Hasher, 10, 10),
        Err(StreamTreeError::IndexNotReached {
            index: 10,
            num_leaves: 10
        })
    ));
    let proof = build_reader_proof(Cursor::new(&data), Blake3Hasher, 10, 9).expect("proof");
    assert_eq!(proof.leaves(), &[vec![0xabu8; 10]]);
}

#[test]
fn test_short_reads_and_interrupts() {
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let mut expected = MerkleTree::new(Blake3Hasher);
    for segment in data.chunks(64) {
        expected.push(segment);
    }

    let mut tree = MerkleTree::new(Blake3Hasher);
    let pushed = tree.read_all(Choppy::new(data, 7), 64).expect("read");
    assert_eq!(pushed, 16);
    assert_eq!(tree.num_leaves(), 16);
    assert_eq!(tree.root(), expected.root());
}

#[test]
fn test_read_all_continues_a_tree() {
    let mut tree = MerkleTree::new(Blake3Hasher);
    tree.push(b"head");
    tree.read_all(Cursor::new(b"abcdef"), 4).expect("read");

    let expected = build_tree(&[b"head".to_vec(), b"abcd".to_vec(), b"ef".to_vec()], 0, 1);
    assert_eq!(tree.root(), expected.root());
}

#[test]
fn test_reader_errors_are_propagated() {
    assert!(matches!(
        reader_root(Broken, Blake3Hasher, 8),
        Err(StreamTreeError::Io(e)) if e.kind() == ErrorKind::BrokenPipe
    ));
}
