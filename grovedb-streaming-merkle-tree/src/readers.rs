//! Building trees straight from byte streams.
//!
//! The stream is cut into segments of `segment_size` bytes, one leaf each.
//! The final segment is not padded: if the stream length is not a multiple of
//! `segment_size`, the last leaf is shorter than the others.

use std::io::{ErrorKind, Read};

use tracing::debug;

use crate::{MerkleHasher, MerkleTree, Result, SliceProof, StreamTreeError};

/// Fill `buf` from `reader`, stopping early only at end of stream. Returns
/// the number of bytes read.
fn read_segment<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn check_segment_size(segment_size: usize) -> Result<()> {
    if segment_size == 0 {
        return Err(StreamTreeError::InvalidInput(
            "segment size must be nonzero".into(),
        ));
    }
    Ok(())
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Push every `segment_size` byte segment of `reader` as a leaf, until
    /// the end of the stream. Returns the number of leaves pushed.
    pub fn read_all<R: Read>(&mut self, mut reader: R, segment_size: usize) -> Result<u64> {
        check_segment_size(segment_size)?;
        let mut segment = vec![0u8; segment_size];
        let mut pushed = 0u64;
        loop {
            let n = read_segment(&mut reader, &mut segment)?;
            if n == 0 {
                break;
            }
            self.push(&segment[..n]);
            pushed += 1;
            if n < segment_size {
                break;
            }
        }
        debug!(
            pushed,
            segment_size,
            num_leaves = self.num_leaves(),
            "read stream into tree"
        );
        Ok(pushed)
    }
}

/// The Merkle root of the data in `reader`, one leaf per `segment_size`
/// bytes. Returns `None` for an empty stream.
pub fn reader_root<R: Read, H: MerkleHasher>(
    reader: R,
    hasher: H,
    segment_size: usize,
) -> Result<Option<Vec<u8>>> {
    let mut tree = MerkleTree::new(hasher);
    tree.read_all(reader, segment_size)?;
    Ok(tree.root())
}

/// Build a proof that leaf `index` belongs to the tree over the data in
/// `reader`, one leaf per `segment_size` bytes.
///
/// Fails with [`StreamTreeError::IndexNotReached`] if the stream holds
/// `index` leaves or fewer.
pub fn build_reader_proof<R: Read, H: MerkleHasher>(
    reader: R,
    hasher: H,
    segment_size: usize,
    index: u64,
) -> Result<SliceProof> {
    let mut tree = MerkleTree::new(hasher);
    tree.set_index(index)?;
    tree.read_all(reader, segment_size)?;
    let proof = tree.prove();
    if !proof.is_ready() {
        return Err(StreamTreeError::IndexNotReached {
            index,
            num_leaves: tree.num_leaves(),
        });
    }
    Ok(proof)
}
