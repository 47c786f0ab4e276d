use std::ops::Range;

use crate::stack::Subtree;

/// Sibling hashes captured while a tree is built, grouped by height.
///
/// `rungs[h]` holds the hashes of subtrees of height `h` that are needed to
/// prove the selected leaf range, in the order they were captured. A height
/// gets at most two hashes: one captured while leaves are being pushed and
/// one when the remaining subtrees are collapsed into the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofLadder {
    rungs: Vec<Vec<Vec<u8>>>,
}

impl ProofLadder {
    /// Create an empty ladder.
    pub fn new() -> Self {
        ProofLadder { rungs: Vec::new() }
    }

    /// Record `hash` at `height`.
    pub fn record(&mut self, height: usize, hash: Vec<u8>) {
        if self.rungs.len() <= height {
            self.rungs.resize_with(height + 1, Vec::new);
        }
        let rung = &mut self.rungs[height];
        rung.push(hash);
        debug_assert!(rung.len() <= 2, "more than 2 proof hashes at height {height}");
    }

    /// Number of hashes recorded over all heights.
    pub fn len(&self) -> usize {
        self.rungs.iter().map(Vec::len).sum()
    }

    /// Returns `true` if no hash has been recorded.
    pub fn is_empty(&self) -> bool {
        self.rungs.iter().all(Vec::is_empty)
    }

    /// Capture the sibling hash needed before `older` and `newer` are joined.
    ///
    /// A hash is captured only when exactly one of the two subtrees overlaps
    /// `range`: the hash of the other one is then part of the proof. It is
    /// recorded at the height of `older`, the taller of the two.
    pub(crate) fn capture(&mut self, range: &Range<u64>, older: &Subtree, newer: &Subtree) {
        let height = older.height as usize;
        match (older.overlaps(range), newer.overlaps(range)) {
            (true, false) => self.record(height, newer.sum.clone()),
            (false, true) => self.record(height, older.sum.clone()),
            _ => {}
        }
    }

    /// Flatten the ladder into the tail of a proof set: ascending height,
    /// capture order within a height.
    pub fn into_proof_tail(self) -> Vec<Vec<u8>> {
        self.rungs
            .into_iter()
            .flat_map(|rung| {
                debug_assert!(rung.len() <= 2, "more than 2 proof hashes at one height");
                rung
            })
            .collect()
    }
}
