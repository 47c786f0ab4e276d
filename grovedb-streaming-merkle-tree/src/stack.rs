//! The subtree stack: a tree of `n` leaves held as `O(log n)` complete
//! subtrees.
//!
//! A tree with 11 leaves is held as a subtree of height 3 (leaves 0..8), one
//! of height 1 (8..10) and one of height 0 (10..11). Pushing a leaf adds a
//! subtree of height 0; while the two shortest subtrees have the same height
//! they are joined into one that is a level taller, exactly like carrying in
//! binary addition.

use std::ops::Range;

use crate::{MerkleHasher, node_hash};

/// Root hash of a complete subtree covering `2^height` consecutive leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subtree {
    pub(crate) height: u32,
    pub(crate) begin: u64,
    pub(crate) end: u64,
    pub(crate) sum: Vec<u8>,
}

impl Subtree {
    /// A subtree of height 0 for the leaf at `index`.
    pub(crate) fn leaf(index: u64, sum: Vec<u8>) -> Self {
        Subtree {
            height: 0,
            begin: index,
            end: index + 1,
            sum,
        }
    }

    /// Whether any leaf of this subtree lies in `range`.
    pub(crate) fn overlaps(&self, range: &Range<u64>) -> bool {
        self.begin < range.end && range.start < self.end
    }
}

/// Join `older` (the left, taller or equal subtree) with `newer` (the
/// subtree directly to its right).
fn join<H: MerkleHasher + ?Sized>(hasher: &H, older: &Subtree, newer: &Subtree) -> Subtree {
    debug_assert!(
        older.height >= newer.height,
        "invalid subtree join: height {} joined with taller height {}",
        older.height,
        newer.height
    );
    debug_assert_eq!(older.end, newer.begin, "invalid subtree join: not adjacent");

    Subtree {
        height: older.height + 1,
        begin: older.begin,
        end: newer.end,
        sum: node_hash(hasher, &older.sum, &newer.sum),
    }
}

/// Stack of complete subtrees.
///
/// Index 0 holds the tallest subtree (the tail), the last element the
/// shortest (the head). Heights strictly increase from head to tail, so there
/// is at most one subtree per height.
#[derive(Debug, Clone, Default)]
pub(crate) struct SubtreeStack {
    nodes: Vec<Subtree>,
}

impl SubtreeStack {
    pub(crate) fn new() -> Self {
        SubtreeStack { nodes: Vec::new() }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Push `node` as the new head and fold it into the stack.
    ///
    /// `on_merge(older, newer)` is called right before each pair of
    /// same-height subtrees is joined.
    pub(crate) fn push<H, F>(&mut self, hasher: &H, node: Subtree, mut on_merge: F)
    where
        H: MerkleHasher + ?Sized,
        F: FnMut(&Subtree, &Subtree),
    {
        let mut head = node;
        loop {
            match self.nodes.pop() {
                Some(older) if older.height == head.height => {
                    on_merge(&older, &head);
                    head = join(hasher, &older, &head);
                }
                Some(older) => {
                    self.nodes.push(older);
                    break;
                }
                None => break,
            }
        }
        self.nodes.push(head);

        debug_assert!(
            self.nodes.windows(2).all(|w| w[0].height > w[1].height),
            "subtrees are out of order"
        );
    }

    /// Fold every subtree into one, from head to tail, without modifying the
    /// stack. Returns `None` when the stack is empty.
    ///
    /// Unlike [`SubtreeStack::push`], heights are not compared here: a
    /// shorter head is joined with the taller subtree to its left as if it
    /// were complete. `on_merge(older, newer)` is called before every join.
    pub(crate) fn collapse<H, F>(&self, hasher: &H, mut on_merge: F) -> Option<Subtree>
    where
        H: MerkleHasher + ?Sized,
        F: FnMut(&Subtree, &Subtree),
    {
        let mut subtrees = self.nodes.iter().rev();
        let mut current = subtrees.next()?.clone();
        for older in subtrees {
            on_merge(older, &current);
            current = join(hasher, older, &current);
        }
        Some(current)
    }
}
