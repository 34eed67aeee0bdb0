//! Huffman coding over vocabulary masses.
//!
//! The tree is an arena: nodes are integer handles, parents are indices,
//! so the structure is safely shareable once built. Handles `0..n` are the
//! leaves (aligned with vocabulary entry indices), handles `n..2n-1` the
//! internal nodes in creation order; the last internal node is the root.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::NotNan;

use crate::error::{Error, Result};
use crate::vocab::Vocabulary;

const NO_PARENT: usize = usize::MAX;

/// A frozen Huffman tree: per-leaf branch codes and internal-node paths.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    num_leaves: usize,
    /// Per leaf: branch bits, root-to-leaf order.
    codes: Vec<Vec<u8>>,
    /// Per leaf: internal-node indices (`0..internal_count`), parallel to
    /// `codes`; `paths[l][i]` is the internal node whose output vector is
    /// trained against bit `codes[l][i]`.
    paths: Vec<Vec<u32>>,
}

impl HuffmanTree {
    /// Encode a vocabulary. Fails with [`Error::EmptyVocabulary`] on zero
    /// tokens; a single token yields one leaf with an empty code.
    pub fn make(vocab: &Vocabulary) -> Result<Self> {
        let masses: Vec<f64> = vocab.entries().iter().map(|e| e.mass).collect();
        Self::from_masses(&masses)
    }

    /// Build the tree from raw per-leaf masses.
    pub fn from_masses(masses: &[f64]) -> Result<Self> {
        let n = masses.len();
        if n == 0 {
            return Err(Error::EmptyVocabulary);
        }

        // Arena: leaves 0..n, internal nodes n..2n-1.
        let mut parent = vec![NO_PARENT; 2 * n - 1];
        let mut bit = vec![0u8; 2 * n - 1];

        // Min-heap keyed by (mass, handle); the handle doubles as insertion
        // order, which makes tie-breaking stable and the tree deterministic.
        let mut heap: BinaryHeap<Reverse<(NotNan<f64>, usize)>> = (0..n)
            .map(|i| Reverse((NotNan::new(masses[i]).unwrap(), i)))
            .collect();

        let mut next = n;
        while heap.len() > 1 {
            let Reverse((m1, min1)) = heap.pop().unwrap();
            let Reverse((m2, min2)) = heap.pop().unwrap();
            parent[min1] = next;
            parent[min2] = next;
            bit[min1] = 0;
            bit[min2] = 1;
            heap.push(Reverse((m1 + m2, next)));
            next += 1;
        }

        // Walk parent handles leaf-to-root, then reverse into root-to-leaf
        // order. Each step pairs the parent's internal index with the bit of
        // the child the path descends through.
        let mut codes = Vec::with_capacity(n);
        let mut paths = Vec::with_capacity(n);
        for leaf in 0..n {
            let mut code: Vec<u8> = Vec::new();
            let mut path: Vec<u32> = Vec::new();
            let mut cur = leaf;
            while parent[cur] != NO_PARENT {
                path.push((parent[cur] - n) as u32);
                code.push(bit[cur]);
                cur = parent[cur];
            }
            code.reverse();
            path.reverse();
            codes.push(code);
            paths.push(path);
        }

        Ok(Self { num_leaves: n, codes, paths })
    }

    pub fn leaf_count(&self) -> usize {
        self.num_leaves
    }

    /// Number of internal (hidden) nodes: `leaves - 1`, or 0 for one leaf.
    pub fn internal_count(&self) -> usize {
        self.num_leaves.saturating_sub(1)
    }

    /// Branch bits for a leaf, root-to-leaf.
    pub fn code(&self, leaf: usize) -> &[u8] {
        &self.codes[leaf]
    }

    /// Internal-node handles on a leaf's path, parallel to [`Self::code`].
    pub fn path(&self, leaf: usize) -> &[u32] {
        &self.paths[leaf]
    }
}
