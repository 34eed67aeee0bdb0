//! Vocabulary construction over a walk corpus.

use std::collections::HashMap;

/// One distinct token (node id) with its occurrence count and the mass the
/// Huffman encoder orders by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VocabEntry {
    pub token: i64,
    pub count: u64,
    /// `count / vocab_size`. A relative-rank weight, not a frequency
    /// fraction; the reference normalizes by distinct-token count and the
    /// subsampling formula depends on it, so it is kept as-is.
    pub mass: f64,
}

/// Token frequencies for a corpus, with a stable token -> index mapping.
///
/// Entries are ordered by ascending token id so downstream tie-breaking and
/// output ordering are deterministic.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<VocabEntry>,
    index: HashMap<i64, usize>,
    total_tokens: u64,
}

impl Vocabulary {
    /// Scan the corpus once and count every token occurrence.
    pub fn build(corpus: &[Vec<i64>]) -> Self {
        let mut counts: HashMap<i64, u64> = HashMap::new();
        let mut total_tokens = 0u64;
        for walk in corpus {
            total_tokens += walk.len() as u64;
            for &token in walk {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let mut tokens: Vec<i64> = counts.keys().copied().collect();
        tokens.sort_unstable();

        let vocab_size = tokens.len();
        let mut entries = Vec::with_capacity(vocab_size);
        let mut index = HashMap::with_capacity(vocab_size);
        for (i, token) in tokens.into_iter().enumerate() {
            let count = counts[&token];
            entries.push(VocabEntry {
                token,
                count,
                mass: count as f64 / vocab_size as f64,
            });
            index.insert(token, i);
        }

        tracing::debug!(vocab_size, total_tokens, "built vocabulary");
        Self { entries, index, total_tokens }
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total token occurrences across all walks.
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Index of a token, if in vocabulary.
    pub fn token_index(&self, token: i64) -> Option<usize> {
        self.index.get(&token).copied()
    }

    pub fn entry(&self, idx: usize) -> &VocabEntry {
        &self.entries[idx]
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_total_round_trip() {
        let corpus = vec![vec![1, 2, 2], vec![3, 1, 2]];
        let vocab = Vocabulary::build(&corpus);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.total_tokens(), 6);

        let sum: u64 = vocab.entries().iter().map(|e| e.count).sum();
        assert_eq!(sum, 6, "frequency sum must equal total token count");

        let i2 = vocab.token_index(2).unwrap();
        assert_eq!(vocab.entry(i2).count, 3);
        assert!(vocab.token_index(9).is_none());
    }

    #[test]
    fn mass_normalizes_by_vocab_size_not_token_count() {
        let corpus = vec![vec![1, 1, 1, 2]];
        let vocab = Vocabulary::build(&corpus);
        let i1 = vocab.token_index(1).unwrap();
        // 3 occurrences / 2 distinct tokens, deliberately not 3/4.
        assert!((vocab.entry(i1).mass - 1.5).abs() < 1e-12);
    }

    #[test]
    fn entries_are_sorted_by_token_id() {
        let corpus = vec![vec![5, 3, 9, 3]];
        let vocab = Vocabulary::build(&corpus);
        let ids: Vec<i64> = vocab.entries().iter().map(|e| e.token).collect();
        assert_eq!(ids, vec![3, 5, 9]);
    }

    #[test]
    fn empty_corpus_yields_empty_vocabulary() {
        let vocab = Vocabulary::build(&[]);
        assert!(vocab.is_empty());
        assert_eq!(vocab.total_tokens(), 0);
    }
}
