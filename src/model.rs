//! Hierarchical-softmax embedding trainer (skip-gram / CBOW).
//!
//! The model owns two flat vector arenas: `syn0` (one input vector per
//! vocabulary token) and `syn1` (one output vector per Huffman internal
//! node). Training is a single stochastic-gradient pass over the walk
//! corpus; per-pair cost is O(log vocab) thanks to the Huffman tree.
//!
//! Reproducibility: `syn0` is initialized uniformly in `(-0.5/dim, 0.5/dim)`
//! from a ChaCha8 RNG seeded by `TrainConfig::seed`; `syn1` starts at zero.
//! Subsampling and window jitter use the word2vec linear-congruential
//! sequence (`x = x * 25214903917 + 11`), also seeded from the config, so
//! a run is a pure function of `(seed, corpus)`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::huffman::HuffmanTree;
use crate::vocab::Vocabulary;

const EXP_TABLE_SIZE: usize = 1000;
const MAX_EXP: f64 = 6.0;
// The reference computes the lookup scale with integer division:
// 1000 / 6 / 2 == 83, not 1000 / 12.0. Kept bit-for-bit.
const EXP_SCALE: f64 = (EXP_TABLE_SIZE / 6 / 2) as f64;

const LCG_MULT: u64 = 25214903917;
const LCG_INC: u64 = 11;

/// Training hyperparameters.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainConfig {
    /// Embedding dimensionality (layer size).
    pub dimensions: usize,
    /// Context window half-width; the effective half-width is jittered
    /// per position.
    pub window: usize,
    /// Starting learning rate; decays linearly with corpus progress down
    /// to `alpha * 1e-4`.
    pub alpha: f64,
    /// Subsampling threshold; 0 disables subsampling.
    pub sample: f64,
    /// Train CBOW instead of skip-gram.
    pub cbow: bool,
    /// Epoch-count knob carried from the reference configuration surface.
    /// The reference trainer never consults it and always performs exactly
    /// one pass; neither does [`Model::train`]. Call `train` again for
    /// more passes.
    pub iter: usize,
    /// Seed for vector initialization and the subsampling sequence.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dimensions: 200,
            window: 5,
            alpha: 0.025,
            sample: 1e-3,
            cbow: false,
            iter: 1,
            seed: 5,
        }
    }
}

/// A hierarchical-softmax embedding model over a fixed vocabulary.
pub struct Model {
    config: TrainConfig,
    vocab: Vocabulary,
    tree: HuffmanTree,
    /// Input vectors, `vocab.len() * dimensions`.
    syn0: Vec<f64>,
    /// Internal-node output vectors, `tree.internal_count() * dimensions`.
    syn1: Vec<f64>,
    exp_table: Vec<f64>,
    alpha: f64,
    next_random: u64,
}

impl Model {
    /// Build the Huffman tree over `vocab` and allocate the vector arenas.
    /// Fails with [`crate::Error::EmptyVocabulary`] on an empty vocabulary.
    pub fn new(vocab: Vocabulary, config: TrainConfig) -> Result<Self> {
        assert!(config.dimensions > 0, "dimensions must be positive");
        assert!(config.window > 0, "window must be positive");
        let tree = HuffmanTree::make(&vocab)?;
        let dim = config.dimensions;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let syn0: Vec<f64> = (0..vocab.len() * dim)
            .map(|_| (rng.random::<f64>() - 0.5) / dim as f64)
            .collect();
        let syn1 = vec![0.0; tree.internal_count() * dim];

        let exp_table = (0..EXP_TABLE_SIZE)
            .map(|i| {
                let e = ((i as f64 / EXP_TABLE_SIZE as f64 * 2.0 - 1.0) * MAX_EXP).exp();
                e / (e + 1.0)
            })
            .collect();

        Ok(Self {
            alpha: config.alpha,
            next_random: config.seed,
            config,
            vocab,
            tree,
            syn0,
            syn1,
            exp_table,
        })
    }

    /// Table-lookup sigmoid. `None` outside `(-6, 6)`: the gradient there
    /// is treated as negligible and the pair skipped.
    fn sigmoid(&self, f: f64) -> Option<f64> {
        if f <= -MAX_EXP || f >= MAX_EXP {
            None
        } else {
            Some(self.exp_table[((f + MAX_EXP) * EXP_SCALE) as usize])
        }
    }

    fn lcg_next(&mut self) -> u64 {
        self.next_random = self
            .next_random
            .wrapping_mul(LCG_MULT)
            .wrapping_add(LCG_INC);
        self.next_random
    }

    /// One stochastic-gradient pass over the corpus.
    ///
    /// Each walk is reduced to its in-vocabulary, subsample-surviving token
    /// indices, then every retained position trains against a window of
    /// jittered half-width. The learning rate is recomputed every 10_000
    /// tokens from corpus progress.
    pub fn train(&mut self, corpus: &[Vec<i64>]) {
        let total_tokens = self.vocab.total_tokens();
        let starting_alpha = self.config.alpha;

        let mut word_count: u64 = 0;
        let mut last_word_count: u64 = 0;
        let mut word_count_actual: u64 = 0;
        let mut sentence: Vec<usize> = Vec::new();

        for walk in corpus {
            if word_count - last_word_count > 10_000 {
                word_count_actual += word_count - last_word_count;
                last_word_count = word_count;
                self.alpha = starting_alpha
                    * (1.0 - word_count_actual as f64 / (total_tokens + 1) as f64);
                if self.alpha < starting_alpha * 1e-4 {
                    self.alpha = starting_alpha * 1e-4;
                }
                tracing::debug!(
                    alpha = self.alpha,
                    progress =
                        word_count_actual as f64 / (total_tokens + 1) as f64,
                    "training progress"
                );
            }
            word_count += walk.len() as u64;

            sentence.clear();
            for &token in walk {
                let Some(idx) = self.vocab.token_index(token) else {
                    continue;
                };
                if self.config.sample > 0.0 {
                    let mass = self.vocab.entry(idx).mass;
                    let threshold = self.config.sample * total_tokens as f64;
                    let keep = ((mass / threshold).sqrt() + 1.0) * threshold / mass;
                    let r = self.lcg_next();
                    if keep < (r & 0xFFFF) as f64 / 65536.0 {
                        continue;
                    }
                }
                sentence.push(idx);
            }

            for index in 0..sentence.len() {
                let r = self.lcg_next();
                let b = (r % self.config.window as u64) as usize;
                if self.config.cbow {
                    self.cbow(index, &sentence, b);
                } else {
                    self.skip_gram(index, &sentence, b);
                }
            }
        }

        tracing::info!(
            vocab_size = self.vocab.len(),
            total_tokens,
            "training pass complete"
        );
    }

    /// Skip-gram update for the token at `index` with window jitter `b`:
    /// the center token's input vector is trained against the Huffman path
    /// of every context token in the effective window.
    fn skip_gram(&mut self, index: usize, sentence: &[usize], b: usize) {
        let dim = self.config.dimensions;
        let window = self.config.window;
        let center = sentence[index];
        let mut neu1e = vec![0.0f64; dim];

        for a in b..(window * 2 + 1 - b) {
            if a == window {
                continue;
            }
            let c = index as isize - window as isize + a as isize;
            if c < 0 || c >= sentence.len() as isize {
                continue;
            }
            let context = sentence[c as usize];

            neu1e.fill(0.0);
            let in_off = center * dim;
            for (i, &h) in self.tree.path(context).iter().enumerate() {
                let bit = self.tree.code(context)[i];
                let out_off = h as usize * dim;

                let mut f = 0.0;
                for j in 0..dim {
                    f += self.syn0[in_off + j] * self.syn1[out_off + j];
                }
                let Some(f) = self.sigmoid(f) else {
                    continue;
                };
                let g = (1.0 - bit as f64 - f) * self.alpha;
                for j in 0..dim {
                    neu1e[j] += g * self.syn1[out_off + j];
                }
                for j in 0..dim {
                    self.syn1[out_off + j] += g * self.syn0[in_off + j];
                }
            }
            for j in 0..dim {
                self.syn0[in_off + j] += neu1e[j];
            }
        }
    }

    /// CBOW update for the token at `index` with window jitter `b`: the
    /// context input vectors are averaged into one working vector, trained
    /// against the center token's Huffman path, and the error buffer is
    /// distributed back to every context token.
    ///
    /// The gradient rule differs from skip-gram on purpose
    /// (`g = f(1-f)(code - f) * alpha`); the reference uses both as-is.
    fn cbow(&mut self, index: usize, sentence: &[usize], b: usize) {
        let dim = self.config.dimensions;
        let window = self.config.window;
        let center = sentence[index];

        let mut neu1 = vec![0.0f64; dim];
        let mut neu1e = vec![0.0f64; dim];
        let mut context_count = 0usize;

        for a in b..(window * 2 + 1 - b) {
            if a == window {
                continue;
            }
            let c = index as isize - window as isize + a as isize;
            if c < 0 || c >= sentence.len() as isize {
                continue;
            }
            let off = sentence[c as usize] * dim;
            for j in 0..dim {
                neu1[j] += self.syn0[off + j];
            }
            context_count += 1;
        }
        if context_count == 0 {
            return;
        }
        for v in neu1.iter_mut() {
            *v /= context_count as f64;
        }

        for (i, &h) in self.tree.path(center).iter().enumerate() {
            let bit = self.tree.code(center)[i];
            let out_off = h as usize * dim;

            let mut f = 0.0;
            for j in 0..dim {
                f += neu1[j] * self.syn1[out_off + j];
            }
            let Some(f) = self.sigmoid(f) else {
                continue;
            };
            let g = f * (1.0 - f) * (bit as f64 - f) * self.alpha;
            for j in 0..dim {
                neu1e[j] += g * self.syn1[out_off + j];
            }
            for j in 0..dim {
                self.syn1[out_off + j] += g * neu1[j];
            }
        }

        for a in b..(window * 2 + 1 - b) {
            if a == window {
                continue;
            }
            let c = index as isize - window as isize + a as isize;
            if c < 0 || c >= sentence.len() as isize {
                continue;
            }
            let off = sentence[c as usize] * dim;
            for j in 0..dim {
                self.syn0[off + j] += neu1e[j];
            }
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// Input vector for a token id, if in vocabulary.
    pub fn embedding(&self, token: i64) -> Option<&[f64]> {
        let idx = self.vocab.token_index(token)?;
        let dim = self.config.dimensions;
        Some(&self.syn0[idx * dim..(idx + 1) * dim])
    }

    /// Write embeddings: header `<vocab_size> <dimensions>`, then one line
    /// per token, `<token_id> <v_0> ... <v_{dim-1}>` in single precision.
    /// Covers leaf input vectors only.
    pub fn write_embeddings<W: Write>(&self, writer: &mut W) -> Result<()> {
        let dim = self.config.dimensions;
        writeln!(writer, "{} {}", self.vocab.len(), dim)?;
        for (i, entry) in self.vocab.entries().iter().enumerate() {
            write!(writer, "{}", entry.token)?;
            for j in 0..dim {
                write!(writer, " {}", self.syn0[i * dim + j] as f32)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write embeddings to a file.
    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_embeddings(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
