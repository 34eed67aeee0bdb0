//! # embedwalk
//!
//! Node embeddings from weighted graphs: p/q-biased second-order random
//! walks (node2vec) feeding a hierarchical-softmax skip-gram/CBOW trainer
//! (word2vec). Each walk is a "sentence" of node-id "words".
//!
//! Pipeline:
//!
//! 1. [`WeightedGraph`] — load an edge list, answer adjacency queries.
//! 2. [`TransitionModel`] — precompute one [`AliasTable`] per node
//!    (first step) and per directed edge (second-order p/q bias).
//! 3. [`simulate_walks`] — emit the walk corpus.
//! 4. [`Vocabulary`] + [`HuffmanTree`] — token frequencies and the binary
//!    tree behind the hierarchical softmax.
//! 5. [`Model`] — one stochastic-gradient pass; write the vectors.
//!
//! ```no_run
//! use embedwalk::{Model, TrainConfig, TransitionModel, Vocabulary, WalkConfig,
//!                 WeightedGraph, simulate_walks};
//!
//! # fn main() -> embedwalk::Result<()> {
//! let graph = WeightedGraph::from_edge_list_path("karate.edgelist", false, false)?;
//! let transitions = TransitionModel::build(&graph, 1.0, 1.0)?;
//! let corpus = simulate_walks(&graph, &transitions, WalkConfig::default());
//!
//! let vocab = Vocabulary::build(&corpus);
//! let mut model = Model::new(vocab, TrainConfig::default())?;
//! model.train(&corpus);
//! model.store("karate.emb")?;
//! # Ok(())
//! # }
//! ```

pub mod alias;
pub mod error;
pub mod graph;
pub mod huffman;
pub mod model;
pub mod transition;
pub mod vocab;
pub mod walker;

pub use alias::AliasTable;
pub use error::{Error, Result};
pub use graph::WeightedGraph;
pub use huffman::HuffmanTree;
pub use model::{Model, TrainConfig};
pub use transition::TransitionModel;
pub use vocab::{VocabEntry, Vocabulary};
pub use walker::{simulate_walks, WalkConfig};

#[cfg(feature = "parallel")]
pub use walker::simulate_walks_parallel;
