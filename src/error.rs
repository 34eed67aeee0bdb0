//! Crate error taxonomy.

use thiserror::Error;

/// Errors that can occur while loading a graph or training a model.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading an edge list or writing embeddings.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed edge-list line. Fatal: the whole load is aborted.
    #[error("format error on line {line}: {msg}")]
    Format { line: usize, msg: String },

    /// A weight vector with zero total mass was handed to the alias builder.
    #[error("degenerate distribution: weights sum to zero over {0} outcomes")]
    DegenerateDistribution(usize),

    /// Huffman encoding was asked to build a tree over zero tokens.
    #[error("empty vocabulary: nothing to encode")]
    EmptyVocabulary,
}

/// Result type alias for embedwalk.
pub type Result<T> = std::result::Result<T, Error>;
