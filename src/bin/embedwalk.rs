//! embedwalk CLI — edge list in, embedding vectors out.
//!
//! ```bash
//! embedwalk -i graph/karate.edgelist -o emb/karate.emb \
//!     --dimensions 128 --walk-length 80 --num-walks 10 --window-size 10
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use embedwalk::{
    simulate_walks, Model, TrainConfig, TransitionModel, Vocabulary, WalkConfig, WeightedGraph,
};

#[derive(Parser)]
#[command(name = "embedwalk")]
#[command(about = "Learn node embeddings via biased random walks", long_about = None)]
struct Cli {
    /// Input graph edge list path
    #[arg(short, long)]
    input: PathBuf,

    /// Output embedding path
    #[arg(short, long)]
    output: PathBuf,

    /// Number of dimensions
    #[arg(long, default_value_t = 128)]
    dimensions: usize,

    /// Length of walk per source
    #[arg(long, default_value_t = 80)]
    walk_length: usize,

    /// Number of walks per source
    #[arg(long, default_value_t = 10)]
    num_walks: usize,

    /// Context size for optimization
    #[arg(long, default_value_t = 10)]
    window_size: usize,

    /// Number of epochs in SGD (reserved; training performs one pass)
    #[arg(long, default_value_t = 1)]
    iter: usize,

    /// Return hyperparameter
    #[arg(short, long, default_value_t = 1.0)]
    p: f64,

    /// In-out hyperparameter
    #[arg(short, long, default_value_t = 1.0)]
    q: f64,

    /// Starting learning rate
    #[arg(long, default_value_t = 0.025)]
    alpha: f64,

    /// Subsampling threshold (0 disables)
    #[arg(long, default_value_t = 1e-3)]
    sample: f64,

    /// Honor the third edge-list column as a weight
    #[arg(long)]
    weighted: bool,

    /// Treat the graph as directed
    #[arg(long)]
    directed: bool,

    /// Train CBOW instead of skip-gram
    #[arg(long)]
    cbow: bool,

    /// RNG seed (walk shuffling, vector init, subsampling)
    #[arg(long, default_value_t = 5)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let graph = WeightedGraph::from_edge_list_path(&cli.input, cli.directed, cli.weighted)
        .with_context(|| format!("loading edge list {}", cli.input.display()))?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    let transitions =
        TransitionModel::build(&graph, cli.p, cli.q).context("building transition model")?;
    let corpus = simulate_walks(
        &graph,
        &transitions,
        WalkConfig {
            walk_length: cli.walk_length,
            num_walks: cli.num_walks,
            seed: cli.seed,
        },
    );
    tracing::info!(walks = corpus.len(), "walks simulated");

    let vocab = Vocabulary::build(&corpus);
    let mut model = Model::new(
        vocab,
        TrainConfig {
            dimensions: cli.dimensions,
            window: cli.window_size,
            alpha: cli.alpha,
            sample: cli.sample,
            cbow: cli.cbow,
            iter: cli.iter,
            seed: cli.seed,
        },
    )
    .context("initializing model")?;
    model.train(&corpus);

    model
        .store(&cli.output)
        .with_context(|| format!("writing embeddings to {}", cli.output.display()))?;
    tracing::info!(output = %cli.output.display(), "embeddings stored");
    Ok(())
}
