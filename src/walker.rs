//! Second-order random walk generation.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::graph::WeightedGraph;
use crate::transition::TransitionModel;

/// Walk generation parameters.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkConfig {
    /// Maximum walk length (in nodes).
    pub walk_length: usize,
    /// Number of passes over the node set; one walk per node per pass.
    pub num_walks: usize,
    /// Seed for deterministic RNG.
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { walk_length: 80, num_walks: 10, seed: 42 }
    }
}

/// Generate `num_walks * |V|` walks.
///
/// Each pass shuffles the ascending node list (the shuffle decides only the
/// order in which walks are generated), then emits one walk per node. A
/// walk stops early at any node without a transition table (dead end or
/// zero out-weight).
pub fn simulate_walks(
    graph: &WeightedGraph,
    model: &TransitionModel,
    config: WalkConfig,
) -> Vec<Vec<i64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut nodes = graph.node_ids();
    let mut walks = Vec::with_capacity(nodes.len() * config.num_walks);

    for pass in 0..config.num_walks {
        tracing::info!(pass = pass + 1, total = config.num_walks, "walk pass");
        nodes.shuffle(&mut rng);
        for &node in &nodes {
            walks.push(walk(graph, model, node, config.walk_length, &mut rng));
        }
    }
    walks
}

fn walk<R: Rng>(
    graph: &WeightedGraph,
    model: &TransitionModel,
    start: i64,
    length: usize,
    rng: &mut R,
) -> Vec<i64> {
    let mut path = Vec::with_capacity(length.max(1));
    path.push(start);

    let mut prev = start;
    let mut curr = match model.node_table(start) {
        Some(table) if path.len() < length => {
            let next = graph.neighbors(start)[table.sample(rng)].0;
            path.push(next);
            next
        }
        _ => return path,
    };

    while path.len() < length {
        let Some(table) = model.edge_table(prev, curr) else {
            break;
        };
        let next = graph.neighbors(curr)[table.sample(rng)].0;
        path.push(next);
        prev = curr;
        curr = next;
    }
    path
}

/// Deterministic parallel walk generation.
///
/// Invariant: output is stable for a fixed `seed`, independent of Rayon
/// thread count. Pass order still comes from a per-pass shuffle; each walk
/// draws from its own RNG seeded by (seed, pass, node, slot).
#[cfg(feature = "parallel")]
pub fn simulate_walks_parallel(
    graph: &WeightedGraph,
    model: &TransitionModel,
    config: WalkConfig,
) -> Vec<Vec<i64>> {
    use rayon::prelude::*;

    let mut nodes = graph.node_ids();
    let mut jobs: Vec<(u32, i64)> = Vec::with_capacity(nodes.len() * config.num_walks);

    for pass in 0..(config.num_walks as u32) {
        let mut rng = ChaCha8Rng::seed_from_u64(mix64(config.seed ^ (pass as u64)));
        nodes.shuffle(&mut rng);
        for &node in &nodes {
            jobs.push((pass, node));
        }
    }

    jobs.par_iter()
        .enumerate()
        .map(|(i, &(pass, node))| {
            let seed = mix64(config.seed ^ ((pass as u64) << 32) ^ (node as u64) ^ (i as u64));
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            walk(graph, model, node, config.walk_length, &mut rng)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}
