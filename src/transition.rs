//! Precomputed first- and second-order transition distributions.
//!
//! One alias table per node governs the first step of a walk; one alias
//! table per directed edge `(prev, curr)` governs every later step, with
//! the node2vec p/q bias applied to `curr`'s neighbor weights. Tables are
//! indexed over [`WeightedGraph::neighbors`] order (ascending by id).

use std::collections::HashMap;

use crate::alias::AliasTable;
use crate::error::{Error, Result};
use crate::graph::WeightedGraph;

/// All alias tables for a graph under fixed `(p, q)` hyperparameters.
///
/// Nodes whose out-weights sum to zero (including isolated nodes) get no
/// table at all; the walk generator treats a missing table as a dead end
/// and stops the walk there rather than failing.
#[derive(Debug, Clone)]
pub struct TransitionModel {
    node_alias: HashMap<i64, AliasTable>,
    edge_alias: HashMap<(i64, i64), AliasTable>,
    p: f64,
    q: f64,
}

impl TransitionModel {
    /// Precompute every per-node and per-edge distribution.
    ///
    /// `p` is the return hyperparameter, `q` the in-out hyperparameter;
    /// both must be positive.
    pub fn build(graph: &WeightedGraph, p: f64, q: f64) -> Result<Self> {
        assert!(p > 0.0 && q > 0.0, "p and q must be positive");

        let mut node_alias = HashMap::with_capacity(graph.node_count());
        let mut edge_alias = HashMap::with_capacity(graph.edge_count());
        let mut buf: Vec<f64> = Vec::new();

        for node in graph.node_ids() {
            let nbrs = graph.neighbors(node);
            if nbrs.is_empty() {
                continue;
            }
            buf.clear();
            buf.extend(nbrs.iter().map(|&(_, w)| w));
            match AliasTable::new(&buf) {
                Ok(table) => {
                    node_alias.insert(node, table);
                }
                // Zero total out-weight: a dead end, not a failure.
                Err(Error::DegenerateDistribution(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        for (src, dst, _) in graph.edges() {
            let nbrs = graph.neighbors(dst);
            if nbrs.is_empty() {
                continue;
            }
            buf.clear();
            for &(n, w) in nbrs {
                let bias = if n == src {
                    1.0 / p
                } else if graph.has_edge(n, src) {
                    // n is a common neighbor of src and dst: distance 1 from src.
                    1.0
                } else {
                    1.0 / q
                };
                buf.push(bias * w);
            }
            match AliasTable::new(&buf) {
                Ok(table) => {
                    edge_alias.insert((src, dst), table);
                }
                Err(Error::DegenerateDistribution(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            node_tables = node_alias.len(),
            edge_tables = edge_alias.len(),
            p,
            q,
            "built transition model"
        );
        Ok(Self { node_alias, edge_alias, p, q })
    }

    /// First-step distribution for `node`, if it has any out-weight.
    pub fn node_table(&self, node: i64) -> Option<&AliasTable> {
        self.node_alias.get(&node)
    }

    /// Second-order distribution for the directed edge `(prev, curr)`.
    pub fn edge_table(&self, prev: i64, curr: i64) -> Option<&AliasTable> {
        self.edge_alias.get(&(prev, curr))
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn q(&self) -> f64 {
        self.q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn triangle() -> WeightedGraph {
        let mut g = WeightedGraph::new(false);
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 1.0);
        g.add_edge(1, 3, 1.0);
        g
    }

    #[test]
    fn triangle_second_order_is_uniform_at_unit_pq() {
        // Walk 1 -> 2 with p=q=1: neighbors of 2 are {1, 3}.
        // bias(1) = 1/p = 1 (return), bias(3) = 1 (3 is a common neighbor of
        // 1 and 2 since edge 1-3 exists). Uniform over {1, 3}.
        let g = triangle();
        let model = TransitionModel::build(&g, 1.0, 1.0).unwrap();
        let table = model.edge_table(1, 2).expect("edge table for (1,2)");
        assert_eq!(table.len(), 2);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut counts = [0usize; 2];
        let trials = 20_000;
        for _ in 0..trials {
            counts[table.sample(&mut rng)] += 1;
        }
        let ratio = counts[0] as f64 / trials as f64;
        assert!(
            (ratio - 0.5).abs() < 0.02,
            "expected ~uniform draw, got {counts:?}"
        );
    }

    #[test]
    fn line_graph_respects_p_and_q() {
        // 0 -- 1 -- 2, walk 0 -> 1 with p=0.5, q=2.0:
        // neighbors of 1 are {0, 2}; weights [1/p, 1/q] = [2.0, 0.5],
        // normalized [0.8, 0.2].
        let mut g = WeightedGraph::new(false);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        let model = TransitionModel::build(&g, 0.5, 2.0).unwrap();
        let table = model.edge_table(0, 1).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut counts = [0usize; 2];
        let trials = 20_000;
        for _ in 0..trials {
            counts[table.sample(&mut rng)] += 1;
        }
        let ratio = counts[0] as f64 / trials as f64;
        assert!(
            (ratio - 0.8).abs() < 0.02,
            "expected ~0.8 return mass, got {counts:?}"
        );
    }

    #[test]
    fn edge_weights_feed_the_first_step() {
        let mut g = WeightedGraph::new(true);
        g.add_edge(0, 1, 9.0);
        g.add_edge(0, 2, 1.0);
        let model = TransitionModel::build(&g, 1.0, 1.0).unwrap();
        let table = model.node_table(0).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut counts = [0usize; 2];
        for _ in 0..20_000 {
            counts[table.sample(&mut rng)] += 1;
        }
        let ratio = counts[0] as f64 / 20_000.0;
        assert!(
            (ratio - 0.9).abs() < 0.02,
            "expected ~0.9 mass on the heavy edge, got {counts:?}"
        );
    }

    #[test]
    fn dead_ends_and_zero_weight_nodes_have_no_tables() {
        let mut g = WeightedGraph::new(true);
        g.add_edge(0, 1, 1.0);
        g.add_edge(2, 3, 0.0);
        let model = TransitionModel::build(&g, 1.0, 1.0).unwrap();
        assert!(model.node_table(0).is_some());
        assert!(model.node_table(1).is_none(), "sink node");
        assert!(model.node_table(2).is_none(), "zero total out-weight");
        assert!(model.edge_table(2, 3).is_none());
    }
}
