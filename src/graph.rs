//! Weighted directed graph with indexed adjacency.
//!
//! Neighbor lists are kept sorted by node id. That ordering is load-bearing:
//! alias tables built by [`crate::transition`] index into exactly this
//! ordering, so every later lookup must see the same sequence.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

const DEFAULT_WEIGHT: f64 = 1.0;

/// A directed weighted graph. Undirected graphs are stored as two mirrored
/// directed edges per input edge, each updatable by overwrite.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    directed: bool,
    adj: HashMap<i64, Vec<(i64, f64)>>,
}

impl WeightedGraph {
    pub fn new(directed: bool) -> Self {
        Self { directed, adj: HashMap::new() }
    }

    /// Load a graph from a whitespace-separated edge list:
    /// `<src:int> <dst:int> [weight:float]`, one edge per line.
    ///
    /// A missing weight defaults to 1.0. When `weighted` is false the third
    /// column is ignored and every edge gets weight 1.0. Any malformed line
    /// aborts the whole load with [`Error::Format`].
    pub fn from_edge_list_path<P: AsRef<Path>>(
        path: P,
        directed: bool,
        weighted: bool,
    ) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Self::from_edge_list(reader, directed, weighted)
    }

    /// Like [`Self::from_edge_list_path`], from any buffered reader.
    pub fn from_edge_list<R: BufRead>(reader: R, directed: bool, weighted: bool) -> Result<Self> {
        let mut graph = Self::new(directed);
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 || fields.len() > 3 {
                return Err(Error::Format {
                    line: lineno,
                    msg: format!("expected 2 or 3 fields, got {}", fields.len()),
                });
            }
            let src: i64 = fields[0].parse().map_err(|_| Error::Format {
                line: lineno,
                msg: format!("invalid source id {:?}", fields[0]),
            })?;
            let dst: i64 = fields[1].parse().map_err(|_| Error::Format {
                line: lineno,
                msg: format!("invalid target id {:?}", fields[1]),
            })?;
            let weight = if weighted && fields.len() == 3 {
                let w: f64 = fields[2].parse().map_err(|_| Error::Format {
                    line: lineno,
                    msg: format!("invalid weight {:?}", fields[2]),
                })?;
                if !(w >= 0.0) {
                    return Err(Error::Format {
                        line: lineno,
                        msg: format!("negative weight {w}"),
                    });
                }
                w
            } else {
                DEFAULT_WEIGHT
            };
            graph.add_edge(src, dst, weight);
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            directed,
            "loaded edge list"
        );
        Ok(graph)
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Add a node. Idempotent: an existing node is left untouched.
    pub fn add_node(&mut self, id: i64) {
        self.adj.entry(id).or_default();
    }

    /// Add an edge, upserting the weight if the (src, dst) pair exists.
    /// On an undirected graph the mirrored edge is inserted/updated too.
    pub fn add_edge(&mut self, src: i64, dst: i64, weight: f64) {
        self.add_node(src);
        self.add_node(dst);
        self.insert_directed(src, dst, weight);
        if !self.directed {
            self.insert_directed(dst, src, weight);
        }
    }

    fn insert_directed(&mut self, src: i64, dst: i64, weight: f64) {
        let nbrs = self.adj.entry(src).or_default();
        match nbrs.binary_search_by_key(&dst, |&(n, _)| n) {
            Ok(i) => nbrs[i].1 = weight,
            Err(i) => nbrs.insert(i, (dst, weight)),
        }
    }

    pub fn has_node(&self, id: i64) -> bool {
        self.adj.contains_key(&id)
    }

    pub fn has_edge(&self, src: i64, dst: i64) -> bool {
        self.edge_weight(src, dst).is_some()
    }

    /// Weight of the directed edge `src -> dst`, if present.
    pub fn edge_weight(&self, src: i64, dst: i64) -> Option<f64> {
        let nbrs = self.adj.get(&src)?;
        nbrs.binary_search_by_key(&dst, |&(n, _)| n)
            .ok()
            .map(|i| nbrs[i].1)
    }

    /// Out-neighbors of `node` with their weights, ascending by neighbor id.
    pub fn neighbors(&self, node: i64) -> &[(i64, f64)] {
        self.adj.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn out_degree(&self, node: i64) -> usize {
        self.neighbors(node).len()
    }

    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of directed edges (an undirected input edge counts twice).
    pub fn edge_count(&self) -> usize {
        self.adj.values().map(Vec::len).sum()
    }

    /// All node ids, ascending. This is the canonical node ordering the walk
    /// generator shuffles each pass.
    pub fn node_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.adj.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate every directed edge as `(src, dst, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (i64, i64, f64)> + '_ {
        self.adj
            .iter()
            .flat_map(|(&src, nbrs)| nbrs.iter().map(move |&(dst, w)| (src, dst, w)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_adding_directed_edge_updates_weight_in_place() {
        let mut g = WeightedGraph::new(true);
        g.add_edge(1, 2, 1.0);
        g.add_edge(1, 2, 3.5);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight(1, 2), Some(3.5));
        assert!(!g.has_edge(2, 1));
    }

    #[test]
    fn undirected_insert_mirrors_with_equal_weight() {
        let mut g = WeightedGraph::new(false);
        g.add_edge(1, 2, 2.0);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_weight(1, 2), Some(2.0));
        assert_eq!(g.edge_weight(2, 1), Some(2.0));

        g.add_edge(1, 2, 5.0);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_weight(2, 1), Some(5.0));
    }

    #[test]
    fn neighbors_are_sorted_by_id() {
        let mut g = WeightedGraph::new(true);
        g.add_edge(1, 9, 1.0);
        g.add_edge(1, 3, 1.0);
        g.add_edge(1, 7, 1.0);
        let ids: Vec<i64> = g.neighbors(1).iter().map(|&(n, _)| n).collect();
        assert_eq!(ids, vec![3, 7, 9]);
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut g = WeightedGraph::new(true);
        g.add_edge(1, 2, 1.0);
        g.add_node(1);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.out_degree(1), 1);
    }

    #[test]
    fn parses_edge_list_with_optional_weight() {
        let input = "1 2\n2 3 0.5\n";
        let g = WeightedGraph::from_edge_list(input.as_bytes(), true, true).unwrap();
        assert_eq!(g.edge_weight(1, 2), Some(1.0));
        assert_eq!(g.edge_weight(2, 3), Some(0.5));
    }

    #[test]
    fn unweighted_load_ignores_third_column() {
        let input = "1 2 9.0\n";
        let g = WeightedGraph::from_edge_list(input.as_bytes(), true, false).unwrap();
        assert_eq!(g.edge_weight(1, 2), Some(1.0));
    }

    #[test]
    fn malformed_lines_fail_the_load() {
        for bad in ["1\n", "1 2 3 4\n", "a 2\n", "1 b\n", "1 2 x\n", "1 2 -1.0\n"] {
            let err = WeightedGraph::from_edge_list(bad.as_bytes(), true, true).unwrap_err();
            assert!(
                matches!(err, Error::Format { line: 1, .. }),
                "input {bad:?} should be a format error, got {err:?}"
            );
        }
    }
}
