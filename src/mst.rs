//! Minimum spanning trees over weighted graphs.

use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashSet},
};

use ordered_float::OrderedFloat;
use tracing::{debug, info};

use crate::{
    edge::Edge,
    error::{Error, Result},
    graph::WeightedGraph,
};

/// A connected, acyclic [`WeightedGraph`] produced by [`mst`].
pub type SpanningTree = WeightedGraph;

/// An edge leaving the tree, waiting in the frontier queue.
#[derive(Debug, PartialEq, Eq)]
struct Candidate<'a> {
    weight: OrderedFloat<f64>,
    /// Push order, breaks ties between equal weights so pops are deterministic.
    seq: u64,
    from: &'a str,
    to: &'a str,
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-queue of candidate edges, popping the lightest first and the oldest among equals.
#[derive(Default)]
struct Frontier<'a> {
    heap: BinaryHeap<Reverse<Candidate<'a>>>,
    pushed: u64,
}

impl<'a> Frontier<'a> {
    fn push(&mut self, from: &'a str, to: &'a str, weight: f64) {
        self.heap.push(Reverse(Candidate {
            weight: OrderedFloat(weight),
            seq: self.pushed,
            from,
            to,
        }));
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<Candidate<'a>> {
        self.heap.pop().map(|Reverse(candidate)| candidate)
    }
}

/// Computes a minimum spanning tree of the component containing `root`, using Prim's algorithm.
///
/// The tree grows from `root` by repeatedly taking the lightest edge out of the frontier queue.
/// Edges leading back into the tree are left in the queue and discarded when popped rather than
/// removed eagerly. Nodes that can't be reached from `root` are not part of the result, so a
/// disconnected graph yields the tree of `root`'s component only. The input is never modified.
///
/// Fails with [`Error::RootNotFound`] if `root` isn't a node of `graph`.
///
/// # Examples
///
/// ```
/// use mutuals::builder::build;
/// use mutuals::mst::mst;
/// use mutuals::record::AdjacencyRecord;
///
/// let record = AdjacencyRecord::from_json(
///     r#"{"a": ["b", "c"], "b": ["a", "c"], "c": ["a", "b"], "d": ["a"]}"#,
/// )
/// .unwrap();
/// let graph = build(&record).unwrap();
///
/// let tree = mst(&graph, "a").unwrap();
///
/// assert_eq!(tree.node_count(), 4);
/// assert_eq!(tree.edge_count(), 3);
/// assert_eq!(tree.total_weight(), 2.0);
/// ```
pub fn mst(graph: &WeightedGraph, root: &str) -> Result<SpanningTree> {
    let root = graph
        .node(root)
        .ok_or_else(|| Error::RootNotFound(root.to_owned()))?;

    let mut tree = SpanningTree::new();
    tree.add_node(root);

    let mut visited: HashSet<&str> = HashSet::from([root]);
    let mut frontier = Frontier::default();

    for (neighbour, weight) in graph.neighbours(root) {
        frontier.push(root, neighbour, weight);
    }

    let mut stale = 0usize;
    while let Some(Candidate { weight, from, to, .. }) = frontier.pop() {
        if !visited.insert(to) {
            stale += 1;
            continue;
        }

        tree.insert(Edge::new(from.to_owned(), to.to_owned()), weight.into_inner());

        for (next, next_weight) in graph.neighbours(to) {
            if !visited.contains(next) {
                frontier.push(to, next, next_weight);
            }
        }
    }

    debug!(stale, "discarded stale frontier entries");
    info!(
        %root,
        nodes = tree.node_count(),
        edges = tree.edge_count(),
        total_weight = tree.total_weight(),
        "grew minimum spanning tree"
    );

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;

    fn graph(edges: &[(&str, &str, f64)]) -> WeightedGraph {
        let mut graph = WeightedGraph::new();
        for (u, v, w) in edges {
            graph.insert(Edge::new(u.to_string(), v.to_string()), *w);
        }

        graph
    }

    #[test]
    fn frontier_pops_lightest_then_oldest() {
        let mut frontier = Frontier::default();
        frontier.push("a", "x", 0.5);
        frontier.push("a", "y", 0.25);
        frontier.push("b", "z", 0.5);
        frontier.push("c", "w", 1.0);

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop())
            .map(|c| c.to)
            .collect();

        assert_eq!(order, vec!["y", "x", "z", "w"]);
    }

    #[test]
    fn triangle_with_pendant() {
        let record = record! {
            "a" => ["b", "c"],
            "b" => ["a", "c"],
            "c" => ["a", "b"],
            "d" => ["a"],
        };
        let graph = build(&record).unwrap();

        let tree = mst(&graph, "a").unwrap();

        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.edge_count(), 3);
        assert_eq!(tree.total_weight(), 2.0);
        assert_eq!(tree.weight("a", "d"), Some(1.0));
        // Exactly one of the three 0.5 triangle edges is left out.
        let triangle = [("a", "b"), ("a", "c"), ("b", "c")]
            .iter()
            .filter(|(u, v)| tree.weight(u, v).is_some())
            .count();
        assert_eq!(triangle, 2);
    }

    #[test]
    fn prefers_light_edges() {
        // a-b-c path is cheaper than the direct a-c edge.
        let graph = graph(&[("a", "b", 0.25), ("b", "c", 0.25), ("a", "c", 1.0)]);

        let tree = mst(&graph, "a").unwrap();

        assert_eq!(tree.total_weight(), 0.5);
        assert_eq!(tree.weight("a", "c"), None);
    }

    #[test]
    fn total_weight_independent_of_root() {
        let graph = graph(&[
            ("a", "b", 1.0),
            ("b", "c", 0.5),
            ("c", "d", 0.25),
            ("d", "a", 0.2),
            ("a", "c", 0.1),
        ]);

        for root in ["a", "b", "c", "d"] {
            let tree = mst(&graph, root).unwrap();
            assert_eq!(tree.edge_count(), 3);
            assert!((tree.total_weight() - 0.8).abs() < 1e-12);
        }
    }

    #[test]
    fn disconnected_graph_keeps_root_component() {
        let graph = graph(&[("a", "b", 0.5), ("c", "d", 0.5)]);

        let tree = mst(&graph, "c").unwrap();

        assert_eq!(tree.nodes().collect::<Vec<_>>(), vec!["c", "d"]);
        assert_eq!(tree.edge_count(), 1);
    }

    #[test]
    fn isolated_root() {
        let mut graph = graph(&[("a", "b", 0.5)]);
        graph.add_node("alone");

        let tree = mst(&graph, "alone").unwrap();

        assert_eq!(tree.nodes().collect::<Vec<_>>(), vec!["alone"]);
        assert_eq!(tree.edge_count(), 0);
    }

    #[test]
    fn input_untouched() {
        let graph = graph(&[("a", "b", 0.5), ("b", "c", 0.5), ("a", "c", 0.5)]);
        let before = graph.clone();

        mst(&graph, "a").unwrap();

        assert_eq!(graph, before);
    }

    #[test]
    fn unknown_root() {
        let graph = graph(&[("a", "b", 0.5)]);

        assert!(matches!(
            mst(&graph, "z"),
            Err(Error::RootNotFound(root)) if root == "z"
        ));
    }
}
