//! A module for working with weighted graphs.

use std::collections::{BTreeMap, HashMap};

use crate::edge::Edge;

/// An undirected, simple graph of users with a non-negative weight on every edge.
///
/// Nodes are kept in sorted order, which makes every traversal over the graph deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightedGraph {
    /// The edges in the graph and their weights. Each unordered pair appears at most once.
    edges: HashMap<Edge<String>, f64>,
    /// A mapping of every node to its neighbours and the weight of the edge connecting them.
    ///
    /// Isolated nodes are present with an empty neighbour map.
    adjacency: BTreeMap<String, BTreeMap<String, f64>>,
}

impl WeightedGraph {
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use mutuals::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::new();
    /// assert!(graph.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node without any edges, returning `false` if it was already present.
    pub fn add_node(&mut self, node: impl Into<String>) -> bool {
        let node = node.into();
        if self.adjacency.contains_key(&node) {
            return false;
        }

        self.adjacency.insert(node, BTreeMap::new());
        true
    }

    /// Inserts a weighted edge, adding its endpoints as nodes if needed.
    ///
    /// Returns `false` and leaves the graph untouched if the pair is already connected (in
    /// either orientation) or if the edge is a self-loop.
    ///
    /// # Examples
    ///
    /// ```
    /// use mutuals::edge::Edge;
    /// use mutuals::graph::WeightedGraph;
    ///
    /// let mut graph = WeightedGraph::new();
    ///
    /// assert!(graph.insert(Edge::new("a".into(), "b".into()), 0.5));
    /// assert!(!graph.insert(Edge::new("b".into(), "a".into()), 0.5));
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn insert(&mut self, edge: Edge<String>, weight: f64) -> bool {
        debug_assert!(weight.is_finite() && weight >= 0.0);

        if edge.is_loop() || self.edges.contains_key(&edge) {
            return false;
        }

        let (source, target) = (edge.source().clone(), edge.target().clone());
        self.adjacency
            .entry(source.clone())
            .or_default()
            .insert(target.clone(), weight);
        self.adjacency
            .entry(target)
            .or_default()
            .insert(source, weight);
        self.edges.insert(edge, weight);

        true
    }

    /// Checks if the graph contains a node.
    pub fn contains_node(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Returns the graph's own copy of a node's name, if present.
    pub fn node(&self, node: &str) -> Option<&str> {
        self.adjacency
            .get_key_value(node)
            .map(|(name, _)| name.as_str())
    }

    /// Checks if the graph contains an edge, regardless of orientation.
    pub fn contains(&self, edge: &Edge<String>) -> bool {
        self.edges.contains_key(edge)
    }

    /// Returns the weight of the edge between `u` and `v`, if they are connected.
    pub fn weight(&self, u: &str, v: &str) -> Option<f64> {
        self.adjacency.get(u)?.get(v).copied()
    }

    /// Returns the nodes in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Returns the edges and their weights in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (&Edge<String>, f64)> {
        self.edges.iter().map(|(edge, weight)| (edge, *weight))
    }

    /// Returns the edges and their weights sorted by their (unordered) endpoints.
    pub fn sorted_edges(&self) -> Vec<(&Edge<String>, f64)> {
        let mut edges: Vec<_> = self.edges().collect();
        edges.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        edges
    }

    /// Returns the neighbours of a node in sorted order along with the connecting edge's weight.
    ///
    /// Unknown nodes have no neighbours.
    pub fn neighbours<'a>(&'a self, node: &str) -> impl Iterator<Item = (&'a str, f64)> {
        self.adjacency
            .get(node)
            .into_iter()
            .flatten()
            .map(|(neighbour, weight)| (neighbour.as_str(), *weight))
    }

    /// Returns the node count of the graph.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Returns the sum of all edge weights.
    pub fn total_weight(&self) -> f64 {
        self.edges.values().sum()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges. Graphs with fewer than two nodes have a density of 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use mutuals::edge::Edge;
    /// use mutuals::graph::WeightedGraph;
    ///
    /// let mut graph = WeightedGraph::new();
    ///
    /// graph.insert(Edge::new("a".into(), "b".into()), 1.0);
    /// assert_eq!(graph.density(), 1.0);
    ///
    /// graph.insert(Edge::new("a".into(), "c".into()), 1.0);
    /// assert_eq!(graph.density(), 2.0 / 3.0);
    /// ```
    pub fn density(&self) -> f64 {
        let nc = self.node_count() as f64;
        if nc < 2.0 {
            return 0.0;
        }

        // Actual edges divided by the possible edges gives the density.
        self.edge_count() as f64 / (nc * (nc - 1.0) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! graph {
        ($(($u:expr, $v:expr, $w:expr)),* $(,)?) => {{
            let mut graph = WeightedGraph::new();
            $(
                graph.insert(Edge::new($u.to_owned(), $v.to_owned()), $w);
            )*
            graph
        }};
    }

    fn edge(u: &str, v: &str) -> Edge<String> {
        Edge::new(u.to_owned(), v.to_owned())
    }

    #[test]
    fn new() {
        let graph = WeightedGraph::new();

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn add_node() {
        let mut graph = WeightedGraph::new();

        assert!(graph.add_node("a"));
        assert!(!graph.add_node("a"));
        assert!(graph.contains_node("a"));
        assert_eq!(graph.neighbours("a").count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn insert() {
        let mut graph = WeightedGraph::new();

        assert!(graph.insert(edge("a", "b"), 0.5));
        assert!(!graph.insert(edge("a", "b"), 0.5));
        assert!(!graph.insert(edge("b", "a"), 0.25));

        // The first weight wins.
        assert_eq!(graph.weight("a", "b"), Some(0.5));
        assert_eq!(graph.weight("b", "a"), Some(0.5));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn insert_rejects_loops() {
        let mut graph = WeightedGraph::new();

        assert!(!graph.insert(edge("a", "a"), 1.0));
        assert!(graph.is_empty());
    }

    #[test]
    fn insert_adds_endpoints() {
        let mut graph = WeightedGraph::new();
        graph.add_node("a");

        graph.insert(edge("a", "b"), 1.0);

        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn contains() {
        let graph = graph![("a", "b", 1.0)];

        assert!(graph.contains(&edge("a", "b")));
        assert!(graph.contains(&edge("b", "a")));
        assert!(!graph.contains(&edge("b", "c")));
    }

    #[test]
    fn neighbours() {
        let graph = graph![("a", "c", 0.5), ("a", "b", 1.0), ("b", "c", 0.25)];

        assert_eq!(
            graph.neighbours("a").collect::<Vec<_>>(),
            vec![("b", 1.0), ("c", 0.5)]
        );
        assert_eq!(graph.neighbours("z").count(), 0);
        assert_eq!(graph.neighbours("c").count(), 2);
    }

    #[test]
    fn sorted_edges() {
        let graph = graph![("c", "a", 0.5), ("b", "a", 1.0), ("c", "b", 0.25)];

        let edges: Vec<_> = graph
            .sorted_edges()
            .into_iter()
            .map(|(edge, weight)| (edge.ordered(), weight))
            .collect();

        let (a, b, c) = ("a".to_owned(), "b".to_owned(), "c".to_owned());
        assert_eq!(
            edges,
            vec![((&a, &b), 1.0), ((&a, &c), 0.5), ((&b, &c), 0.25)]
        );
    }

    #[test]
    fn node_and_edge_count() {
        let mut graph = WeightedGraph::new();
        assert_eq!(graph.node_count(), 0);

        // Verify two new nodes get added when they don't yet exist in the graph.
        graph.insert(edge("a", "b"), 1.0);
        assert_eq!(graph.node_count(), 2);

        // Verify only one new node is added when one of them already exists in the graph.
        graph.insert(edge("a", "c"), 1.0);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn total_weight() {
        let graph = graph![("a", "b", 0.5), ("a", "c", 0.25), ("b", "c", 1.0)];

        assert_eq!(graph.total_weight(), 1.75);
    }

    #[test]
    fn density() {
        let mut graph = WeightedGraph::new();
        assert_eq!(graph.density(), 0.0);

        graph.add_node("a");
        assert_eq!(graph.density(), 0.0);

        graph.insert(edge("a", "b"), 1.0);
        assert_eq!(graph.density(), 1.0);

        graph.add_node("c");
        assert_eq!(graph.density(), 1.0 / 3.0);
    }
}
