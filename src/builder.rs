//! Construction of the weighted graph from an adjacency record.

use tracing::{debug, info};

use crate::{
    edge::Edge,
    error::Result,
    graph::WeightedGraph,
    record::AdjacencyRecord,
    weight::weight,
};

/// Builds the weighted, undirected graph described by an adjacency record.
///
/// Every user with an entry becomes a node, as does every neighbour that only ever appears in
/// someone else's list. Each recorded relationship becomes one edge weighted by
/// [`weight`](crate::weight::weight); a pair recorded from both sides is stored once. Self-loops
/// are dropped.
///
/// Fails with [`Error::InvalidRecord`](crate::error::Error::InvalidRecord) if the record holds
/// an empty identifier.
///
/// # Examples
///
/// ```
/// use mutuals::builder::build;
/// use mutuals::record::AdjacencyRecord;
///
/// let record = AdjacencyRecord::from_json(r#"{"a": ["b", "c"], "b": ["a", "c"]}"#).unwrap();
/// let graph = build(&record).unwrap();
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.weight("a", "b"), Some(0.5));
/// ```
pub fn build(record: &AdjacencyRecord) -> Result<WeightedGraph> {
    record.validate()?;

    let mut graph = WeightedGraph::new();

    for user in record.users() {
        graph.add_node(user);
    }

    for (user, neighbours) in record {
        for neighbour in neighbours {
            if neighbour == user {
                debug!(%user, "dropping self-loop");
                continue;
            }

            let edge = Edge::new(user.clone(), neighbour.clone());
            if graph.contains(&edge) {
                continue;
            }

            graph.insert(edge, weight(record, user, neighbour));
        }
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built weighted graph"
    );

    Ok(graph)
}
