//! Mutuals is a small toolkit for analysing follower graphs, the "who follows whom" relationships
//! extracted from recorded network traffic.
//!
//! # Basic usage
//!
//! The library is centered around the [`AdjacencyRecord`](record::AdjacencyRecord), a mapping
//! from each user to their followers. From it a [`WeightedGraph`](graph::WeightedGraph) can be
//! built where every relationship is weighted by `1 / (1 + mutuals)`, so pairs sharing more
//! followers are "closer". The record answers who someone's closest connections are, the graph
//! yields a minimum spanning tree of the network.
//!
//! ```rust
//! use mutuals::{builder, mst, rank, record::AdjacencyRecord};
//!
//! let record = AdjacencyRecord::from_json(
//!     r#"{"a": ["b", "c"], "b": ["a", "c"], "c": ["a", "b"], "d": ["a"]}"#,
//! )
//! .unwrap();
//!
//! // Closest connections by shared followers, ties keep the record's order.
//! let closest = rank::rank(&record, "a", 2).unwrap();
//! assert_eq!(closest[0].username, "b");
//! assert_eq!(closest[0].mutuals, 1);
//!
//! // The weighted graph and its minimum spanning tree rooted at "a".
//! let graph = builder::build(&record).unwrap();
//! assert_eq!(graph.weight("a", "d"), Some(1.0));
//!
//! let tree = mst::mst(&graph, "a").unwrap();
//! assert_eq!(tree.edge_count(), 3);
//! assert_eq!(tree.total_weight(), 2.0);
//! ```

#[cfg(test)]
macro_rules! record {
    ($($user:expr => [$($neighbour:expr),* $(,)?]),* $(,)?) => {
        $crate::record::AdjacencyRecord::from_iter([
            $(($user, vec![$($neighbour.to_owned()),*])),*
        ])
    };
}

pub mod builder;
pub mod capture;
pub mod cli;
pub mod edge;
pub mod error;
pub mod gexf;
pub mod graph;
pub mod mst;
mod persist;
pub mod rank;
pub mod record;
pub mod weight;

pub use error::{Error, Result};
