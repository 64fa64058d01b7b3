//! A module for working with undirected edges.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

/// An unordered pair of users connected by a relationship.
///
/// The `source`-`target` naming only records the orientation the edge was first seen in;
/// `Edge::new(a, b)` and `Edge::new(b, a)` compare and hash as the same edge.
#[derive(Clone, Debug, Eq)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge between two users.
    ///
    /// # Examples
    ///
    /// ```
    /// use mutuals::edge::Edge;
    ///
    /// let edge = Edge::new("alice", "bob");
    /// assert_eq!(edge, Edge::new("bob", "alice"));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the endpoint the edge was first seen from.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the endpoint the edge was first seen towards.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns whether both endpoints are the same user.
    pub fn is_loop(&self) -> bool
    where
        T: PartialEq,
    {
        self.source == self.target
    }

    /// Returns the endpoints with the smaller one first.
    pub fn ordered(&self) -> (&T, &T)
    where
        T: Ord,
    {
        match self.source.cmp(&self.target) {
            Ordering::Greater => (&self.target, &self.source),
            _ => (&self.source, &self.target),
        }
    }
}

//
// Trait implementations
//

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.source == other.source && self.target == other.target)
            || (self.source == other.target && self.target == other.source)
    }
}

impl<T: Hash + Ord> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash in canonical order so (a, b) and (b, a) land in the same bucket.
        let (low, high) = self.ordered();
        low.hash(state);
        high.hash(state);
    }
}

impl<T: Ord> PartialOrd for Edge<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Edge<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordered().cmp(&other.ordered())
    }
}
