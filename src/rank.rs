//! Ranking of a user's direct connections by shared neighbours.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    record::AdjacencyRecord,
    weight::mutual_count,
};

/// The number of connections reported when the caller doesn't ask for a specific amount.
pub const DEFAULT_TOP_N: usize = 10;

/// One of a user's direct connections and how many neighbours they share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub username: String,
    pub mutuals: usize,
}

/// Returns at most `top_n` of `username`'s direct connections, closest first.
///
/// Connections are taken from the record (not a built graph) and ordered by mutual count,
/// descending. Ties keep the order the connections appear in `username`'s neighbour list. The
/// user never appears in their own ranking and repeated neighbours are only reported once.
///
/// Fails with [`Error::UserNotFound`] if `username` has no entry in the record.
///
/// # Examples
///
/// ```
/// use mutuals::rank::rank;
/// use mutuals::record::AdjacencyRecord;
///
/// let record = AdjacencyRecord::from_json(
///     r#"{"a": ["d", "b", "c"], "b": ["a", "c"], "c": ["a", "b"], "d": ["a"]}"#,
/// )
/// .unwrap();
///
/// let ranked: Vec<_> = rank(&record, "a", 10)
///     .unwrap()
///     .into_iter()
///     .map(|c| (c.username, c.mutuals))
///     .collect();
///
/// assert_eq!(
///     ranked,
///     [("b".to_owned(), 1), ("c".to_owned(), 1), ("d".to_owned(), 0)]
/// );
/// ```
pub fn rank(record: &AdjacencyRecord, username: &str, top_n: usize) -> Result<Vec<Connection>> {
    if !record.contains(username) {
        return Err(Error::UserNotFound(username.to_owned()));
    }

    let mut seen = HashSet::new();
    let mut connections: Vec<Connection> = record
        .neighbours(username)
        .iter()
        .filter(|neighbour| *neighbour != username && seen.insert(neighbour.as_str()))
        .map(|neighbour| Connection {
            username: neighbour.clone(),
            mutuals: mutual_count(record, username, neighbour),
        })
        .collect();

    // `sort_by` is stable, so equal counts stay in neighbour list order.
    connections.sort_by(|a, b| b.mutuals.cmp(&a.mutuals));
    connections.truncate(top_n);

    debug!(%username, returned = connections.len(), "ranked connections");

    Ok(connections)
}
