//! A module for working with adjacency records.
//!
//! The adjacency record is the source of truth for everything else in the crate: a mapping from a
//! username to the usernames it is connected to (its followers, as extracted from a capture). It
//! is persisted as a pretty-printed JSON object of string arrays.

use std::{
    collections::{btree_map, BTreeMap},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    persist,
};

/// A mapping from a user to the ordered list of their neighbours.
///
/// Users that aren't a key in the record are treated as having no neighbours.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyRecord {
    entries: BTreeMap<String, Vec<String>>,
}

impl AdjacencyRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a record from its JSON representation and checks every identifier is non-empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use mutuals::record::AdjacencyRecord;
    ///
    /// let record = AdjacencyRecord::from_json(r#"{"a": ["b"]}"#).unwrap();
    /// assert_eq!(record.neighbours("a"), ["b"]);
    ///
    /// assert!(AdjacencyRecord::from_json(r#"{"a": [1]}"#).is_err());
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let record: Self =
            serde_json::from_str(text).map_err(|e| Error::InvalidRecord(e.to_string()))?;
        record.validate()?;

        Ok(record)
    }

    /// Serialises the record as pretty-printed JSON. Non-ASCII characters are written as-is.
    pub fn to_json(&self) -> String {
        // Serialising a map of strings can't fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Loads a record from disk, failing with [`Error::RecordNotFound`] if the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = persist::read_document(path, |path| Error::RecordNotFound { path })?;
        let record = Self::from_json(&text)?;

        info!(path = %path.display(), users = record.len(), "loaded adjacency record");

        Ok(record)
    }

    /// Loads a record from disk, or starts an empty one if the file doesn't exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path.as_ref()) {
            Err(Error::RecordNotFound { path }) => {
                debug!(path = %path.display(), "no adjacency record yet, starting empty");
                Ok(Self::new())
            }
            result => result,
        }
    }

    /// Writes the record to disk, replacing any previous version in one step.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        persist::write_document(path, self.to_json().as_bytes())?;

        info!(path = %path.display(), users = self.len(), "saved adjacency record");

        Ok(())
    }

    /// Replaces the user's entry wholesale, returning the previous neighbour list if there was one.
    pub fn insert(&mut self, user: impl Into<String>, neighbours: Vec<String>) -> Option<Vec<String>> {
        self.entries.insert(user.into(), neighbours)
    }

    /// Returns the user's neighbours in their recorded order, empty if the user is unknown.
    pub fn neighbours(&self, user: &str) -> &[String] {
        self.entries.get(user).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns whether the user has an entry of their own.
    pub fn contains(&self, user: &str) -> bool {
        self.entries.contains_key(user)
    }

    /// Returns the users with an entry, in sorted order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.entries.iter()
    }

    /// Returns the number of users with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that no key or neighbour is an empty identifier.
    pub fn validate(&self) -> Result<()> {
        for (user, neighbours) in &self.entries {
            if user.is_empty() {
                return Err(Error::InvalidRecord("empty username key".to_owned()));
            }

            if neighbours.iter().any(String::is_empty) {
                return Err(Error::InvalidRecord(format!(
                    "empty username in the neighbours of {user}"
                )));
            }
        }

        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for AdjacencyRecord {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AdjacencyRecord {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Replaces `user`'s entry in the record stored at `path` and writes it back.
///
/// The record is created if the file doesn't exist. Callers sharing a record file must serialise
/// their calls, the read-modify-write isn't guarded against concurrent writers.
pub fn update(
    path: impl AsRef<Path>,
    user: impl Into<String>,
    neighbours: Vec<String>,
) -> Result<AdjacencyRecord> {
    let path = path.as_ref();
    let mut record = AdjacencyRecord::load_or_default(path)?;

    let user = user.into();
    if record.insert(user.clone(), neighbours).is_some() {
        debug!(%user, "replaced existing record entry");
    }

    record.save(path)?;

    Ok(record)
}
