//! Follower extraction from HTTP archive (HAR) captures.
//!
//! A capture is a log of request/response pairs recorded by a browser. The follower lists are
//! found in the responses to the friendship API's followers endpoint, each of which embeds a JSON
//! document with a `users` array.

use std::{collections::BTreeSet, path::Path};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    persist,
};

/// Substrings that must all appear in a request URL for its response to hold followers.
const FOLLOWERS_URL_MARKERS: [&str; 2] = ["friendships", "followers"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Har {
    log: Log,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Log {
    entries: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Entry {
    request: Request,
    response: Response,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Request {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Response {
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Content {
    text: Option<String>,
}

/// The embedded body of a followers response.
#[derive(Debug, Deserialize)]
struct FollowersPage {
    #[serde(default)]
    users: Vec<Value>,
}

impl Entry {
    fn is_followers_request(&self) -> bool {
        FOLLOWERS_URL_MARKERS
            .iter()
            .all(|marker| self.request.url.contains(marker))
    }
}

/// Extracts the sorted, deduplicated follower usernames from a HAR document.
///
/// Entries whose URL doesn't point at the followers endpoint are ignored, as are matching entries
/// with an empty or unparseable body and user objects without a string `username`. Only a
/// document that isn't a HAR log at all is an error.
///
/// # Examples
///
/// ```
/// use mutuals::capture::followers_from_str;
///
/// let har = r#"{"log": {"entries": [{
///     "request": {"url": "https://example.com/api/v1/friendships/1/followers/"},
///     "response": {"content": {"text": "{\"users\": [{\"username\": \"bob\"}]}"}}
/// }]}}"#;
///
/// assert_eq!(followers_from_str(har).unwrap(), ["bob"]);
/// ```
pub fn followers_from_str(text: &str) -> Result<Vec<String>> {
    let har: Har = serde_json::from_str(text).map_err(|e| Error::InvalidCapture(e.to_string()))?;

    let mut followers = BTreeSet::new();
    let mut pages = 0usize;

    for entry in har.log.entries.iter().filter(|entry| entry.is_followers_request()) {
        let Some(body) = entry.response.content.text.as_deref().filter(|t| !t.is_empty()) else {
            debug!(url = %entry.request.url, "skipping followers response without a body");
            continue;
        };

        let page: FollowersPage = match serde_json::from_str(body) {
            Ok(page) => page,
            Err(e) => {
                debug!(url = %entry.request.url, error = %e, "skipping unparseable followers body");
                continue;
            }
        };

        pages += 1;
        followers.extend(
            page.users
                .iter()
                .filter_map(|user| user.get("username").and_then(Value::as_str))
                .filter(|username| !username.is_empty())
                .map(str::to_owned),
        );
    }

    debug!(pages, followers = followers.len(), "scanned capture");

    Ok(followers.into_iter().collect())
}

/// Reads a HAR file and extracts its follower usernames.
///
/// Fails with [`Error::CaptureNotFound`] if the file doesn't exist.
pub fn followers(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = persist::read_document(path, |path| Error::CaptureNotFound { path })?;
    let followers = followers_from_str(&text)?;

    info!(path = %path.display(), followers = followers.len(), "extracted followers");

    Ok(followers)
}
