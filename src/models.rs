//! Request and response types for the search and tab endpoints.
//!
//! Every upstream-derived field is optional: the source site may omit any
//! key, and a missing key is reported as `null` rather than defaulted.

use serde::{Deserialize, Serialize};

/// Body of `POST /search`.
///
/// `artist` and `type` are never sent upstream; they only filter the
/// mapped results locally.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One entry of an upstream search results page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: Option<i64>,
    pub song_id: Option<i64>,
    pub artist_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub part: Option<String>,
    pub version: Option<i64>,
    pub votes: Option<i64>,
    pub rating: Option<f64>,
    pub artist_name: Option<String>,
    pub artist_url: Option<String>,
    pub song_name: Option<String>,
    pub marketing_type: Option<String>,
    pub tab_url: Option<String>,
}

/// Body of `POST /tab`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TabQuery {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabMeta {
    pub capo: Option<i64>,
    pub key: Option<String>,
    /// `"<name>: <value>"`, e.g. `"Standard: E A D G B E"`.
    pub tuning: Option<String>,
    pub difficulty: Option<String>,
}

/// A single tab with its markup cleaned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// The URL the tab was requested with, echoed verbatim.
    pub url: String,
    pub tab_body: String,
    pub chord_names: Vec<String>,
    pub meta: TabMeta,
}
