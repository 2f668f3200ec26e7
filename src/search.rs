//! Tab search: URL building, result mapping and local filtering.
//!
//! Only the query text goes upstream. The optional `artist` and `type`
//! fields are applied here, after mapping, as exact case-sensitive
//! matches that keep the upstream order.

use anyhow::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::ScrapeError;
use crate::fetch::{HttpPageSource, PageSource};
use crate::models::{SearchQuery, SearchResult};
use crate::store::{extract_store, int_field, str_field, StoreDocument};

/// Characters left unescaped in the query value: ASCII alphanumerics
/// and `-._~/`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

const RESULTS_PATH: [&str; 4] = ["store", "page", "data", "results"];

/// Builds the upstream title-search URL for `query`.
pub fn search_url(base: &str, query: &str) -> String {
    format!(
        "{}?search_type=title&value={}",
        base,
        utf8_percent_encode(query, QUERY_VALUE)
    )
}

/// Maps every entry of `store.page.data.results`.
///
/// A missing path is an error; an empty array is not.
pub fn map_results(store: &StoreDocument) -> crate::error::Result<Vec<SearchResult>> {
    let results = store
        .path(&RESULTS_PATH)
        .and_then(Value::as_array)
        .ok_or_else(|| ScrapeError::UnexpectedStoreShape(RESULTS_PATH.join(".")))?;

    Ok(results.iter().map(map_result).collect())
}

fn map_result(entry: &Value) -> SearchResult {
    SearchResult {
        id: int_field(entry, "id"),
        song_id: int_field(entry, "song_id"),
        artist_id: int_field(entry, "artist_id"),
        kind: str_field(entry, "type"),
        part: str_field(entry, "part"),
        version: int_field(entry, "version"),
        votes: int_field(entry, "votes"),
        rating: entry.get("rating").and_then(Value::as_f64),
        artist_name: str_field(entry, "artist_name"),
        artist_url: str_field(entry, "artist_url"),
        song_name: str_field(entry, "song_name"),
        marketing_type: str_field(entry, "marketing_type"),
        tab_url: str_field(entry, "tab_url"),
    }
}

/// Keeps results matching the query's `type` and `artist`, when given.
///
/// An empty `type` or `artist` is no filter at all.
pub fn filter_results(results: Vec<SearchResult>, query: &SearchQuery) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|r| matches_query(r, query))
        .collect()
}

fn matches_query(result: &SearchResult, query: &SearchQuery) -> bool {
    let kind_ok = query
        .kind
        .as_deref()
        .filter(|k| !k.is_empty())
        .map_or(true, |k| result.kind.as_deref() == Some(k));
    let artist_ok = query
        .artist
        .as_deref()
        .filter(|a| !a.is_empty())
        .map_or(true, |a| result.artist_name.as_deref() == Some(a));
    kind_ok && artist_ok
}

/// Runs the full search pipeline: fetch, extract, map, filter.
///
/// Shared by `POST /search` and `ugapi search`.
pub async fn search_tabs(
    source: &dyn PageSource,
    config: &Config,
    query: &SearchQuery,
) -> crate::error::Result<Vec<SearchResult>> {
    let url = search_url(&config.upstream.search_url, &query.query);
    let html = source.fetch(&url).await?;
    let store = extract_store(&html)?;

    let results = map_results(&store)?;
    let total = results.len();
    let results = filter_results(results, query);
    debug!(total, kept = results.len(), "mapped search results");

    Ok(results)
}

/// CLI entry point: runs one search and prints the JSON array to stdout.
pub async fn run_search(
    config: &Config,
    query: String,
    artist: Option<String>,
    kind: Option<String>,
) -> Result<()> {
    let source = HttpPageSource::new(&config.upstream)?;
    let query = SearchQuery {
        query,
        artist,
        kind,
    };

    let results = match search_tabs(&source, config, &query).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
