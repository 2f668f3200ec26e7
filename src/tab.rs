//! Single tab retrieval and markup cleaning.
//!
//! Most of `tab_view` is read leniently: a missing key simply comes back
//! as `None`. Two reads are not lenient and fail the request when absent:
//! `meta.tuning` and `wiki_tab.content`.

use anyhow::Result;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::config::{Config, UpstreamConfig};
use crate::error::ScrapeError;
use crate::fetch::{HttpPageSource, PageSource};
use crate::models::{Tab, TabMeta, TabQuery};
use crate::store::{extract_store, int_field, lookup, str_field, StoreDocument};

/// `[ch]`, `[/ch]`, `[tab]` and `[/tab]`.
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[/?(?:ch|tab)\]").expect("marker pattern is valid"));

const TAB_VIEW_PATH: [&str; 4] = ["store", "page", "data", "tab_view"];

/// Strips chord and tab-block markers, leaving everything else untouched.
///
/// Removal repeats until no marker is left, so text like `[[ch]ch]` does
/// not leave a marker behind and the result is always fixed under a second
/// pass.
pub fn clean_tab(text: &str) -> String {
    let mut out = text.to_string();
    while MARKER.is_match(&out) {
        out = MARKER.replace_all(&out, "").into_owned();
    }
    out
}

/// Maps a tab page's store into a [`Tab`], echoing `request_url`.
pub fn map_tab(store: &StoreDocument, request_url: &str) -> crate::error::Result<Tab> {
    let empty = Value::Object(Map::new());
    let view = store.path(&TAB_VIEW_PATH).unwrap_or(&empty);

    let meta = lookup(view, &["meta"]).unwrap_or(&empty);
    let tuning = lookup(meta, &["tuning"])
        .and_then(Value::as_object)
        .ok_or_else(|| ScrapeError::MissingRequiredField("meta.tuning".to_string()))?;

    let content = lookup(view, &["wiki_tab", "content"])
        .and_then(Value::as_str)
        .ok_or_else(|| ScrapeError::MissingRequiredField("wiki_tab.content".to_string()))?;

    let chord_names = lookup(view, &["applicature"])
        .and_then(Value::as_object)
        .map(|chords| chords.keys().cloned().collect())
        .unwrap_or_default();

    Ok(Tab {
        url: request_url.to_string(),
        tab_body: clean_tab(content),
        chord_names,
        meta: TabMeta {
            capo: int_field(meta, "capo"),
            key: str_field(meta, "tonality"),
            tuning: Some(format_tuning(tuning)),
            difficulty: str_field(meta, "difficulty"),
        },
    })
}

/// Renders `"<name>: <value>"`.
///
/// A missing or null half renders as an empty string (`"Open G: "`), where
/// the Python service this replaces printed `None` (`"None: E A D G B E"`).
fn format_tuning(tuning: &Map<String, Value>) -> String {
    let part = |key: &str| match tuning.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    format!("{}: {}", part("name"), part("value"))
}

/// Checks that `url` is an absolute http(s) URL on an allowed host.
pub fn validate_tab_url(url: &str, upstream: &UpstreamConfig) -> crate::error::Result<()> {
    let parsed = Url::parse(url)
        .map_err(|e| ScrapeError::InvalidRequest(format!("url is not absolute: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScrapeError::InvalidRequest(format!(
            "url must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| ScrapeError::InvalidRequest("url has no host".to_string()))?;

    if !upstream.tab_hosts.is_empty() && !upstream.tab_hosts.iter().any(|h| h == host) {
        return Err(ScrapeError::InvalidRequest(format!(
            "host '{}' is not an allowed tab host",
            host
        )));
    }

    Ok(())
}

/// Runs the full tab pipeline. The URL is fetched verbatim.
///
/// Shared by `POST /tab` and `ugapi tab`.
pub async fn get_tab(
    source: &dyn PageSource,
    config: &Config,
    query: &TabQuery,
) -> crate::error::Result<Tab> {
    validate_tab_url(&query.url, &config.upstream)?;

    let html = source.fetch(&query.url).await?;
    let store = extract_store(&html)?;
    let tab = map_tab(&store, &query.url)?;
    debug!(url = %query.url, chords = tab.chord_names.len(), "mapped tab");

    Ok(tab)
}

/// CLI entry point: fetches one tab and prints it as JSON.
pub async fn run_tab(config: &Config, url: String) -> Result<()> {
    let source = HttpPageSource::new(&config.upstream)?;
    let query = TabQuery { url };

    let tab = match get_tab(&source, config, &query).await {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&tab)?);
    Ok(())
}
