//! Extraction of the JSON store embedded in upstream pages.
//!
//! Every Ultimate Guitar page carries its data in the `data-content`
//! attribute of a `<div class="js-store">`. This module is the only place
//! that knows about that markup. If the element moves or the payload stops
//! being JSON, extraction fails; there is no fallback.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{Result, ScrapeError};

const MARKER_SELECTOR: &str = "div.js-store";
const PAYLOAD_ATTR: &str = "data-content";

/// The parsed store of a single page. Read-only once built and dropped
/// with the request that fetched it.
#[derive(Debug, Clone)]
pub struct StoreDocument {
    root: Value,
}

impl StoreDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn value(&self) -> &Value {
        &self.root
    }

    /// Follows object keys from the root. Returns `None` at the first
    /// missing key, non-object step or JSON `null`.
    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        lookup(&self.root, keys)
    }
}

/// Safe navigation over nested objects; `null` counts as absent.
pub fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in keys {
        current = current.as_object()?.get(*key)?;
    }
    (!current.is_null()).then_some(current)
}

/// Integer field; whole-number floats are accepted, anything else is absent.
pub fn int_field(entry: &Value, key: &str) -> Option<i64> {
    let v = entry.get(key)?;
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

pub fn str_field(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Locates the marker element in `html` and parses its payload.
pub fn extract_store(html: &[u8]) -> Result<StoreDocument> {
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    let selector = Selector::parse(MARKER_SELECTOR)
        .map_err(|e| ScrapeError::MalformedUpstreamPage(format!("bad marker selector: {}", e)))?;

    let marker = document.select(&selector).next().ok_or_else(|| {
        ScrapeError::MalformedUpstreamPage(format!("no {} element on page", MARKER_SELECTOR))
    })?;

    let payload = marker.value().attr(PAYLOAD_ATTR).ok_or_else(|| {
        ScrapeError::MalformedUpstreamPage(format!(
            "{} element has no {} attribute",
            MARKER_SELECTOR, PAYLOAD_ATTR
        ))
    })?;

    let root: Value = serde_json::from_str(payload).map_err(|e| {
        ScrapeError::MalformedUpstreamPage(format!("{} is not valid JSON: {}", PAYLOAD_ATTR, e))
    })?;

    Ok(StoreDocument::new(root))
}
