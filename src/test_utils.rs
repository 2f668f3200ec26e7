//! Canned pages and page builders shared by unit tests.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, ScrapeError};
use crate::fetch::PageSource;

/// In-memory [`PageSource`]. Unknown URLs fail as unreachable, and every
/// requested URL is recorded.
#[derive(Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for StaticPages {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .map(|html| Bytes::from(html.clone()))
            .ok_or_else(|| ScrapeError::unreachable(url, "HTTP 404 Not Found"))
    }
}

/// Wraps a store document in the marker element, entity-encoding it the
/// way the upstream site does.
pub fn store_page(store: &Value) -> String {
    let encoded = store
        .to_string()
        .replace('&', "&amp;")
        .replace('"', "&quot;");
    format!(
        "<!DOCTYPE html><html><head><title>t</title></head><body>\
         <div class=\"js-store\" data-content=\"{}\"></div></body></html>",
        encoded
    )
}
