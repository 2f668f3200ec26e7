//! Outbound page fetching.
//!
//! The pipelines only need "GET this URL and give me the body", so that
//! seam is the [`PageSource`] trait. [`HttpPageSource`] is the real
//! implementation; tests plug in canned pages instead.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::{Result, ScrapeError};

/// Something that can fetch a page body by URL.
///
/// A single GET, no retries. Any transport failure or non-success status
/// becomes [`ScrapeError::UpstreamUnreachable`].
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// [`PageSource`] backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Builds the client. Only the timeout is configurable; headers,
    /// redirects and pooling stay at the `reqwest` defaults.
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        debug!(url, "fetching upstream page");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::unreachable(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::unreachable(url, format!("HTTP {}", status)));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ScrapeError::unreachable(url, e))?;
        debug!(url, bytes = body.len(), "fetched upstream page");

        Ok(body)
    }
}
