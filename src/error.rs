//! Error kinds raised by the scrape pipeline.
//!
//! Every stage of a request (fetch, extract, map) fails fast with one of
//! these variants. Nothing is retried or recovered internally; the server
//! maps each variant to an HTTP status in [`crate::server`].

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors that can occur while scraping the upstream site.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The outbound fetch failed or returned a non-success status.
    #[error("upstream unreachable ({url}): {reason}")]
    UpstreamUnreachable { url: String, reason: String },

    /// The marker element or its JSON payload could not be found or parsed.
    #[error("malformed upstream page: {0}")]
    MalformedUpstreamPage(String),

    /// The store document is missing the path a search page should carry.
    #[error("unexpected store shape: missing {0}")]
    UnexpectedStoreShape(String),

    /// A tab page is missing a field that is read unconditionally.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    /// The caller sent something the pipeline refuses to act on.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ScrapeError {
    /// Machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ScrapeError::UpstreamUnreachable { .. } => "upstream_unreachable",
            ScrapeError::MalformedUpstreamPage(_) => "malformed_upstream_page",
            ScrapeError::UnexpectedStoreShape(_) => "unexpected_store_shape",
            ScrapeError::MissingRequiredField(_) => "missing_required_field",
            ScrapeError::InvalidRequest(_) => "bad_request",
        }
    }

    pub(crate) fn unreachable(url: &str, err: impl std::fmt::Display) -> Self {
        ScrapeError::UpstreamUnreachable {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ScrapeError::unreachable("http://x", "boom"),
            ScrapeError::MalformedUpstreamPage("x".into()),
            ScrapeError::UnexpectedStoreShape("x".into()),
            ScrapeError::MissingRequiredField("x".into()),
            ScrapeError::InvalidRequest("x".into()),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_unreachable_message_names_url() {
        let err = ScrapeError::unreachable("http://example.test/a", "HTTP 503");
        let msg = err.to_string();
        assert!(msg.contains("http://example.test/a"));
        assert!(msg.contains("HTTP 503"));
    }
}
