//! Error types for upstream API fetches.

use thiserror::Error;

/// Errors produced by a single fetch against the orchestrator API.
///
/// Transport and decode failures are distinct: a decode failure means the
/// server answered but the body was not JSON, and callers may want to log
/// the raw status and body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a usable response (connection refused,
    /// timeout, broken transfer).
    #[error("transport failure fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be decoded as JSON.
    #[error("response from {url} is not valid JSON (status {status})")]
    Decode {
        url: String,
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
        #[source]
        source: serde_json::Error,
    },
}
