//! Error types for the poll pipeline.

use thiserror::Error;

use stackwatch_api::FetchError;

/// Errors that abort a poll tick.
///
/// Every variant fails the whole tick; previously published metrics are
/// left untouched by the caller.
#[derive(Debug, Error)]
pub enum PollError {
    /// A fetch failed at the transport or JSON-decode layer.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Decoded JSON was missing an expected shape (no project entries,
    /// missing links). Carries the offending payload for diagnostics.
    #[error("unexpected payload from {url}: {reason}")]
    Structure {
        url: String,
        reason: String,
        /// Truncated rendering of the payload that failed validation.
        payload: String,
    },

    /// A spawned services fetch panicked or was cancelled.
    #[error("services fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
