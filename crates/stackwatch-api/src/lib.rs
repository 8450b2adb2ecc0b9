//! stackwatch-api — client for the cluster orchestrator's REST API.
//!
//! The orchestrator exposes linked collections (projects → environments,
//! hosts; environments → services). This crate provides the authenticated
//! JSON fetcher and the wire types for those collections; walking the
//! links lives in `stackwatch-poller`.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, TraceEvent, TraceHook};
pub use error::FetchError;
pub use types::{Collection, Environment, Host, Links, Project, Service};
