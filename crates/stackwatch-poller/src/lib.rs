//! stackwatch-poller — the poll-aggregate pipeline.
//!
//! One tick walks the orchestrator's resource graph (projects →
//! environments + hosts → per-environment services), joins services to
//! their environments by id, and reduces per-service states into one
//! aggregate state per environment. Nothing here touches the metrics
//! registry; publishing is the caller's concern.

pub mod error;
pub mod record;
pub mod reducer;
pub mod walker;

pub use error::PollError;
pub use record::{HostRecord, PollOutcome, ServiceRecord};
pub use reducer::{ACTIVE_STATE, UNKNOWN_ENVIRONMENT, reduce};
pub use walker::GraphWalker;
