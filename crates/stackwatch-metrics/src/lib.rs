//! stackwatch-metrics — gauge publishing and the `/metrics` endpoint.
//!
//! A poll outcome is mapped onto three fixed gauge families registered in
//! a caller-owned `prometheus::Registry`; the server module exposes that
//! registry in the text exposition format.

pub mod publish;
pub mod server;

pub use publish::{StatusGauges, sanitize_label, state_value};
pub use server::build_router;
