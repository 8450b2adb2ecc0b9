//! Normalized records produced by one poll tick.
//!
//! Everything here is rebuilt from scratch each tick; no identity
//! survives from one tick to the next.

use std::collections::BTreeMap;

/// A service joined to its owning environment's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub name: String,
    /// Raw lifecycle state as reported by the API (`active`, `inactive`,
    /// `upgrading`, ...).
    pub state: String,
    /// Resolved environment name; `None` when the service's environment id
    /// had no entry in this tick's environment collection.
    pub environment: Option<String>,
}

/// A cluster host with its raw lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub name: String,
    pub state: String,
}

/// Everything one successful tick produced.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// Aggregate state per environment name; any non-active service state
    /// wins. Environments with zero services this tick are absent.
    pub environments: BTreeMap<String, String>,
    pub services: Vec<ServiceRecord>,
    pub hosts: Vec<HostRecord>,
}
