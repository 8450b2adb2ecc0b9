//! Wire types for the orchestrator API.
//!
//! Every collection endpoint wraps its entries in a `data` array. Fields
//! are deliberately lenient (`Option` / defaulted): the poller validates
//! the shapes it needs and reports missing pieces as structural errors
//! with the offending payload attached, instead of failing inside serde.

use std::collections::HashMap;

use serde::Deserialize;

/// A `{ "data": [...] }` collection envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Collection<T> {
    #[serde(default)]
    pub data: Vec<T>,
}

/// Link URLs a resource exposes to its related collections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    pub environments: Option<String>,
    pub hosts: Option<String>,
    pub services: Option<String>,
}

/// An entry in the projects root collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub links: Links,
}

/// An environment (stack): a named grouping of services.
#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub links: Links,
}

/// A service with its raw lifecycle state and owning environment id.
#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub name: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "environmentId")]
    pub environment_id: Option<String>,
}

/// A cluster host. `name` may be absent; `hostname` is the fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct Host {
    pub name: Option<String>,
    pub hostname: Option<String>,
    pub state: Option<String>,
    /// Host labels, fetched but unused downstream.
    #[serde(default)]
    pub labels: HashMap<String, serde_json::Value>,
}
