//! Resource graph walker.
//!
//! Walks the orchestrator API in dependency order, one tick at a time:
//!
//! 1. projects root → environments link + hosts link
//! 2. environments collection → id → name map, services links
//! 3. hosts collection (concurrent with 2)
//! 4. services per environment, fanned out and joined all-or-nothing
//! 5. flatten + join services to environment names
//! 6. reduce to aggregate environment state
//!
//! Any failure short-circuits the tick. Shape problems are raised as
//! structural errors with the offending payload attached, before any
//! later step could trip over a missing field.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use stackwatch_api::{ApiClient, Collection, Environment, Host, Project, Service};

use crate::error::PollError;
use crate::record::{HostRecord, PollOutcome, ServiceRecord};
use crate::reducer::reduce;

/// Longest payload rendering attached to a structural error.
const PAYLOAD_SNIPPET_CHARS: usize = 2048;

/// Walks the resource graph once per [`poll`](GraphWalker::poll) call.
pub struct GraphWalker {
    client: Arc<ApiClient>,
    api_url: String,
}

impl GraphWalker {
    /// Create a walker rooted at `api_url` (e.g. `http://orchestrator:8080/v1`).
    pub fn new(client: Arc<ApiClient>, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Run one full tick of the fetch-and-join sequence.
    pub async fn poll(&self) -> Result<PollOutcome, PollError> {
        // Step 1: the projects root names the two collections we walk next.
        let projects_url = format!("{}/projects", self.api_url);
        let root = self.client.fetch(&projects_url).await?;
        let projects: Collection<Project> = decode(&projects_url, &root)?;

        let Some(project) = projects.data.first() else {
            return Err(structure(
                &projects_url,
                "expected at least one project entry, got an empty collection",
                &root,
            ));
        };
        let environments_url = project.links.environments.as_deref().ok_or_else(|| {
            structure(&projects_url, "project entry has no environments link", &root)
        })?;
        let hosts_url = project
            .links
            .hosts
            .as_deref()
            .ok_or_else(|| structure(&projects_url, "project entry has no hosts link", &root))?;

        // Steps 2 + 3: environments and hosts both depend only on step 1.
        let (environments_raw, hosts_raw) = tokio::join!(
            self.client.fetch(environments_url),
            self.client.fetch(hosts_url),
        );
        let environments_raw = environments_raw?;
        let hosts_raw = hosts_raw?;

        let environments: Collection<Environment> = decode(environments_url, &environments_raw)?;
        let mut names: HashMap<String, String> = HashMap::new();
        let mut service_urls = Vec::with_capacity(environments.data.len());
        for environment in &environments.data {
            let services_url = environment.links.services.clone().ok_or_else(|| {
                structure(
                    environments_url,
                    "environment entry has no services link",
                    &environments_raw,
                )
            })?;
            service_urls.push(services_url);

            if let (Some(id), Some(name)) = (&environment.id, &environment.name) {
                names.insert(id.clone(), name.clone());
            }
        }

        let hosts_collection: Collection<Host> = decode(hosts_url, &hosts_raw)?;
        let hosts = normalize_hosts(hosts_collection.data);

        // Step 4: fan out one fetch per environment, then join. Every
        // sibling is awaited before any result is inspected, so one
        // failure fails the tick while the rest run to completion and are
        // discarded.
        let mut handles = Vec::with_capacity(service_urls.len());
        for services_url in service_urls {
            let client = Arc::clone(&self.client);
            handles.push(tokio::spawn(async move {
                let raw = client.fetch(&services_url).await?;
                let services: Collection<Service> = decode(&services_url, &raw)?;
                Ok::<_, PollError>(services.data)
            }));
        }
        let mut joined = Vec::with_capacity(handles.len());
        for handle in handles {
            joined.push(handle.await);
        }

        // Step 5: flatten and resolve environment names through the map.
        let mut services = Vec::new();
        for result in joined {
            let batch = result??;
            services.extend(normalize_services(batch, &names));
        }

        debug!(
            environments = names.len(),
            services = services.len(),
            hosts = hosts.len(),
            "resource graph walked"
        );

        // Step 6: aggregate.
        let environments = reduce(&services);

        Ok(PollOutcome {
            environments,
            services,
            hosts,
        })
    }
}

/// Decode an already-fetched JSON value into a typed collection.
///
/// The wire types are lenient, so a failure here means the payload shape
/// is fundamentally off (e.g. `data` is not an array).
fn decode<T: DeserializeOwned>(url: &str, value: &serde_json::Value) -> Result<T, PollError> {
    serde_json::from_value(value.clone())
        .map_err(|err| structure(url, &format!("payload does not match expected shape: {err}"), value))
}

fn structure(url: &str, reason: &str, payload: &serde_json::Value) -> PollError {
    PollError::Structure {
        url: url.to_string(),
        reason: reason.to_string(),
        payload: payload_snippet(payload),
    }
}

fn payload_snippet(payload: &serde_json::Value) -> String {
    let rendered = payload.to_string();
    if rendered.len() <= PAYLOAD_SNIPPET_CHARS {
        rendered
    } else {
        rendered.chars().take(PAYLOAD_SNIPPET_CHARS).collect()
    }
}

/// Join raw services to environment names. Rows missing a name or state
/// are skipped; an unresolved environment id is kept as `None`.
fn normalize_services(
    raw: Vec<Service>,
    names: &HashMap<String, String>,
) -> Vec<ServiceRecord> {
    raw.into_iter()
        .filter_map(|service| {
            let (Some(name), Some(state)) = (service.name, service.state) else {
                warn!("skipping service entry without name or state");
                return None;
            };
            let environment = service
                .environment_id
                .as_ref()
                .and_then(|id| names.get(id).cloned());
            Some(ServiceRecord {
                name,
                state,
                environment,
            })
        })
        .collect()
}

/// Normalize hosts, falling back to `hostname` when `name` is absent.
fn normalize_hosts(raw: Vec<Host>) -> Vec<HostRecord> {
    raw.into_iter()
        .filter_map(|host| {
            let name = host.name.or(host.hostname);
            let (Some(name), Some(state)) = (name, host.state) else {
                warn!("skipping host entry without name or state");
                return None;
            };
            Some(HostRecord { name, state })
        })
        .collect()
}
