//! Status gauge publishing.
//!
//! Three fixed gauge families, one per entity kind. Label children are
//! created lazily on first publish and reused across ticks; a child is
//! never removed, so an entity that disappears upstream keeps its last
//! published value until the process restarts.

use prometheus::{GaugeVec, Opts, Registry};

use stackwatch_poller::{ACTIVE_STATE, PollOutcome, UNKNOWN_ENVIRONMENT};

/// Replace every character outside `[A-Za-z0-9_:]` with `_`.
///
/// Applying it twice is the same as applying it once.
pub fn sanitize_label(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Collapse a raw lifecycle state to a gauge value.
///
/// Only the exact `active` state maps to 1; transitioning states such as
/// `updating-active` count as 0.
pub fn state_value(state: &str) -> f64 {
    if state == ACTIVE_STATE { 1.0 } else { 0.0 }
}

/// The exporter's gauge families, registered in a caller-owned registry.
pub struct StatusGauges {
    environment: GaugeVec,
    service: GaugeVec,
    host: GaugeVec,
}

impl StatusGauges {
    /// Create the three gauge families and register them in `registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let environment = GaugeVec::new(
            Opts::new(
                "stackwatch_environment_status",
                "1 if all services in the environment are active",
            ),
            &["name"],
        )?;
        registry.register(Box::new(environment.clone()))?;

        let service = GaugeVec::new(
            Opts::new(
                "stackwatch_service_status",
                "1 if the service state is active",
            ),
            &["name"],
        )?;
        registry.register(Box::new(service.clone()))?;

        let host = GaugeVec::new(
            Opts::new("stackwatch_host_status", "1 if the host state is active"),
            &["name"],
        )?;
        registry.register(Box::new(host.clone()))?;

        Ok(Self {
            environment,
            service,
            host,
        })
    }

    /// Publish a whole poll outcome, overwriting gauge values in place.
    pub fn publish(&self, outcome: &PollOutcome) {
        for (name, state) in &outcome.environments {
            self.set_environment(name, state);
        }
        for service in &outcome.services {
            self.set_service(service.environment.as_deref(), &service.name, &service.state);
        }
        for host in &outcome.hosts {
            self.set_host(&host.name, &host.state);
        }
    }

    /// Set the aggregate gauge for one environment.
    pub fn set_environment(&self, name: &str, state: &str) {
        self.environment
            .with_label_values(&[&sanitize_label(name)])
            .set(state_value(state));
    }

    /// Set the gauge for one service, labelled `environment/service`.
    pub fn set_service(&self, environment: Option<&str>, name: &str, state: &str) {
        let label = format!(
            "{}/{}",
            sanitize_label(environment.unwrap_or(UNKNOWN_ENVIRONMENT)),
            sanitize_label(name),
        );
        self.service
            .with_label_values(&[&label])
            .set(state_value(state));
    }

    /// Set the gauge for one host.
    pub fn set_host(&self, name: &str, state: &str) {
        self.host
            .with_label_values(&[&sanitize_label(name)])
            .set(state_value(state));
    }
}
