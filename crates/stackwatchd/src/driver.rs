//! Poll driver — runs the pipeline on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use stackwatch_metrics::StatusGauges;
use stackwatch_poller::GraphWalker;

/// Run the poll loop: one tick immediately, then one per interval.
///
/// Each tick is spawned, so a slow upstream never delays the next tick;
/// ticks may overlap. A failed tick is logged and leaves the previously
/// published gauge values untouched.
pub async fn run(walker: GraphWalker, gauges: StatusGauges, poll_interval: Duration) {
    let walker = Arc::new(walker);
    let gauges = Arc::new(gauges);

    info!(
        interval_ms = poll_interval.as_millis() as u64,
        "poll driver started"
    );

    let mut interval = tokio::time::interval(poll_interval);
    loop {
        interval.tick().await;

        let walker = Arc::clone(&walker);
        let gauges = Arc::clone(&gauges);
        tokio::spawn(async move {
            match walker.poll().await {
                Ok(outcome) => {
                    debug!(
                        environments = outcome.environments.len(),
                        services = outcome.services.len(),
                        hosts = outcome.hosts.len(),
                        "publishing poll outcome"
                    );
                    gauges.publish(&outcome);
                }
                Err(error) => {
                    error!(%error, "poll tick failed");
                }
            }
        });
    }
}
