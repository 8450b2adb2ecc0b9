//! Per-environment state aggregation.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::record::ServiceRecord;

/// The only state that counts as healthy. Transitioning states like
/// `updating-active` are not active.
pub const ACTIVE_STATE: &str = "active";

/// Placeholder environment name for services whose environment id did not
/// resolve this tick.
pub const UNKNOWN_ENVIRONMENT: &str = "unknown";

/// Fold service records into one aggregate state per environment.
///
/// The first state seen for an environment is kept until a non-active
/// state appears; once stored, a non-active state is never overwritten by
/// a later `active` record. The fold is idempotent and the final
/// active/non-active classification does not depend on record order.
pub fn reduce(services: &[ServiceRecord]) -> BTreeMap<String, String> {
    let mut aggregate = BTreeMap::new();

    for service in services {
        let environment = service
            .environment
            .clone()
            .unwrap_or_else(|| UNKNOWN_ENVIRONMENT.to_string());

        match aggregate.entry(environment) {
            Entry::Vacant(slot) => {
                slot.insert(service.state.clone());
            }
            Entry::Occupied(mut slot) => {
                if service.state != ACTIVE_STATE {
                    slot.insert(service.state.clone());
                }
            }
        }
    }

    aggregate
}
