//! Reduces per-resource states into one readiness signal.

use crate::client::FetchError;
use crate::resource::{ResourceKind, ResourceSummary};
use serde::Serialize;

/// An error reported by one resource's most recent poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceError {
    pub resource: &'static str,
    pub message: String,
}

/// Aggregate state of all resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    /// Whether the full dashboard can render (otherwise show a loading indicator)
    pub ready: bool,
    pub errors: Vec<ResourceError>,
}

/// Ready once nothing is loading and every data-dependent resource has data.
///
/// Order of `states` only affects the order of `errors`.
pub fn aggregate(states: &[ResourceSummary]) -> Readiness {
    let ready = states
        .iter()
        .all(|s| !s.is_loading && (!s.kind.requires_data() || s.has_data));

    let errors = states
        .iter()
        .filter_map(|s| s.error.as_ref().map(|e| resource_error(s.kind, e)))
        .collect();

    Readiness { ready, errors }
}

fn resource_error(kind: ResourceKind, error: &FetchError) -> ResourceError {
    ResourceError {
        resource: kind.name(),
        message: error.to_string(),
    }
}
