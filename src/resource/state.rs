//! Per-resource state as seen by the view.

use super::ResourceKind;
use crate::client::FetchError;
use chrono::{DateTime, Utc};

/// Latest known state of one resource.
///
/// `data` is always renderable: it starts at the default, is replaced on
/// every successful poll and survives failed ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: T,
    /// True until the first response (success or final failure)
    pub is_loading: bool,
    /// When a successful response was last applied
    pub last_updated_at: Option<DateTime<Utc>>,
    /// Error from the most recent poll, cleared by the next success
    pub error: Option<FetchError>,
}

impl<T: Clone> ResourceState<T> {
    pub fn initial(default_value: T) -> Self {
        Self {
            data: default_value,
            is_loading: true,
            last_updated_at: None,
            error: None,
        }
    }

    /// Apply a successful poll. `None` payloads collapse to `default_value`.
    pub fn apply_success(&mut self, payload: Option<T>, default_value: &T) {
        self.data = payload.unwrap_or_else(|| default_value.clone());
        self.is_loading = false;
        self.last_updated_at = Some(Utc::now());
        self.error = None;
    }

    /// Apply a failed poll, keeping the last known data.
    pub fn apply_failure(&mut self, error: FetchError) {
        self.is_loading = false;
        self.error = Some(error);
    }

    /// True once server data (or its explicit absence) has been applied.
    pub fn has_data(&self) -> bool {
        self.last_updated_at.is_some()
    }

    pub fn summary(&self, kind: ResourceKind) -> ResourceSummary {
        ResourceSummary {
            kind,
            is_loading: self.is_loading,
            has_data: self.has_data(),
            error: self.error.clone(),
        }
    }
}

/// Type-erased view of a [`ResourceState`] for readiness aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSummary {
    pub kind: ResourceKind,
    pub is_loading: bool,
    pub has_data: bool,
    pub error: Option<FetchError>,
}
