//! Normalized cache state.
//!
//! State is held per resource type, and per resource id within a type.
//! Both levels are `Arc`-shared: folds that leave a type untouched reuse
//! its `Arc` (change detection by pointer identity upstream), and create's
//! id reconciliation aliases two ids to the very same entry.

use crate::document::{PagingMeta, ResourceObject};
use crate::error::Error;
use crate::lifecycle::RequestStatus;
use std::collections::HashMap;
use std::sync::Arc;

pub type ResourceId = String;
pub type ResourceTypeName = String;

/// Cached state of one resource entry - a small state machine:
/// `Initialized` → `Creating`/`Reading`/`Updating`/`Deleting` →
/// `Succeeded` or `Failed`.
#[derive(Debug, Clone)]
pub struct EntryState {
    pub status: RequestStatus,
    /// The cached snapshot. A partial document while an operation is in
    /// flight (an `{id, type}` stub for show, the optimistic draft for
    /// create), the full server document after success. Failures keep
    /// whatever was cached before.
    pub resource: ResourceObject,
    pub error: Option<Arc<Error>>,
}

impl EntryState {
    pub(crate) fn initialized() -> Self {
        Self {
            status: RequestStatus::Initialized,
            resource: ResourceObject::default(),
            error: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            RequestStatus::Succeeded | RequestStatus::Failed
        )
    }
}

/// Cached state of one resource type: the collection-level request
/// status, the latest paging meta, and the normalized entry map.
#[derive(Debug, Clone)]
pub struct TypeState {
    pub status: RequestStatus,
    pub error: Option<Arc<Error>>,
    /// Meta of the most recent successful list/page response. Callers
    /// hand this back to `follow_page`/`page_resources` to traverse.
    pub paging: Option<PagingMeta>,
    pub resources: HashMap<ResourceId, Arc<EntryState>>,
}

impl Default for TypeState {
    fn default() -> Self {
        Self {
            status: RequestStatus::Initialized,
            error: None,
            paging: None,
            resources: HashMap::new(),
        }
    }
}

impl TypeState {
    pub fn resource(&self, id: &str) -> Option<&Arc<EntryState>> {
        self.resources.get(id)
    }
}

/// The whole normalized store: resource type → type state.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    types: HashMap<ResourceTypeName, Arc<TypeState>>,
}

impl StoreState {
    /// An empty store. Types are created lazily as events arrive.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `Initialized` state for known types, so
    /// readers see a slot before the first request is dispatched.
    pub fn seed<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let types = types
            .into_iter()
            .map(|t| (t.into(), Arc::new(TypeState::default())))
            .collect();
        Self { types }
    }

    pub fn resource_type(&self, name: &str) -> Option<&Arc<TypeState>> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &Arc<TypeState>)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn with_type(&self, name: &str, state: TypeState) -> StoreState {
        let mut types = self.types.clone();
        types.insert(name.to_string(), Arc::new(state));
        StoreState { types }
    }
}
