//! Lifecycle event vocabulary.
//!
//! Every asynchronous resource operation is observable as a three-event
//! sequence - started, then succeeded or failed - tagged with the resource
//! type (and id when one is known) so the reducer can route it. Events are
//! plain records: no live handles, no hidden identity, consumed exactly
//! once by the fold.

use crate::document::{Document, ResourceObject};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Request-lifecycle status, shared between events and cached state.
///
/// `Updating` and `Deleting` are part of the vocabulary for entry state
/// machines even though no encoder emits them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Initialized,
    Reading,
    Creating,
    Updating,
    Deleting,
    Succeeded,
    Failed,
}

/// The logical operation a lifecycle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    List,
    Show,
    Create,
    Page,
}

/// What a terminal (or optimistic) event carries.
#[derive(Debug, Clone)]
pub enum EventPayload {
    /// The optimistic partial resource echoed by a create's started event.
    Resource(ResourceObject),
    /// The envelope of a succeeded operation.
    Document(Document),
    /// The rejection of a failed operation. Shared, since the same error
    /// lands in the event and in the cached entry state.
    Error(Arc<Error>),
}

impl EventPayload {
    pub fn document(&self) -> Option<&Document> {
        match self {
            EventPayload::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn resource(&self) -> Option<&ResourceObject> {
        match self {
            EventPayload::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Arc<Error>> {
        match self {
            EventPayload::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// One lifecycle event, routed by `resource_type` (and `resource_id` for
/// entry-level operations).
#[derive(Debug, Clone)]
pub struct ResourceEvent {
    pub operation: Operation,
    pub status: RequestStatus,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub payload: Option<EventPayload>,
    /// Present only on a create's succeeded event when the server replaced
    /// a caller-supplied temporary id: `{server_id: temporary_id}`.
    pub id_map: Option<HashMap<String, String>>,
}

impl ResourceEvent {
    pub(crate) fn started(
        operation: Operation,
        status: RequestStatus,
        resource_type: &str,
        resource_id: Option<String>,
        payload: Option<EventPayload>,
    ) -> Self {
        Self {
            operation,
            status,
            resource_type: resource_type.to_string(),
            resource_id,
            payload,
            id_map: None,
        }
    }

    pub(crate) fn succeeded(
        operation: Operation,
        resource_type: &str,
        document: Document,
        id_map: Option<HashMap<String, String>>,
    ) -> Self {
        // a singular response names the entity this success routes to
        let resource_id = document.data.as_single().and_then(|r| r.id.clone());
        Self {
            operation,
            status: RequestStatus::Succeeded,
            resource_type: resource_type.to_string(),
            resource_id,
            payload: Some(EventPayload::Document(document)),
            id_map,
        }
    }

    pub(crate) fn failed(
        operation: Operation,
        resource_type: &str,
        resource_id: Option<String>,
        error: Error,
    ) -> Self {
        Self {
            operation,
            status: RequestStatus::Failed,
            resource_type: resource_type.to_string(),
            resource_id,
            payload: Some(EventPayload::Error(Arc::new(error))),
            id_map: None,
        }
    }
}

/// The abstract "dispatch an event" half of whatever store framework the
/// caller runs. The encoders push every lifecycle event through this seam;
/// reading state back is the caller's side of the contract.
pub trait EventSink {
    fn dispatch(&mut self, event: ResourceEvent);
}

/// Channel-backed sink for callers that fold events elsewhere. A closed
/// receiver is not the encoder's concern - sends are fire-and-forget.
impl EventSink for tokio::sync::mpsc::UnboundedSender<ResourceEvent> {
    fn dispatch(&mut self, event: ResourceEvent) {
        let _ = self.send(event);
    }
}

/// Collecting sink for tests and replay.
impl EventSink for Vec<ResourceEvent> {
    fn dispatch(&mut self, event: ResourceEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_wire_names() {
        let encoded = serde_json::to_value(RequestStatus::Reading).unwrap();
        assert_eq!(encoded, json!("READING"));
        let decoded: RequestStatus = serde_json::from_value(json!("SUCCEEDED")).unwrap();
        assert_eq!(decoded, RequestStatus::Succeeded);
    }

    #[test]
    fn succeeded_event_takes_id_from_singular_data_only() {
        let singular: Document = serde_json::from_value(json!({
            "data": {"id": "7", "type": "users", "attributes": {}},
            "meta": {"self": "/api/users/7"}
        }))
        .unwrap();
        let event = ResourceEvent::succeeded(Operation::Show, "users", singular, None);
        assert_eq!(event.resource_id.as_deref(), Some("7"));

        let plural: Document = serde_json::from_value(json!({
            "data": [{"id": "7", "type": "users", "attributes": {}}],
            "meta": {"self": "/api/users"}
        }))
        .unwrap();
        let event = ResourceEvent::succeeded(Operation::List, "users", plural, None);
        assert_eq!(event.resource_id, None);
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink: Vec<ResourceEvent> = Vec::new();
        sink.dispatch(ResourceEvent::started(
            Operation::List,
            RequestStatus::Reading,
            "users",
            None,
            None,
        ));
        sink.dispatch(ResourceEvent::failed(
            Operation::List,
            "users",
            None,
            Error::UnknownResourceType("users".into()),
        ));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].status, RequestStatus::Reading);
        assert_eq!(sink[1].status, RequestStatus::Failed);
    }
}
