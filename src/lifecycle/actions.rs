//! Three-phase action encoders.
//!
//! Each encoder wraps one client operation in the standard lifecycle:
//! dispatch a started event before the operation is awaited, await it,
//! then dispatch exactly one terminal event - succeeded with the envelope,
//! or failed with the rejection routed back to the id known at start.
//! The terminal event is also returned to the caller.
//!
//! No coalescing and no fencing: concurrent lifecycles for the same
//! entity each emit their own sequence, and whichever terminal event the
//! fold sees last wins.

use super::event::{EventPayload, EventSink, Operation, RequestStatus, ResourceEvent};
use crate::client::JsonApiClient;
use crate::document::{Document, PageLink, PagingMeta, Relationships, ResourceObject};
use crate::error::Error;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Lists a resource collection, emitting `READING` → `SUCCEEDED`/`FAILED`
/// at the type level (no resource id).
pub async fn list_resources<S: EventSink>(
    client: &JsonApiClient,
    sink: &mut S,
    resource_type: &str,
) -> ResourceEvent {
    sink.dispatch(ResourceEvent::started(
        Operation::List,
        RequestStatus::Reading,
        resource_type,
        None,
        None,
    ));
    debug!(resource_type, "List started");

    let result = client.list(resource_type, None, None).await;
    finish(
        sink,
        Operation::List,
        resource_type,
        None,
        result.map(|page| (page.into_document(), None)),
    )
}

/// Fetches a single resource, routing every event to its id.
pub async fn show_resource<S: EventSink>(
    client: &JsonApiClient,
    sink: &mut S,
    resource_type: &str,
    id: &str,
) -> ResourceEvent {
    sink.dispatch(ResourceEvent::started(
        Operation::Show,
        RequestStatus::Reading,
        resource_type,
        Some(id.to_string()),
        None,
    ));
    debug!(resource_type, id, "Show started");

    let result = client.show(resource_type, id).await;
    finish(
        sink,
        Operation::Show,
        resource_type,
        Some(id.to_string()),
        result.map(|document| (document, None)),
    )
}

/// Creates a resource with an optimistic placeholder.
///
/// The started event carries the caller's attributes, relationships, and
/// temporary id as a partial resource, so the fold can render the entity
/// before the server answers. When the server assigns a different id, the
/// succeeded event carries `id_map = {server_id: temporary_id}` for
/// reconciliation.
pub async fn create_resource<S: EventSink>(
    client: &JsonApiClient,
    sink: &mut S,
    resource_type: &str,
    attributes: Value,
    relationships: Option<Relationships>,
    temporary_id: Option<String>,
) -> ResourceEvent {
    let draft = ResourceObject {
        id: temporary_id.clone(),
        kind: resource_type.to_string(),
        attributes: attributes.clone(),
        relationships: relationships.clone().unwrap_or_default(),
    };
    sink.dispatch(ResourceEvent::started(
        Operation::Create,
        RequestStatus::Creating,
        resource_type,
        temporary_id.clone(),
        Some(EventPayload::Resource(draft)),
    ));
    debug!(resource_type, temporary_id = ?temporary_id, "Create started");

    let result = client
        .create(resource_type, attributes, relationships, temporary_id.clone())
        .await;

    let result = result.map(|document| {
        let server_id = document.data.as_single().and_then(|r| r.id.clone());
        let id_map = match (&server_id, &temporary_id) {
            (Some(server), Some(temporary)) if server != temporary => {
                Some(HashMap::from([(server.clone(), temporary.clone())]))
            }
            _ => None,
        };
        (document, id_map)
    });
    finish(sink, Operation::Create, resource_type, temporary_id, result)
}

/// Replays a pagination link from stored meta, emitting the same lifecycle
/// as a list. A missing link fails the lifecycle with
/// [`Error::NoPageLink`] before any transport call.
pub async fn page_resources<S: EventSink>(
    client: &JsonApiClient,
    sink: &mut S,
    resource_type: &str,
    meta: &PagingMeta,
    link: PageLink,
) -> ResourceEvent {
    sink.dispatch(ResourceEvent::started(
        Operation::Page,
        RequestStatus::Reading,
        resource_type,
        None,
        None,
    ));
    debug!(resource_type, link = link.as_str(), "Page started");

    let result = client.follow_page(meta, link).await;
    finish(
        sink,
        Operation::Page,
        resource_type,
        None,
        result.map(|page| (page.into_document(), None)),
    )
}

/// Dispatches the terminal event for a finished lifecycle and returns it.
fn finish<S: EventSink>(
    sink: &mut S,
    operation: Operation,
    resource_type: &str,
    started_id: Option<String>,
    result: Result<(Document, Option<HashMap<String, String>>), Error>,
) -> ResourceEvent {
    let event = match result {
        Ok((document, id_map)) => {
            info!(resource_type, ?operation, "Operation succeeded");
            ResourceEvent::succeeded(operation, resource_type, document, id_map)
        }
        Err(error) => {
            warn!(resource_type, ?operation, error = %error, "Operation failed");
            ResourceEvent::failed(operation, resource_type, started_id, error)
        }
    };
    sink.dispatch(event.clone());
    event
}
