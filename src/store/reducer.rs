//! The pure event fold.
//!
//! [`reduce`] takes the current store and one lifecycle event and returns
//! the next store. Re-feeding the same event reproduces the same state -
//! there are no hidden counters - but events are not deduplicated: with
//! concurrent lifecycles for one entity, the last terminal event to fold
//! wins, stale or not.
//!
//! The fold never errors on a `FAILED` event (the error is cached). It
//! errors only when a `SUCCEEDED` show/create envelope carries array data
//! - a broken server contract the caller must see immediately instead of
//! caching bad state.

use super::state::{EntryState, StoreState, TypeState};
use crate::document::ResourceObject;
use crate::error::{Error, Result};
use crate::lifecycle::{Operation, RequestStatus, ResourceEvent};
use std::sync::Arc;

/// Folds one event into the store, routing by the event's resource type.
/// Every other type's state is reused by pointer, so upstream change
/// detection can compare `Arc` identities.
pub fn reduce(state: &StoreState, event: &ResourceEvent) -> Result<StoreState> {
    let current = state
        .resource_type(&event.resource_type)
        .map(|shared| (**shared).clone())
        .unwrap_or_default();

    let next = match event.operation {
        Operation::List | Operation::Page => reduce_collection(current, event)?,
        Operation::Show => reduce_show(current, event)?,
        Operation::Create => reduce_create(current, event)?,
    };

    Ok(state.with_type(&event.resource_type, next))
}

/// List and page share collection-level semantics: stale-while-revalidate
/// on start, merge-upsert on success, keep the cache on failure.
fn reduce_collection(current: TypeState, event: &ResourceEvent) -> Result<TypeState> {
    match event.status {
        RequestStatus::Reading => Ok(TypeState {
            status: RequestStatus::Reading,
            ..current
        }),
        RequestStatus::Succeeded => {
            let Some(document) = event.payload.as_ref().and_then(|p| p.document()) else {
                return Ok(current);
            };
            let mut resources = current.resources;
            // merge, never replace: entries absent from this page stay
            // cached from prior pages; objects without an id are skipped
            for resource in document.data.iter() {
                if let Some(id) = &resource.id {
                    resources.insert(
                        id.clone(),
                        Arc::new(EntryState {
                            status: RequestStatus::Succeeded,
                            resource: resource.clone(),
                            error: None,
                        }),
                    );
                }
            }
            Ok(TypeState {
                status: RequestStatus::Succeeded,
                error: None,
                paging: Some(document.meta.clone()),
                resources,
            })
        }
        RequestStatus::Failed => Ok(TypeState {
            status: RequestStatus::Failed,
            error: event.payload.as_ref().and_then(|p| p.error()).cloned(),
            ..current
        }),
        _ => Ok(current),
    }
}

fn reduce_show(current: TypeState, event: &ResourceEvent) -> Result<TypeState> {
    let Some(id) = event.resource_id.as_deref() else {
        return Ok(current);
    };
    let entry = current
        .resources
        .get(id)
        .map(|shared| (**shared).clone())
        .unwrap_or_else(EntryState::initialized);

    let next_entry = match event.status {
        RequestStatus::Reading => {
            if entry.status != RequestStatus::Initialized && entry.resource.id.is_some() {
                // stale data stays visible while the refetch is in flight
                EntryState {
                    status: RequestStatus::Reading,
                    ..entry
                }
            } else {
                EntryState {
                    status: RequestStatus::Reading,
                    resource: ResourceObject::stub(&event.resource_type, id),
                    error: None,
                }
            }
        }
        RequestStatus::Succeeded => {
            let Some(document) = event.payload.as_ref().and_then(|p| p.document()) else {
                return Ok(current);
            };
            let Some(resource) = document.data.as_single() else {
                return Err(Error::ProtocolViolation(format!(
                    "show succeeded for {}/{id} with array data; singular resource expected",
                    event.resource_type
                )));
            };
            EntryState {
                status: RequestStatus::Succeeded,
                resource: resource.clone(),
                error: None,
            }
        }
        RequestStatus::Failed => EntryState {
            status: RequestStatus::Failed,
            resource: entry.resource,
            error: event.payload.as_ref().and_then(|p| p.error()).cloned(),
        },
        _ => entry,
    };

    let mut next = current;
    next.resources.insert(id.to_string(), Arc::new(next_entry));
    Ok(next)
}

fn reduce_create(current: TypeState, event: &ResourceEvent) -> Result<TypeState> {
    // started carries the temporary id, succeeded the server id; an event
    // with neither (create without an optimistic id) changes nothing
    let Some(id) = event.resource_id.as_deref() else {
        return Ok(current);
    };
    let prior = current
        .resources
        .get(id)
        .map(|shared| (**shared).clone())
        .unwrap_or_else(EntryState::initialized);

    let mut next = current;
    match event.status {
        RequestStatus::Creating => {
            if let Some(draft) = event.payload.as_ref().and_then(|p| p.resource()) {
                next.resources.insert(
                    id.to_string(),
                    Arc::new(EntryState {
                        status: RequestStatus::Creating,
                        resource: draft.clone(),
                        error: None,
                    }),
                );
            }
        }
        RequestStatus::Succeeded => {
            let Some(document) = event.payload.as_ref().and_then(|p| p.document()) else {
                return Ok(next);
            };
            let Some(resource) = document.data.as_single() else {
                return Err(Error::ProtocolViolation(format!(
                    "create succeeded for {} with array data; singular resource expected",
                    event.resource_type
                )));
            };
            let settled = Arc::new(EntryState {
                status: RequestStatus::Succeeded,
                resource: resource.clone(),
                error: None,
            });
            next.resources.insert(id.to_string(), Arc::clone(&settled));
            // alias the temporary id to the very same entry, so holders
            // of the old id see the resolved resource
            if let Some(temporary) = event.id_map.as_ref().and_then(|map| map.get(id)) {
                next.resources.insert(temporary.clone(), settled);
            }
        }
        RequestStatus::Failed => {
            next.resources.insert(
                id.to_string(),
                Arc::new(EntryState {
                    status: RequestStatus::Failed,
                    resource: prior.resource,
                    error: event.payload.as_ref().and_then(|p| p.error()).cloned(),
                }),
            );
        }
        _ => {}
    }
    Ok(next)
}
