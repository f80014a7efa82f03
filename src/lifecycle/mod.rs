//! Lifecycle events and the encoders that emit them.

pub mod actions;
pub mod event;
pub mod tracing;

pub use self::actions::{create_resource, list_resources, page_resources, show_resource};
pub use self::event::{EventPayload, EventSink, Operation, RequestStatus, ResourceEvent};
pub use self::tracing::setup_tracing;
