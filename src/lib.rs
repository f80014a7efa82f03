#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # jsonapi-store
//!
//! > **A typed JSON:API client with a normalized client-side cache.**
//!
//! This crate talks to resource-oriented HTTP APIs that follow the
//! JSON:API convention, and folds the results of every request into a
//! normalized store keyed by resource type and id, with full
//! request-lifecycle tracking (initialized → in-flight → succeeded or
//! failed) at both the collection and the entry level.
//!
//! ## Design Philosophy
//!
//! ### Host does the I/O
//! The crate never opens a socket. Callers inject a [`Transport`] - a
//! fetch-like capability taking a request and answering with a response -
//! and everything above it is deterministic, pure-data plumbing. This is
//! what makes the whole stack testable with a queue of canned responses
//! ([`transport::mock::MockTransport`]).
//!
//! ### Events in, state out
//! The store framework (redux-like or otherwise) stays outside the crate.
//! The only seams are [`EventSink`](lifecycle::EventSink) - "dispatch an
//! event" - and [`reduce`](store::reduce) - "fold an event into state".
//! Every asynchronous operation is observable as a started event followed
//! by exactly one terminal event, so the reducer sees a uniform protocol
//! no matter which operation ran.
//!
//! ### Errors are data
//! A 4xx is a decodable [`ErrorDocument`](document::ErrorDocument); a 5xx
//! is an opaque response; a missing pagination link and an unknown
//! resource type fail *before* any request leaves the client. Callers
//! pattern-match on [`Error`] instead of probing strings.
//!
//! ## Module Tour
//!
//! ### 1. The Vocabulary ([`document`])
//! Pure serde types for the wire format: resource objects, `{data, meta}`
//! envelopes, error documents, and the api root.
//!
//! ### 2. The Boundary ([`transport`])
//! Plain-data [`HttpRequest`](transport::HttpRequest)/
//! [`HttpResponse`](transport::HttpResponse) and the injected
//! [`Transport`] trait, plus the expectation-based mock for tests.
//!
//! ### 3. The Client ([`client`])
//! [`JsonApiClient`] resolves resource types against the discovered root,
//! builds requests, classifies responses, and hands back
//! [`PagedResponse`](client::PagedResponse) cursors for traversal.
//! [`connect`](client::connect) bootstraps the whole thing from a root URL.
//!
//! ### 4. The Lifecycle ([`lifecycle`])
//! Encoders that wrap each client operation in the three-event protocol,
//! and the event vocabulary the reducer consumes.
//!
//! ### 5. The Store ([`store`])
//! Per-type, per-id normalized state and the pure [`reduce`](store::reduce)
//! fold, including optimistic-id reconciliation on create.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jsonapi_store::{client, lifecycle, store};
//! use std::sync::Arc;
//!
//! // 1. Discover the api root and build a client
//! let transport = Arc::new(MyHttpTransport::new());
//! let api = client::connect(transport, "https://example.com/api", Default::default()).await?;
//!
//! // 2. Run operations through the lifecycle encoders
//! let mut state = store::StoreState::seed(["users"]);
//! let mut events: Vec<lifecycle::ResourceEvent> = Vec::new();
//! lifecycle::list_resources(&api, &mut events, "users").await;
//!
//! // 3. Fold the events into the store and read it back
//! for event in events.drain(..) {
//!     state = store::reduce(&state, &event)?;
//! }
//! let users = state.resource_type("users").unwrap();
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod client;
pub mod document;
pub mod error;
pub mod lifecycle;
pub mod store;
pub mod transport;

pub use client::{connect, ClientConfig, JsonApiClient, PagedResponse};
pub use error::{Error, Result};
pub use transport::Transport;
