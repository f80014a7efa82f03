//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for applications
//! embedding the client. The client and the encoders log with structured
//! fields (`resource_type`, `url`, `status`) rather than formatted
//! strings, so log lines stay filterable.
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Show request construction and dispatched events
//! RUST_LOG=debug cargo run
//!
//! # Filter to the client only
//! RUST_LOG=jsonapi_store::client=debug cargo run
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - fields carry the context
        .compact()
        .init();
}
