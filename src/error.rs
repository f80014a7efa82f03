//! Error types for the JSON:API client and store.
//!
//! Failures are a tagged enum rather than a single opaque exception so
//! callers pattern-match on the kind: a 4xx carries a decoded JSON:API
//! error document, a 5xx or malformed body carries only the raw response,
//! and transport-level failures pass through unchanged.

use crate::document::{ErrorDocument, PageLink};
use crate::transport::HttpResponse;
use thiserror::Error;

/// Error type produced by the injected transport itself. Carried through
/// [`Error::Transport`] without reclassification.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for client and store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the client, cursor, and reducer.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested resource type is absent from the discovered api root.
    /// Raised before any transport call is made.
    #[error("Type, {0}, is not defined in api root response.")]
    UnknownResourceType(String),

    /// The requested pagination direction has no link in the current page's
    /// meta. Raised before any transport call is made.
    #[error("No link to follow for {0}")]
    NoPageLink(PageLink),

    /// The server answered with a 4xx status and a decodable JSON:API error
    /// document.
    #[error("API responded with '{}: {}'.", .response.status, .response.status_text)]
    Client {
        response: HttpResponse,
        document: ErrorDocument,
    },

    /// The server answered with a non-2xx, non-4xx status, or with a body
    /// that could not be decoded. No structured error document is assumed.
    #[error("API responded with '{}: {}'.", .response.status, .response.status_text)]
    Network { response: HttpResponse },

    /// Root discovery failed before a client could be constructed.
    #[error("Failed to GET {url}. Request returned with status of {status}: {status_text}.")]
    RootFetch {
        url: String,
        status: u16,
        status_text: String,
    },

    /// A singular-expected envelope contained array data, or vice versa.
    /// A broken server contract, not a recoverable condition.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// The injected transport rejected the request. Propagated unchanged.
    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// True for errors raised before any request left the client.
    pub fn is_pre_request(&self) -> bool {
        matches!(self, Error::UnknownResourceType(_) | Error::NoPageLink(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UnknownResourceType("homes".into());
        assert_eq!(
            err.to_string(),
            "Type, homes, is not defined in api root response."
        );

        let err = Error::NoPageLink(PageLink::Prev);
        assert_eq!(err.to_string(), "No link to follow for prevPage");

        let err = Error::RootFetch {
            url: "https://example.com/api".into(),
            status: 503,
            status_text: "Service Unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to GET https://example.com/api. Request returned with status of 503: Service Unavailable."
        );
    }

    #[test]
    fn client_and_network_share_response_display() {
        let response = HttpResponse {
            status: 404,
            status_text: "Not Found".into(),
            body: String::new(),
        };
        let err = Error::Network { response };
        assert_eq!(err.to_string(), "API responded with '404: Not Found'.");
    }
}
