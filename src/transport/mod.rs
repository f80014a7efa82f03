//! The injected HTTP transport capability.
//!
//! The core never performs raw socket I/O. It builds [`HttpRequest`]
//! values as plain data and hands them to whatever [`Transport`] the
//! caller injected - a real HTTP client in production, a
//! [`mock::MockTransport`] in tests. All fields are owned types so
//! requests and responses can cross task boundaries freely.

use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::HashMap;

pub mod mock;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// Per-request options forwarded verbatim to the transport.
///
/// The core attaches the client's configured defaults to every request but
/// never acts on them itself - whether a timeout is honored is the
/// transport's business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub timeout_ms: Option<u64>,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub options: RequestOptions,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The fetch-like capability the caller injects.
///
/// A transport-level rejection (the `Err` arm) propagates through the
/// client unchanged - it is never reclassified into a client or network
/// error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let mut response = HttpResponse {
            status: 200,
            status_text: "OK".into(),
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 299;
        assert!(response.is_success());
        response.status = 304;
        assert!(!response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }
}
