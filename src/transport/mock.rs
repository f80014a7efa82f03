//! # Mock Transport
//!
//! Utilities for testing the client in isolation.
//!
//! [`MockTransport`] answers requests from a FIFO queue of expectations
//! and records every request it sees, so tests can assert both what went
//! out (exact URL, method, headers) and how many calls were made -
//! including zero, for the fail-before-network properties.
//!
//! # Example
//! ```ignore
//! let mock = MockTransport::new();
//! mock.expect(HttpMethod::Get, "https://example.com/api/users")
//!     .respond(200, json!({"data": [], "meta": {"self": "/api/users"}}));
//!
//! let client = JsonApiClient::new(root, Arc::new(mock.clone()), config);
//! // ... exercise the client ...
//! mock.verify(); // ensures all expectations were consumed
//! ```

use super::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// How a queued expectation answers its request.
#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    Failure(String),
}

/// One expected request and its canned reply.
#[derive(Debug, Clone)]
struct Expectation {
    method: HttpMethod,
    url: String,
    reply: Reply,
}

/// A transport double with expectation tracking.
///
/// Clones share the same queue and request log, so a test can keep one
/// handle for assertions while the client owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Creates a mock with no expectations. Any request against it panics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an expectation for `method` `url`.
    pub fn expect(&self, method: HttpMethod, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Every request the mock has received, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Panics if any expectation was never consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!(
                "Unexpected request: {} {} (no expectation queued)",
                request.method.as_str(),
                request.url
            );
        };

        if expectation.method != request.method || expectation.url != request.url {
            panic!(
                "Expectation mismatch: expected {} {}, got {} {}",
                expectation.method.as_str(),
                expectation.url,
                request.method.as_str(),
                request.url
            );
        }

        match expectation.reply {
            Reply::Response(response) => Ok(response),
            Reply::Failure(message) => Err(message.into()),
        }
    }
}

/// Builder for one queued expectation.
pub struct ExpectationBuilder {
    method: HttpMethod,
    url: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Answers with `status` and `body` serialized as JSON. The status
    /// text is filled in for common codes.
    pub fn respond(self, status: u16, body: Value) {
        let reply = Reply::Response(HttpResponse {
            status,
            status_text: status_text(status).to_string(),
            body: body.to_string(),
        });
        self.push(reply);
    }

    /// Answers with a raw, possibly non-JSON body.
    pub fn respond_raw(self, status: u16, status_text: impl Into<String>, body: impl Into<String>) {
        let reply = Reply::Response(HttpResponse {
            status,
            status_text: status_text.into(),
            body: body.into(),
        });
        self.push(reply);
    }

    /// Rejects at the transport level, as a connection failure would.
    pub fn fail(self, message: impl Into<String>) {
        self.push(Reply::Failure(message.into()));
    }

    fn push(self, reply: Reply) {
        self.expectations.lock().unwrap().push_back(Expectation {
            method: self.method,
            url: self.url,
            reply,
        });
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            options: Default::default(),
        }
    }

    #[tokio::test]
    async fn replies_in_order_and_records_requests() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Get, "https://a.test/1")
            .respond(200, json!({"ok": 1}));
        mock.expect(HttpMethod::Get, "https://a.test/2")
            .respond(404, json!({"ok": 2}));

        let first = mock.send(get("https://a.test/1")).await.unwrap();
        assert_eq!(first.status, 200);
        let second = mock.send(get("https://a.test/2")).await.unwrap();
        assert_eq!(second.status, 404);
        assert_eq!(second.status_text, "Not Found");

        assert_eq!(mock.request_count(), 2);
        assert_eq!(mock.requests()[0].url, "https://a.test/1");
        mock.verify();
    }

    #[tokio::test]
    async fn transport_failure_is_an_err() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Get, "https://a.test/1")
            .fail("connection refused");

        let result = mock.send(get("https://a.test/1")).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "connection refused");
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn verify_flags_unconsumed_expectations() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Get, "https://a.test/1")
            .respond(200, json!({}));
        mock.verify();
    }
}
