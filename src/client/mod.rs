//! # Transport Client
//!
//! [`JsonApiClient`] translates `(resource type, operation, body)` into
//! HTTP requests against the endpoints discovered from the api root, and
//! classifies responses into typed envelopes or errors.
//!
//! ## Key types
//!
//! - [`JsonApiClient`]: the typed request surface (`list`/`show`/`create`
//!   plus the low-level [`make_direct_request`](JsonApiClient::make_direct_request)).
//! - [`ClientConfig`]: prefix override, default headers, default
//!   per-request options, and the pluggable query serializer.
//! - [`PagedResponse`](page::PagedResponse): the pagination cursor.
//! - [`connect`](root::connect): one-shot root discovery bootstrap.
//!
//! ## Header precedence
//!
//! Configured default headers are merged *after* the headers a method
//! computes, so a configured `Accept` (or any colliding key) wins over
//! the client's own value. Deliberate and test-pinned - callers who
//! configure a default header mean it for every request.

pub mod page;
pub mod root;

pub use page::PagedResponse;
pub use root::connect;

use crate::document::{ApiRoot, Document, ErrorDocument, Relationships, ResourceObject};
use crate::error::{Error, Result};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, RequestOptions, Transport};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Filter name → value, accepted by [`JsonApiClient::list`] and handed to
/// the query serializer.
pub type Filters = HashMap<String, String>;

/// Page selection parameters, accepted by [`JsonApiClient::list`] and
/// handed to the query serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paging {
    pub page: Option<String>,
    pub size: Option<String>,
    pub offset: Option<String>,
}

/// Hook that turns filters and paging into a query string (including the
/// leading `?` when non-empty).
pub type QuerySerializer = fn(Option<&Filters>, Option<&Paging>) -> String;

/// The default query serializer: accepts filters and paging and ignores
/// them. An explicit extension point - callers that need real query
/// serialization install their own [`QuerySerializer`].
pub fn empty_query(_filters: Option<&Filters>, _paging: Option<&Paging>) -> String {
    String::new()
}

/// Construction-time configuration for [`JsonApiClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Prefix prepended to relative endpoints from the api root. When
    /// `None`, [`connect`](root::connect) derives `scheme://host` from the
    /// root URL.
    pub api_prefix: Option<String>,
    /// Headers merged into every request, winning on key collision.
    pub default_headers: HashMap<String, String>,
    /// Options attached verbatim to every request.
    pub default_options: RequestOptions,
    /// Query-string construction hook. Defaults to [`empty_query`].
    pub query_serializer: QuerySerializer,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_prefix: None,
            default_headers: HashMap::new(),
            default_options: RequestOptions::default(),
            query_serializer: empty_query,
        }
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    data: &'a ResourceObject,
}

/// Typed client over the injected transport, bound to a discovered api
/// root for its whole lifetime.
///
/// Cloning is cheap - clones share the transport and the root - which is
/// what lets every [`PagedResponse`] carry the client that produced it.
#[derive(Clone)]
pub struct JsonApiClient {
    transport: Arc<dyn Transport>,
    api_root: Arc<ApiRoot>,
    api_prefix: String,
    default_headers: HashMap<String, String>,
    default_options: RequestOptions,
    query_serializer: QuerySerializer,
}

impl fmt::Debug for JsonApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonApiClient")
            .field("api_prefix", &self.api_prefix)
            .field("types", &self.api_root.links.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl JsonApiClient {
    /// Binds a client to an already-fetched api root. Most callers go
    /// through [`connect`](root::connect) instead.
    pub fn new(api_root: ApiRoot, transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self {
            transport,
            api_root: Arc::new(api_root),
            api_prefix: config.api_prefix.unwrap_or_default(),
            default_headers: config.default_headers,
            default_options: config.default_options,
            query_serializer: config.query_serializer,
        }
    }

    /// The resource types the api root exposes.
    pub fn api_root(&self) -> &ApiRoot {
        &self.api_root
    }

    /// GET the collection endpoint for `resource_type`, returning a
    /// traversable page.
    #[instrument(skip(self, filters, paging))]
    pub async fn list(
        &self,
        resource_type: &str,
        filters: Option<&Filters>,
        paging: Option<&Paging>,
    ) -> Result<PagedResponse> {
        let endpoint = self.endpoint(resource_type)?;
        let query = (self.query_serializer)(filters, paging);
        let url = format!("{}{}{}", self.api_prefix, endpoint, query);
        let document = self.make_direct_request(&url, HttpMethod::Get, None).await?;
        Ok(PagedResponse::new(self.clone(), document))
    }

    /// GET a single resource at `endpoint/id`.
    #[instrument(skip(self))]
    pub async fn show(&self, resource_type: &str, id: &str) -> Result<Document> {
        let endpoint = self.endpoint(resource_type)?;
        let url = format!("{}{}/{}", self.api_prefix, endpoint, id);
        self.make_direct_request(&url, HttpMethod::Get, None).await
    }

    /// POST a new resource to the collection endpoint. `id` is the
    /// caller's optimistic temporary id, echoed into the request body
    /// when present.
    #[instrument(skip(self, attributes, relationships))]
    pub async fn create(
        &self,
        resource_type: &str,
        attributes: Value,
        relationships: Option<Relationships>,
        id: Option<String>,
    ) -> Result<Document> {
        let endpoint = self.endpoint(resource_type)?;
        let url = format!("{}{}", self.api_prefix, endpoint);
        let body = ResourceObject {
            id,
            kind: resource_type.to_string(),
            attributes,
            relationships: relationships.unwrap_or_default(),
        };
        self.make_direct_request(&url, HttpMethod::Post, Some(&body))
            .await
    }

    /// The low-level primitive: issue `method` against an already-resolved
    /// URL. Pagination cursors use this to replay the absolute URLs the
    /// server handed back, so no prefix is applied here.
    pub async fn make_direct_request(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<&ResourceObject>,
    ) -> Result<Document> {
        let mut headers = HashMap::new();
        headers.insert(
            "Accept".to_string(),
            "application/vnd.api+json".to_string(),
        );

        let encoded = match body {
            Some(resource) => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                let json = serde_json::to_string(&RequestBody { data: resource })
                    .map_err(|e| Error::ProtocolViolation(format!("unserializable request body: {e}")))?;
                Some(json)
            }
            None => None,
        };

        // Configured defaults merge last and win on collision.
        headers.extend(self.default_headers.clone());

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: encoded,
            options: self.default_options.clone(),
        };

        debug!(url, method = method.as_str(), "Sending request");
        let response = self.transport.send(request).await?;
        self.parse_response(response)
    }

    fn endpoint(&self, resource_type: &str) -> Result<&str> {
        match self.api_root.link(resource_type) {
            Some(link) => Ok(&link.self_link),
            None => {
                warn!(resource_type, "Type not present in api root");
                Err(Error::UnknownResourceType(resource_type.to_string()))
            }
        }
    }

    fn parse_response(&self, response: HttpResponse) -> Result<Document> {
        if !response.is_success() {
            if (400..500).contains(&response.status) {
                warn!(status = response.status, "Client error response");
                return match serde_json::from_str::<ErrorDocument>(&response.body) {
                    Ok(document) => Err(Error::Client { response, document }),
                    // 4xx with an undecodable body is treated as malformed
                    Err(_) => Err(Error::Network { response }),
                };
            }
            warn!(status = response.status, "Network error response");
            return Err(Error::Network { response });
        }
        match serde_json::from_str(&response.body) {
            Ok(document) => Ok(document),
            Err(_) => Err(Error::Network { response }),
        }
    }
}
