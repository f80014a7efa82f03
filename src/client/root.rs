//! Root discovery bootstrap.
//!
//! One-shot: GET the api root, decode the resource-type → endpoint map,
//! and hand back a [`JsonApiClient`] bound to it. The root is fetched
//! exactly once per client lifetime and never mutated afterward.

use super::{ClientConfig, JsonApiClient};
use crate::document::ApiRoot;
use crate::error::{Error, Result};
use crate::transport::{HttpMethod, HttpRequest, Transport};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Fetches the api root at `root_url` and constructs a client bound to it.
///
/// The root request carries `Accept: application/json` (not the JSON:API
/// media type) plus the configured default headers, defaults winning on
/// collision. A non-2xx answer is a [`Error::RootFetch`]; a transport
/// rejection propagates unchanged.
pub async fn connect(
    transport: Arc<dyn Transport>,
    root_url: &str,
    config: ClientConfig,
) -> Result<JsonApiClient> {
    let mut headers = HashMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.extend(config.default_headers.clone());

    let request = HttpRequest {
        method: HttpMethod::Get,
        url: root_url.to_string(),
        headers,
        body: None,
        options: config.default_options.clone(),
    };

    info!(url = root_url, "Fetching api root");
    let response = transport.send(request).await?;

    if !response.is_success() {
        warn!(url = root_url, status = response.status, "Root fetch failed");
        return Err(Error::RootFetch {
            url: root_url.to_string(),
            status: response.status,
            status_text: response.status_text,
        });
    }

    let api_root: ApiRoot = match serde_json::from_str(&response.body) {
        Ok(root) => root,
        Err(_) => return Err(Error::Network { response }),
    };

    let prefix = determine_prefix(root_url, config.api_prefix.as_deref());
    info!(prefix = %prefix, types = api_root.links.len(), "API root discovered");

    let config = ClientConfig {
        api_prefix: Some(prefix),
        ..config
    };
    Ok(JsonApiClient::new(api_root, transport, config))
}

/// The configured prefix when given, else `scheme://host` of the root URL.
///
/// A root URL with no scheme yields an empty prefix - endpoints are then
/// used as the server sent them.
fn determine_prefix(root_url: &str, configured: Option<&str>) -> String {
    if let Some(prefix) = configured {
        return prefix.to_string();
    }
    let Some(scheme_end) = root_url.find("://") else {
        return String::new();
    };
    let host_start = scheme_end + 3;
    match root_url[host_start..].find('/') {
        Some(path_start) => root_url[..host_start + path_start].to_string(),
        None => root_url.to_string(),
    }
}
