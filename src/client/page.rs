//! Paginated cursor over one page of list results.
//!
//! A [`PagedResponse`] binds a `{data, meta}` envelope to the client that
//! produced it, so callers can traverse `firstPage`/`lastPage`/`nextPage`/
//! `prevPage` without re-supplying resource type or query. Cursors are
//! immutable value objects: every successful traversal yields a brand-new
//! cursor, and a failed traversal leaves the original intact and reusable.

use super::JsonApiClient;
use crate::document::{Document, PageLink, PagingMeta, PrimaryData};
use crate::error::{Error, Result};
use crate::transport::HttpMethod;
use tracing::debug;

/// One page of results plus its traversal links.
#[derive(Debug, Clone)]
pub struct PagedResponse {
    client: JsonApiClient,
    document: Document,
}

impl PagedResponse {
    pub(crate) fn new(client: JsonApiClient, document: Document) -> Self {
        Self { client, document }
    }

    pub fn data(&self) -> &PrimaryData {
        &self.document.data
    }

    pub fn meta(&self) -> &PagingMeta {
        &self.document.meta
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Follows one traversal link. Absent/null links reject with
    /// [`Error::NoPageLink`] naming the direction - the transport is
    /// never called for a missing link, so callers can tell "end of
    /// pages" from a bug.
    pub async fn follow(&self, link: PageLink) -> Result<PagedResponse> {
        self.client.follow_page(&self.document.meta, link).await
    }

    pub async fn first_page(&self) -> Result<PagedResponse> {
        self.follow(PageLink::First).await
    }

    pub async fn last_page(&self) -> Result<PagedResponse> {
        self.follow(PageLink::Last).await
    }

    pub async fn next_page(&self) -> Result<PagedResponse> {
        self.follow(PageLink::Next).await
    }

    pub async fn prev_page(&self) -> Result<PagedResponse> {
        self.follow(PageLink::Prev).await
    }
}

impl JsonApiClient {
    /// Traverses a pagination link from a stored [`PagingMeta`].
    ///
    /// This is the state-driven twin of [`PagedResponse::follow`]: callers
    /// that kept only the meta (the normalized store does) can resume
    /// traversal without holding the original cursor. Link URLs are
    /// followed exactly as the server sent them - no prefixing.
    pub async fn follow_page(&self, meta: &PagingMeta, link: PageLink) -> Result<PagedResponse> {
        let Some(url) = meta.link(link) else {
            return Err(Error::NoPageLink(link));
        };
        debug!(link = link.as_str(), url, "Following page link");
        let document = self.make_direct_request(url, HttpMethod::Get, None).await?;
        Ok(PagedResponse::new(self.clone(), document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::document::{ApiRoot, RootLink};
    use crate::transport::mock::MockTransport;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn client(mock: &MockTransport) -> JsonApiClient {
        let mut links = HashMap::new();
        links.insert(
            "users".to_string(),
            RootLink {
                self_link: "/api/users".to_string(),
                kind: "users".to_string(),
            },
        );
        JsonApiClient::new(
            ApiRoot { links },
            Arc::new(mock.clone()),
            ClientConfig {
                api_prefix: Some("https://example.com".into()),
                ..Default::default()
            },
        )
    }

    fn page_payload(self_link: &str, next: Option<&str>) -> serde_json::Value {
        json!({
            "data": [{"id": "1", "type": "users", "attributes": {}}],
            "meta": {
                "self": self_link,
                "nextPage": next,
                "prevPage": null
            }
        })
    }

    #[tokio::test]
    async fn next_page_follows_the_exact_link_url() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Get, "https://example.com/api/users").respond(
            200,
            page_payload("/api/users?page[page]=1", Some("https://example.com/api/users?page[page]=2")),
        );
        mock.expect(
            HttpMethod::Get,
            "https://example.com/api/users?page[page]=2",
        )
        .respond(
            200,
            json!({
                "data": [{"id": "2", "type": "users", "attributes": {}}],
                "meta": {"self": "/api/users?page[page]=2"}
            }),
        );

        let client = client(&mock);
        let first = client.list("users", None, None).await.unwrap();
        let second = first.next_page().await.unwrap();

        let ids: Vec<_> = second
            .data()
            .iter()
            .filter_map(|r| r.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["2"]);
        mock.verify();
    }

    #[tokio::test]
    async fn missing_link_rejects_without_a_transport_call() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Get, "https://example.com/api/users")
            .respond(200, page_payload("/api/users", None));

        let client = client(&mock);
        let page = client.list("users", None, None).await.unwrap();
        let calls_after_list = mock.request_count();

        let err = page.prev_page().await.unwrap_err();
        assert!(matches!(err, Error::NoPageLink(PageLink::Prev)));
        assert_eq!(err.to_string(), "No link to follow for prevPage");

        let err = page.next_page().await.unwrap_err();
        assert!(matches!(err, Error::NoPageLink(PageLink::Next)));

        assert_eq!(mock.request_count(), calls_after_list);
    }

    #[tokio::test]
    async fn failed_traversal_leaves_the_cursor_reusable() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Get, "https://example.com/api/users").respond(
            200,
            page_payload("/api/users?page[page]=1", Some("https://example.com/api/users?page[page]=2")),
        );

        let client = client(&mock);
        let page = client.list("users", None, None).await.unwrap();

        // no firstPage link in this payload
        assert!(matches!(
            page.first_page().await,
            Err(Error::NoPageLink(PageLink::First))
        ));

        // the original cursor still works for the link it does have
        mock.expect(
            HttpMethod::Get,
            "https://example.com/api/users?page[page]=2",
        )
        .respond(
            200,
            json!({"data": [], "meta": {"self": "/api/users?page[page]=2"}}),
        );
        page.next_page().await.unwrap();
        mock.verify();
    }

    #[tokio::test]
    async fn follow_page_resumes_from_stored_meta() {
        let mock = MockTransport::new();
        mock.expect(
            HttpMethod::Get,
            "https://example.com/api/users?page[page]=3",
        )
        .respond(
            200,
            json!({"data": [], "meta": {"self": "/api/users?page[page]=3"}}),
        );

        let client = client(&mock);
        let meta = PagingMeta {
            self_link: "/api/users?page[page]=2".into(),
            next_page: Some("https://example.com/api/users?page[page]=3".into()),
            ..Default::default()
        };

        let page = client.follow_page(&meta, PageLink::Next).await.unwrap();
        assert_eq!(page.meta().self_link, "/api/users?page[page]=3");

        let err = client.follow_page(&meta, PageLink::Last).await.unwrap_err();
        assert!(matches!(err, Error::NoPageLink(PageLink::Last)));
    }
}
