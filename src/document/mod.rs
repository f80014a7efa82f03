//! JSON:API wire vocabulary.
//!
//! Pure data definitions for the documents exchanged with the server:
//! resource objects, `{data, meta}` envelopes, error documents, and the
//! api root document fetched once at bootstrap. These types perform no
//! validation of their own - singular/plural enforcement and link-presence
//! checks belong to the client and the reducer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Reference to another resource inside a relationship: `{type, id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linkage {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// The `data` value of a relationship - to-one or to-many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkageData {
    One(Linkage),
    Many(Vec<Linkage>),
}

/// A named relationship entry: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipData {
    pub data: LinkageData,
}

/// Relationship name → linkage, e.g. `{"author": {"data": {"type": "users", "id": "1"}}}`.
pub type Relationships = HashMap<String, RelationshipData>;

/// A single addressable entity.
///
/// `id` is always present on objects returned by the server; it may be
/// absent on an object that is being created. `attributes` is an opaque,
/// caller-defined payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Value,
    #[serde(default)]
    pub relationships: Relationships,
}

impl ResourceObject {
    /// A bare `{id, type}` stub, used as the placeholder entry while a
    /// show request is in flight for a not-yet-cached resource.
    pub fn stub(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind: kind.into(),
            attributes: Value::Null,
            relationships: Relationships::new(),
        }
    }
}

/// The `data` member of an envelope - singular for show/create, plural
/// for list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(ResourceObject),
    Many(Vec<ResourceObject>),
}

impl PrimaryData {
    /// The resource object of a singular envelope, or `None` for arrays.
    pub fn as_single(&self) -> Option<&ResourceObject> {
        match self {
            PrimaryData::One(resource) => Some(resource),
            PrimaryData::Many(_) => None,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, PrimaryData::Many(_))
    }

    /// Iterate uniformly - a singular document yields one item.
    pub fn iter(&self) -> std::slice::Iter<'_, ResourceObject> {
        match self {
            PrimaryData::One(resource) => std::slice::from_ref(resource).iter(),
            PrimaryData::Many(resources) => resources.iter(),
        }
    }
}

/// Pagination direction through a list response's meta links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLink {
    First,
    Last,
    Next,
    Prev,
}

impl PageLink {
    /// The meta field name for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageLink::First => "firstPage",
            PageLink::Last => "lastPage",
            PageLink::Next => "nextPage",
            PageLink::Prev => "prevPage",
        }
    }
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination metadata attached to every envelope.
///
/// Each `*_page` field is either a traversable URL or `None` - both a
/// JSON `null` and an absent field decode to `None`, meaning "no such
/// page".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingMeta {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(rename = "firstPage", default, skip_serializing_if = "Option::is_none")]
    pub first_page: Option<String>,
    #[serde(rename = "lastPage", default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<String>,
    #[serde(rename = "nextPage", default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(rename = "prevPage", default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<String>,
}

impl PagingMeta {
    /// The URL for a traversal direction, if the server provided one.
    pub fn link(&self, link: PageLink) -> Option<&str> {
        let value = match link {
            PageLink::First => &self.first_page,
            PageLink::Last => &self.last_page,
            PageLink::Next => &self.next_page,
            PageLink::Prev => &self.prev_page,
        };
        value.as_deref()
    }
}

/// A successful top-level document: `{data, meta}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub data: PrimaryData,
    #[serde(default)]
    pub meta: PagingMeta,
}

/// One entry of a 4xx error document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// The top-level `{errors: [...]}` document returned for client errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

/// One endpoint entry of the api root document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootLink {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// The api root document: resource type → endpoint. Fetched once per
/// client lifetime and immutable afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRoot {
    pub links: HashMap<String, RootLink>,
}

impl ApiRoot {
    pub fn link(&self, resource_type: &str) -> Option<&RootLink> {
        self.links.get(resource_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_plural_envelope_with_paging() {
        let document: Document = serde_json::from_value(json!({
            "data": [
                {"id": "1", "type": "users", "attributes": {"name": "Ed"}, "relationships": {}},
                {"id": "2", "type": "users", "attributes": {"name": "Kai"}, "relationships": {}}
            ],
            "meta": {
                "self": "/api/users?page[size]=2&page[page]=1",
                "firstPage": "/api/users?page[size]=2&page[page]=1",
                "lastPage": "/api/users?page[size]=2&page[page]=10",
                "nextPage": "/api/users?page[size]=2&page[page]=2",
                "prevPage": null
            }
        }))
        .unwrap();

        assert!(document.data.is_many());
        assert_eq!(document.data.iter().count(), 2);
        assert_eq!(
            document.meta.link(PageLink::Next),
            Some("/api/users?page[size]=2&page[page]=2")
        );
        // null and absent both mean "no such page"
        assert_eq!(document.meta.link(PageLink::Prev), None);
    }

    #[test]
    fn decodes_singular_envelope() {
        let document: Document = serde_json::from_value(json!({
            "data": {"id": "1", "type": "users", "attributes": {"name": "Ed"}},
            "meta": {"self": "/api/users/1"}
        }))
        .unwrap();

        let resource = document.data.as_single().expect("singular data");
        assert_eq!(resource.id.as_deref(), Some("1"));
        assert_eq!(resource.kind, "users");
        assert_eq!(document.meta.link(PageLink::First), None);
    }

    #[test]
    fn serializes_create_body_without_id() {
        let resource = ResourceObject {
            id: None,
            kind: "users".into(),
            attributes: json!({"name": "Ed"}),
            relationships: Relationships::new(),
        };
        let value = serde_json::to_value(&resource).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["type"], "users");
        assert_eq!(value["relationships"], json!({}));
    }

    #[test]
    fn decodes_relationship_linkage() {
        let resource: ResourceObject = serde_json::from_value(json!({
            "id": "9",
            "type": "homes",
            "attributes": {},
            "relationships": {
                "owner": {"data": {"type": "users", "id": "1"}},
                "rooms": {"data": [{"type": "rooms", "id": "2"}, {"type": "rooms", "id": "3"}]}
            }
        }))
        .unwrap();

        match &resource.relationships["owner"].data {
            LinkageData::One(linkage) => assert_eq!(linkage.id, "1"),
            LinkageData::Many(_) => panic!("owner should be to-one"),
        }
        match &resource.relationships["rooms"].data {
            LinkageData::Many(linkages) => assert_eq!(linkages.len(), 2),
            LinkageData::One(_) => panic!("rooms should be to-many"),
        }
    }

    #[test]
    fn error_document_decodes() {
        let document: ErrorDocument = serde_json::from_value(json!({
            "errors": [{"status": "422", "code": "invalid", "description": "name is required"}]
        }))
        .unwrap();
        assert_eq!(document.errors.len(), 1);
        assert_eq!(document.errors[0].status, "422");
    }
}
