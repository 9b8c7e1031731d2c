use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipLinks {
    #[serde(rename = "self")]
    pub self_: String,
    pub related: String,
}

/// `data` is always present; `None` renders as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipObject {
    pub data: Option<ResourceIdentifier>,
    pub links: RelationshipLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfLink {
    #[serde(rename = "self")]
    pub self_: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, RelationshipObject>,
    pub links: SelfLink,
}

impl ResourceObject {
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            type_: self.type_.clone(),
            id: self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(Box<ResourceObject>),
    Many(Vec<ResourceObject>),
    Null,
}

/// Top-level document for resource and related-resource responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    pub links: SelfLink,
}

/// Response of `/<type>/<id>/relationships/<name>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipDocument {
    pub data: Option<ResourceIdentifier>,
    pub links: RelationshipLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorObject {
    pub status: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

/// Request body of `POST /<type>`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub data: NewResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewResource {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: BTreeMap<String, RelationshipPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipPayload {
    #[serde(default)]
    pub data: Option<IdentifierPayload>,
}

/// Like [`ResourceIdentifier`] but tolerant of numeric ids.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifierPayload {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: Value,
}
