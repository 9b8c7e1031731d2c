pub mod registry;

use crate::entities::{file_models, posts};
use serde_json::{Map, Value};

pub use registry::{PolymorphicBelongsTo, ResourceRegistry, ResourceType};

/// Every resource type this service knows how to persist.
///
/// A polymorphic discriminator resolves to one of these variants, so the
/// set of possible targets is closed and matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Post,
    FileModel,
}

impl ResourceKind {
    /// Singular name the model is declared under, stored in discriminators.
    pub fn model_name(self) -> &'static str {
        match self {
            ResourceKind::Post => "post",
            ResourceKind::FileModel => "fileModel",
        }
    }

    /// Plural name used as the JSON:API `type` and in URLs.
    pub fn type_name(self) -> &'static str {
        match self {
            ResourceKind::Post => "posts",
            ResourceKind::FileModel => "fileModels",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A stored row of any registered type.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Post(posts::Model),
    FileModel(file_models::Model),
}

impl Record {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Record::Post(_) => ResourceKind::Post,
            Record::FileModel(_) => ResourceKind::FileModel,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Record::Post(post) => post.id,
            Record::FileModel(file) => file.id,
        }
    }

    /// Field name to value, keyed by the camelCase names clients see.
    pub fn fields(&self) -> Map<String, Value> {
        let value = match self {
            Record::Post(post) => serde_json::to_value(post),
            Record::FileModel(file) => serde_json::to_value(file),
        };
        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl From<posts::Model> for Record {
    fn from(model: posts::Model) -> Self {
        Record::Post(model)
    }
}

impl From<file_models::Model> for Record {
    fn from(model: file_models::Model) -> Self {
        Record::FileModel(model)
    }
}

/// Reads an identifier out of a JSON value. JSON:API ids are strings, but
/// numbers are accepted too.
pub fn parse_id(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
