use super::document::{RelationshipLinks, SelfLink};
use crate::models::ResourceKind;

/// Builds absolute links below a fixed base such as `http://host/api`.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn collection(&self, kind: ResourceKind) -> SelfLink {
        SelfLink {
            self_: format!("{}/{}", self.base, kind.type_name()),
        }
    }

    pub fn resource(&self, kind: ResourceKind, id: i32) -> SelfLink {
        SelfLink {
            self_: format!("{}/{}/{}", self.base, kind.type_name(), id),
        }
    }

    pub fn relationship(&self, kind: ResourceKind, id: i32, name: &str) -> RelationshipLinks {
        let resource = format!("{}/{}/{}", self.base, kind.type_name(), id);
        RelationshipLinks {
            self_: format!("{}/relationships/{}", resource, name),
            related: format!("{}/{}", resource, name),
        }
    }
}
