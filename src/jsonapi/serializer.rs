use super::document::{RelationshipObject, ResourceIdentifier, ResourceObject};
use super::links::LinkBuilder;
use crate::models::{Record, ResourceKind, ResourceType};
use std::collections::{BTreeMap, HashSet};

pub fn identifier(kind: ResourceKind, id: i32) -> ResourceIdentifier {
    ResourceIdentifier {
        type_: kind.type_name().to_string(),
        id: id.to_string(),
    }
}

/// Renders one record as a resource object.
///
/// `linkage` holds the resolved target of each relationship by name; a
/// declared relationship missing from it renders with `data: null`.
pub fn resource_object(
    record: &Record,
    resource: &ResourceType,
    linkage: &BTreeMap<String, Option<ResourceIdentifier>>,
    links: &LinkBuilder,
) -> ResourceObject {
    let kind = record.kind();
    let id = record.id();

    let mut attributes = record.fields();
    attributes.remove("id");
    for field in resource.linkage_fields() {
        attributes.remove(field);
    }

    let relationships = resource
        .relationships
        .iter()
        .map(|relationship| {
            let object = RelationshipObject {
                data: linkage.get(&relationship.name).cloned().flatten(),
                links: links.relationship(kind, id, &relationship.name),
            };
            (relationship.name.clone(), object)
        })
        .collect();

    ResourceObject {
        type_: kind.type_name().to_string(),
        id: id.to_string(),
        attributes,
        relationships,
        links: links.resource(kind, id),
    }
}

/// Collects the `included` array, skipping duplicates and anything already
/// present as primary data.
#[derive(Debug, Default)]
pub struct IncludedSet {
    seen: HashSet<ResourceIdentifier>,
    resources: Vec<ResourceObject>,
}

impl IncludedSet {
    pub fn new<'a>(primary: impl IntoIterator<Item = &'a ResourceObject>) -> Self {
        Self {
            seen: primary.into_iter().map(ResourceObject::identifier).collect(),
            resources: Vec::new(),
        }
    }

    pub fn contains(&self, identifier: &ResourceIdentifier) -> bool {
        self.seen.contains(identifier)
    }

    pub fn push(&mut self, resource: ResourceObject) {
        if self.seen.insert(resource.identifier()) {
            self.resources.push(resource);
        }
    }

    pub fn into_vec(self) -> Vec<ResourceObject> {
        self.resources
    }
}
