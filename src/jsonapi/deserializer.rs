use super::document::{IdentifierPayload, NewResource};
use crate::api::error::AppError;
use crate::config::RelationshipPolicy;
use crate::models::{PolymorphicBelongsTo, ResourceKind, ResourceRegistry, ResourceType, parse_id};
use serde_json::{Map, Value};

/// Turns an inbound resource object into the field map to persist.
///
/// Relationship linkage is written into the declared foreign-key and
/// discriminator fields. Linkage naming an unknown type is dropped under
/// [`RelationshipPolicy::Lenient`] and rejected under
/// [`RelationshipPolicy::Strict`].
pub fn into_fields(
    resource: NewResource,
    target: &ResourceType,
    registry: &ResourceRegistry,
    policy: RelationshipPolicy,
) -> Result<Map<String, Value>, AppError> {
    if resource.type_ != target.kind.type_name() {
        return Err(AppError::Conflict(format!(
            "Resource type '{}' does not match endpoint type '{}'",
            resource.type_, target.kind
        )));
    }

    if resource.id.is_some() {
        tracing::debug!("Ignoring client-generated id for {}", target.kind);
    }

    let mut fields = resource.attributes;
    fields.remove("id");

    for (name, payload) in resource.relationships {
        let Some(relationship) = target.relationship(&name) else {
            tracing::debug!("Ignoring undeclared relationship '{}' on {}", name, target.kind);
            continue;
        };

        let Some(identifier) = payload.data else {
            fields.insert(relationship.foreign_key.clone(), Value::Null);
            fields.insert(relationship.discriminator.clone(), Value::Null);
            continue;
        };

        match write_target(&identifier, relationship, registry) {
            Some((kind, id)) => {
                fields.insert(relationship.foreign_key.clone(), Value::from(id));
                fields.insert(
                    relationship.discriminator.clone(),
                    Value::from(kind.model_name()),
                );
            }
            None if policy == RelationshipPolicy::Strict => {
                return Err(AppError::Unprocessable(format!(
                    "Relationship '{}' cannot point to type '{}' with id {}",
                    name, identifier.type_, identifier.id
                )));
            }
            None => {
                tracing::info!(
                    "Ignoring relationship '{}' on {} with unresolvable type '{}'",
                    name,
                    target.kind,
                    identifier.type_
                );
            }
        }
    }

    Ok(fields)
}

fn write_target(
    identifier: &IdentifierPayload,
    relationship: &PolymorphicBelongsTo,
    registry: &ResourceRegistry,
) -> Option<(ResourceKind, i32)> {
    let kind = registry.by_type_name(&identifier.type_)?.kind;
    if !relationship.allows(kind) {
        return None;
    }
    let id = parse_id(&identifier.id)?;
    Some((kind, id))
}
