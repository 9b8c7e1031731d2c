//! Polymorphic belongs-to resolution.
//!
//! A record points at its parent through two fields: the foreign key and a
//! discriminator naming the parent's type. Anything that does not lead to
//! an existing record of a registered type resolves to nothing; that is a
//! normal outcome, not an error.

use crate::api::error::AppError;
use crate::models::{PolymorphicBelongsTo, Record, ResourceKind, ResourceRegistry, parse_id};
use crate::services::record_store::RecordStore;
use serde_json::{Map, Value};

/// Where a polymorphic relationship points, before the target is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedTarget {
    pub kind: ResourceKind,
    pub id: i32,
}

/// Reads the discriminator and foreign key out of `fields`.
pub fn locate(
    fields: &Map<String, Value>,
    relationship: &PolymorphicBelongsTo,
    registry: &ResourceRegistry,
) -> Option<ResolvedTarget> {
    let discriminator = match fields.get(&relationship.discriminator) {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return None,
    };

    let Some(target) = registry.by_discriminator(discriminator) else {
        tracing::debug!(
            "Discriminator '{}' in '{}' names no registered type",
            discriminator,
            relationship.discriminator
        );
        return None;
    };

    if !relationship.allows(target.kind) {
        tracing::debug!(
            "Relationship '{}' does not accept targets of type {}",
            relationship.name,
            target.kind
        );
        return None;
    }

    let id = fields.get(&relationship.foreign_key).and_then(parse_id)?;

    Some(ResolvedTarget {
        kind: target.kind,
        id,
    })
}

/// Resolves `relationship` on `record` to the target record, if any.
pub async fn resolve(
    store: &dyn RecordStore,
    registry: &ResourceRegistry,
    record: &Record,
    relationship: &PolymorphicBelongsTo,
) -> Result<Option<Record>, AppError> {
    let Some(target) = locate(&record.fields(), relationship, registry) else {
        return Ok(None);
    };

    let found = store.find(target.kind, target.id).await?;
    if found.is_none() {
        tracing::debug!(
            "{} {} points at missing {} {}",
            record.kind(),
            record.id(),
            target.kind,
            target.id
        );
    }
    Ok(found)
}
