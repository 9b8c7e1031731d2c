use crate::api::error::AppError;
use crate::config::{AppConfig, RelationshipPolicy};
use crate::jsonapi::deserializer;
use crate::jsonapi::document::{
    CreateDocument, Document, PrimaryData, RelationshipDocument, ResourceIdentifier,
    ResourceObject, SelfLink,
};
use crate::jsonapi::include::parse_include;
use crate::jsonapi::links::LinkBuilder;
use crate::jsonapi::serializer::{IncludedSet, identifier, resource_object};
use crate::models::{PolymorphicBelongsTo, Record, ResourceRegistry, ResourceType};
use crate::services::record_store::RecordStore;
use crate::services::resolver;
use std::collections::BTreeMap;
use std::sync::Arc;

fn declared<'a>(
    resource: &'a ResourceType,
    relationship: &str,
) -> Result<&'a PolymorphicBelongsTo, AppError> {
    resource.relationship(relationship).ok_or_else(|| {
        AppError::NotFound(format!(
            "'{}' is not a relationship of {}",
            relationship, resource.kind
        ))
    })
}

/// A serialized record plus the records its relationships resolved to.
struct Rendered {
    object: ResourceObject,
    related: Vec<(String, Record)>,
}

pub struct JsonApiService {
    registry: Arc<ResourceRegistry>,
    store: Arc<dyn RecordStore>,
    links: LinkBuilder,
    policy: RelationshipPolicy,
}

impl JsonApiService {
    pub fn new(
        registry: Arc<ResourceRegistry>,
        store: Arc<dyn RecordStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            registry,
            store,
            links: LinkBuilder::new(config.link_base()),
            policy: config.relationship_policy,
        }
    }

    fn resource_type(&self, type_name: &str) -> Result<&ResourceType, AppError> {
        self.registry
            .by_type_name(type_name)
            .ok_or_else(|| AppError::NotFound(format!("Unknown resource type '{}'", type_name)))
    }

    async fn find_record(&self, resource: &ResourceType, id: &str) -> Result<Record, AppError> {
        let not_found = || AppError::NotFound(format!("No {} with id '{}'", resource.kind, id));
        let id: i32 = id.parse().map_err(|_| not_found())?;
        self.store
            .find(resource.kind, id)
            .await?
            .ok_or_else(not_found)
    }

    /// Serializes `record`, resolving each of its declared relationships.
    async fn render(&self, record: &Record) -> Result<Rendered, AppError> {
        let resource = self.registry.get(record.kind()).ok_or_else(|| {
            AppError::Internal(format!("{} is not registered", record.kind()))
        })?;

        let mut linkage: BTreeMap<String, Option<ResourceIdentifier>> = BTreeMap::new();
        let mut related = Vec::new();

        for relationship in &resource.relationships {
            let target =
                resolver::resolve(self.store.as_ref(), &self.registry, record, relationship)
                    .await?;
            linkage.insert(
                relationship.name.clone(),
                target.as_ref().map(|t| identifier(t.kind(), t.id())),
            );
            if let Some(target) = target {
                related.push((relationship.name.clone(), target));
            }
        }

        Ok(Rendered {
            object: resource_object(record, resource, &linkage, &self.links),
            related,
        })
    }

    /// Builds the `included` array for `include` names across `rendered`.
    async fn included(
        &self,
        rendered: &[Rendered],
        include: &[String],
    ) -> Result<Option<Vec<ResourceObject>>, AppError> {
        if include.is_empty() {
            return Ok(None);
        }

        let mut included = IncludedSet::new(rendered.iter().map(|r| &r.object));
        for entry in rendered {
            for (name, target) in &entry.related {
                if !include.contains(name) {
                    continue;
                }
                if included.contains(&identifier(target.kind(), target.id())) {
                    continue;
                }
                included.push(self.render(target).await?.object);
            }
        }

        Ok(Some(included.into_vec()))
    }

    pub async fn find_all(
        &self,
        type_name: &str,
        include: Option<&str>,
    ) -> Result<Document, AppError> {
        let resource = self.resource_type(type_name)?;
        let include = parse_include(include, resource)?;

        let mut rendered = Vec::new();
        for record in self.store.list(resource.kind).await? {
            rendered.push(self.render(&record).await?);
        }

        let included = self.included(&rendered, &include).await?;
        Ok(Document {
            data: PrimaryData::Many(rendered.into_iter().map(|r| r.object).collect()),
            included,
            links: self.links.collection(resource.kind),
        })
    }

    pub async fn find_one(
        &self,
        type_name: &str,
        id: &str,
        include: Option<&str>,
    ) -> Result<Document, AppError> {
        let resource = self.resource_type(type_name)?;
        let include = parse_include(include, resource)?;
        let record = self.find_record(resource, id).await?;

        let rendered = self.render(&record).await?;
        let included = self
            .included(std::slice::from_ref(&rendered), &include)
            .await?;

        Ok(Document {
            links: rendered.object.links.clone(),
            data: PrimaryData::One(Box::new(rendered.object)),
            included,
        })
    }

    /// Document of the record a relationship points at, `data: null` when
    /// it resolves to nothing.
    pub async fn find_related(
        &self,
        type_name: &str,
        id: &str,
        relationship: &str,
    ) -> Result<Document, AppError> {
        let resource = self.resource_type(type_name)?;
        let declaration = declared(resource, relationship)?;
        let record = self.find_record(resource, id).await?;

        let links = self
            .links
            .relationship(record.kind(), record.id(), &declaration.name);
        let target =
            resolver::resolve(self.store.as_ref(), &self.registry, &record, declaration).await?;

        let data = match target {
            Some(target) => PrimaryData::One(Box::new(self.render(&target).await?.object)),
            None => PrimaryData::Null,
        };

        Ok(Document {
            data,
            included: None,
            links: SelfLink {
                self_: links.related,
            },
        })
    }

    pub async fn find_relationship(
        &self,
        type_name: &str,
        id: &str,
        relationship: &str,
    ) -> Result<RelationshipDocument, AppError> {
        let resource = self.resource_type(type_name)?;
        let declaration = declared(resource, relationship)?;
        let record = self.find_record(resource, id).await?;

        let target =
            resolver::resolve(self.store.as_ref(), &self.registry, &record, declaration).await?;

        Ok(RelationshipDocument {
            data: target.map(|t| identifier(t.kind(), t.id())),
            links: self
                .links
                .relationship(record.kind(), record.id(), &declaration.name),
        })
    }

    /// Creates a record and returns its document with the new resource's URL.
    pub async fn create(
        &self,
        type_name: &str,
        document: CreateDocument,
    ) -> Result<(Document, String), AppError> {
        let resource = self.resource_type(type_name)?;
        let fields =
            deserializer::into_fields(document.data, resource, &self.registry, self.policy)?;

        let record = self.store.create(resource.kind, fields).await?;
        let rendered = self.render(&record).await?;
        let location = rendered.object.links.self_.clone();

        Ok((
            Document {
                links: rendered.object.links.clone(),
                data: PrimaryData::One(Box::new(rendered.object)),
                included: None,
            },
            location,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{file_models, posts};
    use crate::infrastructure::database;
    use crate::services::record_store::DbRecordStore;
    use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
    use serde_json::{Value, json};

    async fn service() -> (JsonApiService, DatabaseConnection) {
        let config = AppConfig::development();
        let db = database::connect(&config).await.unwrap();
        database::run_migrations(&db).await.unwrap();
        let service = JsonApiService::new(
            Arc::new(ResourceRegistry::with_default_types()),
            Arc::new(DbRecordStore::new(db.clone())),
            &config,
        );
        (service, db)
    }

    async fn post(db: &DatabaseConnection, title: &str) -> posts::Model {
        posts::ActiveModel {
            title: Set(Some(title.to_string())),
            content: Set(Some("Content".to_string())),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn file(
        db: &DatabaseConnection,
        parent_id: Option<i32>,
        parent_type: Option<&str>,
    ) -> file_models::Model {
        file_models::ActiveModel {
            file_name: Set(Some("blah.jpg".to_string())),
            parent_id: Set(parent_id),
            parent_type: Set(parent_type.map(str::to_string)),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    fn to_json(document: &Document) -> Value {
        serde_json::to_value(document).unwrap()
    }

    #[tokio::test]
    async fn test_included_dedup_across_collection() {
        let (service, db) = service().await;
        let parent = post(&db, "Post One").await;
        file(&db, Some(parent.id), Some("post")).await;
        file(&db, Some(parent.id), Some("posts")).await;
        file(&db, None, None).await;

        let doc = to_json(&service.find_all("fileModels", Some("parent")).await.unwrap());
        assert_eq!(doc["data"].as_array().unwrap().len(), 3);
        assert_eq!(doc["included"].as_array().unwrap().len(), 1);
        assert_eq!(doc["included"][0]["type"], json!("posts"));
        assert_eq!(doc["included"][0]["attributes"]["title"], json!("Post One"));
        assert_eq!(doc["data"][2]["relationships"]["parent"]["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_include_with_nothing_resolved_is_empty() {
        let (service, db) = service().await;
        file(&db, None, None).await;

        let doc = to_json(&service.find_one("fileModels", "1", Some("parent")).await.unwrap());
        assert_eq!(doc["included"], json!([]));

        let doc = to_json(&service.find_one("fileModels", "1", None).await.unwrap());
        assert!(doc.get("included").is_none());
    }

    #[tokio::test]
    async fn test_dangling_foreign_key_is_null() {
        let (service, db) = service().await;
        file(&db, Some(42), Some("post")).await;

        let doc = to_json(&service.find_one("fileModels", "1", None).await.unwrap());
        assert_eq!(doc["data"]["relationships"]["parent"]["data"], Value::Null);

        let related = to_json(&service.find_related("fileModels", "1", "parent").await.unwrap());
        assert_eq!(related["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_relationship_document_matches_embedded() {
        let (service, db) = service().await;
        let parent = post(&db, "Post One").await;
        file(&db, Some(parent.id), Some("post")).await;

        let doc = to_json(&service.find_one("fileModels", "1", None).await.unwrap());
        let linkage = service
            .find_relationship("fileModels", "1", "parent")
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&linkage.data).unwrap(),
            doc["data"]["relationships"]["parent"]["data"]
        );
    }

    #[tokio::test]
    async fn test_lookup_errors() {
        let (service, db) = service().await;
        file(&db, None, None).await;

        assert!(matches!(
            service.find_one("comments", "1", None).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.find_one("fileModels", "abc", None).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.find_one("fileModels", "2", None).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.find_related("fileModels", "1", "owner").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.find_one("fileModels", "1", Some("owner")).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_repeated_reads_are_identical() {
        let (service, db) = service().await;
        let parent = post(&db, "Post One").await;
        file(&db, Some(parent.id), Some("post")).await;

        let first = service.find_one("fileModels", "1", Some("parent")).await.unwrap();
        let second = service.find_one("fileModels", "1", Some("parent")).await.unwrap();
        assert_eq!(first, second);
    }
}
