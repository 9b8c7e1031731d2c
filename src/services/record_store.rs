use crate::api::error::AppError;
use crate::entities::{file_models, posts, prelude::*};
use crate::models::{Record, ResourceKind};
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

/// Persistence seam for every registered resource type.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find(&self, kind: ResourceKind, id: i32) -> Result<Option<Record>, AppError>;

    async fn list(&self, kind: ResourceKind) -> Result<Vec<Record>, AppError>;

    /// Creates a record from camelCase fields. Unknown fields are ignored.
    async fn create(&self, kind: ResourceKind, fields: Map<String, Value>)
    -> Result<Record, AppError>;
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct NewPost {
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct NewFileModel {
    #[validate(length(min = 1, max = 255, message = "fileName must be 1 to 255 characters"))]
    file_name: Option<String>,
    parent_id: Option<i32>,
    #[validate(length(min = 1, max = 64, message = "parentType must be 1 to 64 characters"))]
    parent_type: Option<String>,
}

fn decode<T: DeserializeOwned + Validate>(fields: Map<String, Value>) -> Result<T, AppError> {
    let input: T = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::BadRequest(format!("Invalid attributes: {}", e)))?;
    input
        .validate()
        .map_err(|e| AppError::Unprocessable(e.to_string()))?;
    Ok(input)
}

pub struct DbRecordStore {
    db: DatabaseConnection,
}

impl DbRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for DbRecordStore {
    async fn find(&self, kind: ResourceKind, id: i32) -> Result<Option<Record>, AppError> {
        let record = match kind {
            ResourceKind::Post => Posts::find_by_id(id).one(&self.db).await?.map(Record::from),
            ResourceKind::FileModel => FileModels::find_by_id(id)
                .one(&self.db)
                .await?
                .map(Record::from),
        };
        Ok(record)
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<Record>, AppError> {
        let records: Vec<Record> = match kind {
            ResourceKind::Post => Posts::find()
                .order_by_asc(posts::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(Record::from)
                .collect(),
            ResourceKind::FileModel => FileModels::find()
                .order_by_asc(file_models::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(Record::from)
                .collect(),
        };
        Ok(records)
    }

    async fn create(
        &self,
        kind: ResourceKind,
        fields: Map<String, Value>,
    ) -> Result<Record, AppError> {
        let record: Record = match kind {
            ResourceKind::Post => {
                let input: NewPost = decode(fields)?;
                posts::ActiveModel {
                    title: Set(input.title),
                    content: Set(input.content),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
                .into()
            }
            ResourceKind::FileModel => {
                let input: NewFileModel = decode(fields)?;
                file_models::ActiveModel {
                    file_name: Set(input.file_name),
                    parent_id: Set(input.parent_id),
                    parent_type: Set(input.parent_type),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
                .into()
            }
        };

        tracing::info!("📝 Created {} {}", record.kind(), record.id());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::infrastructure::database;
    use serde_json::json;

    async fn store() -> DbRecordStore {
        let db = database::connect(&AppConfig::development()).await.unwrap();
        database::run_migrations(&db).await.unwrap();
        DbRecordStore::new(db)
    }

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = store().await;

        let post = store
            .create(ResourceKind::Post, fields(json!({ "title": "Post One", "content": "Content" })))
            .await
            .unwrap();
        assert_eq!(post.id(), 1);

        let file = store
            .create(
                ResourceKind::FileModel,
                fields(json!({ "fileName": "blah.jpg", "parentId": 1, "parentType": "post" })),
            )
            .await
            .unwrap();

        let found = store.find(ResourceKind::FileModel, file.id()).await.unwrap();
        assert_eq!(found, Some(file));
        assert!(store.find(ResourceKind::Post, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = store().await;
        for title in ["a", "b", "c"] {
            store
                .create(ResourceKind::Post, fields(json!({ "title": title })))
                .await
                .unwrap();
        }

        let ids: Vec<i32> = store
            .list(ResourceKind::Post)
            .await
            .unwrap()
            .iter()
            .map(Record::id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(store.list(ResourceKind::FileModel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_attributes() {
        let store = store().await;

        let wrong_type = store
            .create(ResourceKind::FileModel, fields(json!({ "parentId": "one" })))
            .await;
        assert!(matches!(wrong_type, Err(AppError::BadRequest(_))));

        let empty_name = store
            .create(ResourceKind::FileModel, fields(json!({ "fileName": "" })))
            .await;
        assert!(matches!(empty_name, Err(AppError::Unprocessable(_))));
    }
}
