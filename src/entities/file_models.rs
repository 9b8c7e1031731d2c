use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A file attached to any registered resource through `parent_id` and
/// `parent_type`. The pair is polymorphic, so there is no foreign-key
/// constraint and no `DeriveRelation` variant for it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_models")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub file_name: Option<String>,
    pub parent_id: Option<i32>,
    pub parent_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
