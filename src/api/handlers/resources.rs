use crate::AppState;
use crate::api::error::AppError;
use crate::api::response::JsonApi;
use crate::jsonapi::document::{CreateDocument, Document, ErrorDocument, RelationshipDocument};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncludeQuery {
    /// Comma separated relationship names to embed in `included`
    pub include: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/{type}",
    params(
        ("type" = String, Path, description = "Plural resource type, e.g. fileModels"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Collection document"),
        (status = 400, description = "Unsupported include", body = ErrorDocument),
        (status = 404, description = "Unknown resource type", body = ErrorDocument)
    ),
    tag = "resources"
)]
pub async fn list_resources(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    Query(query): Query<IncludeQuery>,
) -> Result<JsonApi<Document>, AppError> {
    let document = state
        .jsonapi
        .find_all(&type_name, query.include.as_deref())
        .await?;
    Ok(JsonApi(document))
}

#[utoipa::path(
    get,
    path = "/api/{type}/{id}",
    params(
        ("type" = String, Path, description = "Plural resource type, e.g. fileModels"),
        ("id" = String, Path, description = "Resource id"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Resource document"),
        (status = 400, description = "Unsupported include", body = ErrorDocument),
        (status = 404, description = "Unknown type or id", body = ErrorDocument)
    ),
    tag = "resources"
)]
pub async fn get_resource(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
    Query(query): Query<IncludeQuery>,
) -> Result<JsonApi<Document>, AppError> {
    let document = state
        .jsonapi
        .find_one(&type_name, &id, query.include.as_deref())
        .await?;
    Ok(JsonApi(document))
}

#[utoipa::path(
    get,
    path = "/api/{type}/{id}/{relationship}",
    params(
        ("type" = String, Path, description = "Plural resource type, e.g. fileModels"),
        ("id" = String, Path, description = "Resource id"),
        ("relationship" = String, Path, description = "Relationship name, e.g. parent")
    ),
    responses(
        (status = 200, description = "Related resource document, data is null when unset"),
        (status = 404, description = "Unknown type, id or relationship", body = ErrorDocument)
    ),
    tag = "resources"
)]
pub async fn get_related(
    State(state): State<AppState>,
    Path((type_name, id, relationship)): Path<(String, String, String)>,
) -> Result<JsonApi<Document>, AppError> {
    let document = state
        .jsonapi
        .find_related(&type_name, &id, &relationship)
        .await?;
    Ok(JsonApi(document))
}

#[utoipa::path(
    get,
    path = "/api/{type}/{id}/relationships/{relationship}",
    params(
        ("type" = String, Path, description = "Plural resource type, e.g. fileModels"),
        ("id" = String, Path, description = "Resource id"),
        ("relationship" = String, Path, description = "Relationship name, e.g. parent")
    ),
    responses(
        (status = 200, description = "Relationship linkage document"),
        (status = 404, description = "Unknown type, id or relationship", body = ErrorDocument)
    ),
    tag = "resources"
)]
pub async fn get_relationship(
    State(state): State<AppState>,
    Path((type_name, id, relationship)): Path<(String, String, String)>,
) -> Result<JsonApi<RelationshipDocument>, AppError> {
    let document = state
        .jsonapi
        .find_relationship(&type_name, &id, &relationship)
        .await?;
    Ok(JsonApi(document))
}

#[utoipa::path(
    post,
    path = "/api/{type}",
    params(
        ("type" = String, Path, description = "Plural resource type, e.g. fileModels")
    ),
    request_body(content = Object, description = "JSON:API document with a single resource object", content_type = "application/vnd.api+json"),
    responses(
        (status = 201, description = "Resource created"),
        (status = 400, description = "Malformed document", body = ErrorDocument),
        (status = 404, description = "Unknown resource type", body = ErrorDocument),
        (status = 409, description = "Document type does not match the endpoint", body = ErrorDocument),
        (status = 422, description = "Invalid attributes or relationship", body = ErrorDocument)
    ),
    tag = "resources"
)]
pub async fn create_resource(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    payload: Result<Json<CreateDocument>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(document) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let (document, location) = state.jsonapi.create(&type_name, document).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        JsonApi(document),
    ))
}
