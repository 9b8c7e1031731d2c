pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod jsonapi;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::models::ResourceRegistry;
use crate::services::jsonapi_service::JsonApiService;
use crate::services::record_store::{DbRecordStore, RecordStore};
use axum::{
    Router,
    middleware::from_fn,
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::resources::list_resources,
        api::handlers::resources::get_resource,
        api::handlers::resources::get_related,
        api::handlers::resources::get_relationship,
        api::handlers::resources::create_resource,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            jsonapi::document::ResourceIdentifier,
            jsonapi::document::ErrorObject,
            jsonapi::document::ErrorDocument,
        )
    ),
    tags(
        (name = "resources", description = "JSON:API resource endpoints"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub registry: Arc<ResourceRegistry>,
    pub jsonapi: Arc<JsonApiService>,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the database-backed store and the JSON:API service around
    /// `registry`.
    pub fn new(db: DatabaseConnection, registry: ResourceRegistry, config: AppConfig) -> Self {
        let registry = Arc::new(registry);
        let store: Arc<dyn RecordStore> = Arc::new(DbRecordStore::new(db.clone()));
        let jsonapi = Arc::new(JsonApiService::new(registry.clone(), store, &config));

        Self {
            db,
            registry,
            jsonapi,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let resources = Router::new()
        .route(
            "/:type",
            get(api::handlers::resources::list_resources)
                .post(api::handlers::resources::create_resource),
        )
        .route("/:type/:id", get(api::handlers::resources::get_resource))
        .route(
            "/:type/:id/relationships/:relationship",
            get(api::handlers::resources::get_relationship),
        )
        .route(
            "/:type/:id/:relationship",
            get(api::handlers::resources::get_related),
        )
        .layer(from_fn(
            api::middleware::content_negotiation::content_negotiation,
        ));

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check));

    let router = if state.config.api_root.is_empty() {
        router.merge(resources)
    } else {
        router.nest(&state.config.api_root, resources)
    };

    router
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .with_state(state)
}
