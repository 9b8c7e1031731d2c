use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub resource_types: Vec<String>,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System health status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_status = if state.db.ping().await.is_ok() {
        "connected"
    } else {
        "disconnected"
    };

    let resource_types = state
        .registry
        .types()
        .map(|t| t.kind.type_name().to_string())
        .collect();

    Json(HealthResponse {
        status: "ok".to_string(),
        database: db_status.to_string(),
        resource_types,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
