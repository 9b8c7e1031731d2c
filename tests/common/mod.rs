#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use jsonapi_polymorphic::config::AppConfig;
use jsonapi_polymorphic::entities::{file_models, posts};
use jsonapi_polymorphic::infrastructure::database;
use jsonapi_polymorphic::models::ResourceRegistry;
use jsonapi_polymorphic::{AppState, create_app};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
}

pub async fn setup() -> TestApp {
    setup_with(AppConfig::development(), ResourceRegistry::with_default_types()).await
}

pub async fn setup_with(config: AppConfig, registry: ResourceRegistry) -> TestApp {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("jsonapi_polymorphic=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();

    let db = database::connect(&config).await.unwrap();
    database::run_migrations(&db).await.unwrap();

    let app = create_app(AppState::new(db.clone(), registry, config));
    TestApp { app, db }
}

impl TestApp {
    pub async fn create_post(&self, title: &str) -> posts::Model {
        posts::ActiveModel {
            title: Set(Some(title.to_string())),
            content: Set(Some("Content".to_string())),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub async fn create_file(
        &self,
        parent_id: Option<i32>,
        parent_type: Option<&str>,
    ) -> file_models::Model {
        file_models::ActiveModel {
            file_name: Set(Some("blah.jpg".to_string())),
            parent_id: Set(parent_id),
            parent_type: Set(parent_type.map(str::to_string)),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                panic!(
                    "non-JSON body with status {}: {}",
                    status,
                    String::from_utf8_lossy(&body)
                )
            })
        };
        (status, headers, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, json) = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        (status, json)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, HeaderMap, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Accept", "application/vnd.api+json")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
