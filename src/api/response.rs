use crate::jsonapi::JSON_API_MEDIA_TYPE;
use axum::{
    Json,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Serializes `T` as the body with `Content-Type: application/vnd.api+json`.
#[derive(Debug, Clone)]
pub struct JsonApi<T>(pub T);

impl<T: Serialize> IntoResponse for JsonApi<T> {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, JSON_API_MEDIA_TYPE)],
            Json(self.0),
        )
            .into_response()
    }
}
