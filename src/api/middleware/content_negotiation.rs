use crate::api::error::AppError;
use axum::{
    extract::Request,
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mime::Mime;

fn is_json_api(mime: &Mime) -> bool {
    mime.type_() == mime::APPLICATION
        && mime.subtype() == "vnd.api"
        && mime.suffix() == Some(mime::JSON)
}

/// Media type parameters other than the `q` quality weight.
fn has_extra_params(mime: &Mime) -> bool {
    mime.params().any(|(name, _)| name != "q")
}

fn check_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(());
    };

    match content_type.parse::<Mime>() {
        Ok(mime) if is_json_api(&mime) && has_extra_params(&mime) => {
            Err(AppError::UnsupportedMediaType(format!(
                "'{}' must not carry media type parameters",
                content_type
            )))
        }
        _ => Ok(()),
    }
}

fn check_accept(headers: &HeaderMap) -> Result<(), AppError> {
    let ranges: Vec<Mime> = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|v| v.trim().parse().ok())
        .collect();

    let json_api: Vec<&Mime> = ranges.iter().filter(|m| is_json_api(m)).collect();
    if !json_api.is_empty() && json_api.iter().all(|m| has_extra_params(m)) {
        return Err(AppError::NotAcceptable(
            "application/vnd.api+json is only acceptable without media type parameters"
                .to_string(),
        ));
    }

    Ok(())
}

/// Rejects requests that ask for a parameterised JSON:API media type.
pub async fn content_negotiation(req: Request, next: Next) -> Response {
    if let Err(e) = check_content_type(req.headers()).and_then(|_| check_accept(req.headers())) {
        tracing::debug!("Content negotiation failed: {}", e);
        return e.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: header::HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_plain_types_pass() {
        assert!(check_content_type(&headers(header::CONTENT_TYPE, "application/json")).is_ok());
        assert!(
            check_content_type(&headers(header::CONTENT_TYPE, "application/vnd.api+json")).is_ok()
        );
        assert!(check_accept(&headers(header::ACCEPT, "application/vnd.api+json")).is_ok());
        assert!(check_accept(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_parameterised_content_type_is_rejected() {
        let result = check_content_type(&headers(
            header::CONTENT_TYPE,
            "application/vnd.api+json; version=1",
        ));
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_accept_with_only_parameterised_json_api() {
        let rejected = check_accept(&headers(
            header::ACCEPT,
            "application/vnd.api+json; version=1",
        ));
        assert!(matches!(rejected, Err(AppError::NotAcceptable(_))));

        let accepted = check_accept(&headers(
            header::ACCEPT,
            "application/vnd.api+json; version=1, application/vnd.api+json",
        ));
        assert!(accepted.is_ok());

        let weighted = check_accept(&headers(header::ACCEPT, "application/vnd.api+json; q=0.9"));
        assert!(weighted.is_ok());
    }
}
