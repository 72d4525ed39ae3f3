use axum::{
    Form, Json, async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{HeaderMap, header, request::Parts},
};
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::ServiceError;

fn rejected(reason: String) -> ServiceError {
    warn!(reason = %reason, "Rejected request input");
    ServiceError::InvalidInput(reason)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Self {
        let essence = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some("application/json") => BodyKind::Json,
            Some(v) if v.starts_with("application/") && v.ends_with("+json") => BodyKind::Json,
            Some("application/x-www-form-urlencoded") => BodyKind::Form,
            _ => BodyKind::Other,
        }
    }
}

/// Raw request body as a JSON value.
///
/// JSON and url-encoded form bodies are parsed. An empty body, or one with
/// any other content type, reads as `{}` so the validator reports each
/// missing field. Unparsable bodies are rejected with the error envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for RequestBody
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match BodyKind::of(req.headers()) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|r| rejected(r.body_text()))?;

                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self(Value::Object(Map::new())));
                }

                let Json(value) = Json::<Value>::from_bytes(&bytes).map_err(|r| rejected(r.body_text()))?;
                Ok(Self(value))
            }
            BodyKind::Form => {
                let Form(fields) = Form::<Map<String, Value>>::from_request(req, state)
                    .await
                    .map_err(|r| rejected(r.body_text()))?;
                Ok(Self(Value::Object(fields)))
            }
            BodyKind::Other => Ok(Self(Value::Object(Map::new()))),
        }
    }
}

/// `:bottle_id` path segment; format checks happen in the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottleIdPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BottleIdPath
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(bottle_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|r| rejected(r.body_text()))?;

        Ok(Self(bottle_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_body_kind() {
        assert_eq!(BodyKind::of(&headers("application/json")), BodyKind::Json);
        assert_eq!(BodyKind::of(&headers("Application/JSON; charset=utf-8")), BodyKind::Json);
        assert_eq!(BodyKind::of(&headers("application/merge-patch+json")), BodyKind::Json);
        assert_eq!(
            BodyKind::of(&headers("application/x-www-form-urlencoded")),
            BodyKind::Form
        );
        assert_eq!(BodyKind::of(&headers("text/plain")), BodyKind::Other);
        assert_eq!(BodyKind::of(&HeaderMap::new()), BodyKind::Other);
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Value, ServiceError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(axum::body::Body::from(body)).unwrap();
        RequestBody::from_request(request, &()).await.map(|RequestBody(v)| v)
    }

    #[tokio::test]
    async fn test_missing_body_reads_as_empty_object() {
        assert_eq!(extract(None, "").await.unwrap(), serde_json::json!({}));
        assert_eq!(
            extract(Some("application/json"), "").await.unwrap(),
            serde_json::json!({})
        );
    }

    #[tokio::test]
    async fn test_form_fields_are_strings() {
        let value = extract(
            Some("application/x-www-form-urlencoded"),
            "name=Gin&brand=X&capacity=5",
        )
        .await
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "Gin", "brand": "X", "capacity": "5"})
        );
    }

    #[tokio::test]
    async fn test_broken_json_is_invalid_input() {
        let result = extract(Some("application/json"), "{not json").await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }
}
