use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Uniform response wrapper returned by every bottle endpoint
///
/// Success: `{status_code, success: true, data}`
/// Failure: `{status_code, success: false, errors}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            success: true,
            data: Some(data),
            errors: None,
        }
    }

    pub fn failure(status: StatusCode, errors: serde_json::Value) -> Self {
        Self {
            status_code: status.as_u16(),
            success: false,
            data: None,
            errors: Some(errors),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Flag payload returned by update and delete (`{"updated": true}`)
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UpdatedResponse {
    pub updated: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DeletedResponse {
    pub deleted: bool,
}
