use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pharma_core::ErrorKind;
use serde::Serialize;

/// `{ "success": true, "data": ... }` or `{ "success": false, "error": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    pub details: serde_json::Value,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(kind: ErrorKind, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                kind,
                message: message.into(),
                details,
            }),
        }
    }
}

/// A successful envelope with an explicit status code.
pub struct Reply<T: Serialize>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.0, Json(ApiResponse::ok(self.1))).into_response()
    }
}

pub fn ok<T: Serialize>(data: T) -> Reply<T> {
    Reply(StatusCode::OK, data)
}

pub fn created<T: Serialize>(data: T) -> Reply<T> {
    Reply(StatusCode::CREATED, data)
}
