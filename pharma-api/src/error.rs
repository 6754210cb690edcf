use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pharma_core::{CoreError, ErrorKind};

use crate::envelope::ApiResponse;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    Anyhow(anyhow::Error),
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self {
            AppError::Core(err) => match err.kind() {
                ErrorKind::Internal => {
                    tracing::error!("Internal Server Error: {}", err);
                    ApiResponse::failure(ErrorKind::Internal, INTERNAL_MESSAGE, serde_json::Value::Null)
                }
                kind => ApiResponse::failure(kind, err.to_string(), err.details()),
            },
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                ApiResponse::failure(ErrorKind::Internal, INTERNAL_MESSAGE, serde_json::Value::Null)
            }
        };

        let status = body
            .error
            .as_ref()
            .map(|error| status_for(error.kind))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        match err.into().downcast::<CoreError>() {
            Ok(core) => Self::Core(core),
            Err(other) => Self::Anyhow(other),
        }
    }
}
