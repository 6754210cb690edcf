use serde::{Deserialize, Serialize};

/// Classification shared by every layer; the API maps it onto status codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Authorization,
    BadRequest,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Authorization => "authorization",
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not authorized: {0}")]
    Authorization(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation { .. } => ErrorKind::Validation,
            CoreError::NotFound(_) => ErrorKind::NotFound,
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::Authorization(_) => ErrorKind::Authorization,
            CoreError::BadRequest(_) => ErrorKind::BadRequest,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Structured extras for the response envelope.
    pub fn details(&self) -> serde_json::Value {
        match self {
            CoreError::Validation { field, .. } => serde_json::json!({ "field": field }),
            _ => serde_json::Value::Null,
        }
    }
}
