use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Builds the JSON error body. 5xx messages are replaced by a generic one
/// unless the caller passes `details` on purpose.
pub fn error_response(status: StatusCode, message: String, details: Option<String>) -> Response {
    let message = if status.is_server_error() && details.is_none() {
        "Internal server error".to_string()
    } else {
        message
    };

    let mut body = ErrorResponse::new(status, message);
    if let Some(details) = details {
        body = body.with_details(details);
    }

    (status, Json(body)).into_response()
}

/// Fallback error for handlers without a use case specific error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Internal(err) = self;
        error!(error = ?err, "http: internal error");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, String::new(), None)
    }
}
