//! Maps the domain error taxonomy onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;

/// Wrapper so `?` works in handlers returning axum responses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let (status, message) = match &self.0 {
            DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            DomainError::NotFound(..) => (StatusCode::NOT_FOUND, self.0.to_string()),
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DomainError::InvalidOperation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            DomainError::InvalidTransition { .. } => (StatusCode::CONFLICT, self.0.to_string()),
            DomainError::Internal(msg) => {
                // The real failure goes to the log, never to the client.
                tracing::error!(error = %msg, "request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": { "kind": kind, "message": message }
        }));
        (status, body).into_response()
    }
}
