//! Mapping of [`ArmadaError`] onto HTTP responses.
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | `NotFound` | 404 | `{"error": "..."}` |
//! | `UnknownCommand` | 404 | `["Unknown Command"]` |
//! | `ArgumentMismatch` | 422 | `{"error": "..."}` |
//! | anything else | 500 | `{"error": "..."}` |

use armada_types::{ArmadaError, UNKNOWN_COMMAND};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, warn};

/// Content type of every response the API writes.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Handler error: an [`ArmadaError`] that knows how to render itself.
#[derive(Debug)]
pub struct ApiError(pub ArmadaError);

impl From<ArmadaError> for ApiError {
    fn from(err: ArmadaError) -> Self {
        ApiError(err)
    }
}

/// HTTP status for `err`.
pub fn status_for(err: &ArmadaError) -> StatusCode {
    match err {
        ArmadaError::NotFound { .. } | ArmadaError::UnknownCommand { .. } => StatusCode::NOT_FOUND,
        ArmadaError::ArgumentMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ArmadaError::HardwareFault { .. }
        | ArmadaError::Serialization(_)
        | ArmadaError::Config(_)
        | ArmadaError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        match self.0 {
            ArmadaError::UnknownCommand { .. } => json_response(status, &[UNKNOWN_COMMAND]),
            other => error_body(status, &other.to_string()),
        }
    }
}

/// `{"error": message}` with the given status.
pub fn error_body(status: StatusCode, message: &str) -> Response {
    json_response(status, &json!({ "error": message }))
}

/// Serialize `body` as the JSON response payload.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => {
            error!(error = %e, "response serialization failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
                r#"{"error":"response serialization failed"}"#,
            )
                .into_response()
        }
    }
}
