use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grokgen_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{"success": false, "error": ..., "code": ...}`
/// so clients of `/generate-image` can always branch on `success`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `grokgen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Reading a stored image failed after it was found.
    #[error("Error serving image: {0}")]
    ServeImage(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidPath(_) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_PATH",
                    "Invalid file path".to_string(),
                ),
                CoreError::Provider(err) => {
                    tracing::warn!(error = %err, "Provider error");
                    (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", err.to_string())
                }
                CoreError::Decode(msg) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_ERROR", msg.clone())
                }
                CoreError::Io(err) => {
                    tracing::error!(error = %err, "I/O error");
                    internal()
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::ServeImage(msg) => {
                tracing::error!(error = %msg, "Failed to serve image");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVE_ERROR",
                    format!("Error serving image: {msg}"),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
