//! Handler for `GET /images/{*image_name}`: serves files from the output
//! directory.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use grokgen_core::storage::content_type_for;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Stream a saved image.
///
/// Paths that would leave the output directory are rejected with 400;
/// unknown images are 404.
pub async fn serve_image(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> AppResult<Response> {
    let path = state.generator.store().resolve(&image_name).await?;

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| AppError::ServeImage(e.to_string()))?;
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| AppError::ServeImage(e.to_string()))?;

    tracing::debug!(path = %path.display(), bytes = metadata.len(), "Serving image");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&path))
        .header(header::CONTENT_LENGTH, metadata.len().to_string())
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::ServeImage(e.to_string()))
}
