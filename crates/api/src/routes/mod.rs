pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the service route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate-image          generate images from a prompt (POST)
/// /images/{*image_name}    serve a saved image (GET)
/// ```
///
/// `/health` is mounted separately by [`health::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-image", post(handlers::generation::generate_image))
        .route("/images/{*image_name}", get(handlers::images::serve_image))
}
