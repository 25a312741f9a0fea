//! Handler for `POST /generate-image`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use grokgen_core::generation::{
    validate_prompt, GenerateOptions, ResponseFormat, DEFAULT_IMAGE_COUNT, PROMPT_REQUIRED,
};
use grokgen_core::types::GenerationResult;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Message returned when the body is not sent as JSON.
pub const JSON_REQUIRED: &str = "Request must be JSON";

/// Body of `POST /generate-image`.
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: Option<String>,
    /// Any JSON number, truncated and clamped into `[1, 10]`; defaults to 1.
    pub count: Option<serde_json::Number>,
    /// `"url"` or `"b64_json"`; anything else means `"url"`.
    pub format: Option<String>,
    /// Defaults to `true`.
    pub save_images: Option<bool>,
}

impl GenerateImageRequest {
    fn into_options(self) -> AppResult<GenerateOptions> {
        let prompt = self
            .prompt
            .ok_or_else(|| AppError::BadRequest(PROMPT_REQUIRED.to_string()))?;
        let prompt = validate_prompt(&prompt)?.to_string();

        Ok(GenerateOptions::new(prompt)
            .with_count(
                self.count
                    .as_ref()
                    .map(count_from_number)
                    .unwrap_or(i64::from(DEFAULT_IMAGE_COUNT)),
            )
            .with_format(
                self.format
                    .as_deref()
                    .map(ResponseFormat::from_wire)
                    .unwrap_or_default(),
            )
            .with_save_images(self.save_images.unwrap_or(true)))
    }
}

/// Generate images from a prompt.
///
/// Responds with the generation result: 200 when it succeeded, 500 when the
/// provider call failed (the body still carries `success: false` and the
/// error).
pub async fn generate_image(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<GenerationResult>)> {
    let Json(input) = payload.map_err(reject_json)?;
    let options = input.into_options()?;

    let result = state.generator.generate(options).await;

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(result)))
}

/// Fractions truncate toward zero and out-of-range values saturate.
fn count_from_number(n: &serde_json::Number) -> i64 {
    n.as_i64()
        .or_else(|| n.as_f64().map(|f| f as i64))
        .unwrap_or(i64::MAX)
}

fn reject_json(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::BadRequest(JSON_REQUIRED.to_string()),
        other => AppError::BadRequest(other.body_text()),
    }
}
