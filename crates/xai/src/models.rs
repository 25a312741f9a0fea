//! Wire types for `POST /images/generations`.

use serde::{Deserialize, Serialize};

/// Request body for the images endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ImagesRequest {
    pub model: String,
    pub prompt: String,
    pub n: u8,
    /// `"url"` or `"b64_json"`.
    pub response_format: String,
}

/// Successful response from the images endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

/// A single generated image.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// OpenAI-style error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
