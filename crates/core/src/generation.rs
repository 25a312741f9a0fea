//! Generation request options, limits, and wire formats.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Smallest number of images a single request may ask for.
pub const MIN_IMAGE_COUNT: u8 = 1;

/// Largest number of images a single request may ask for.
pub const MAX_IMAGE_COUNT: u8 = 10;

/// Images generated when the caller does not say.
pub const DEFAULT_IMAGE_COUNT: u8 = 1;

/// Model identifier sent to the images endpoint.
pub const DEFAULT_IMAGE_MODEL: &str = "grok-2-image";

/// Message used whenever a prompt is missing or blank.
pub const PROMPT_REQUIRED: &str = "Prompt is required";

// ---------------------------------------------------------------------------
// Response format
// ---------------------------------------------------------------------------

/// How the provider should hand back generated images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Hosted image URLs.
    #[default]
    Url,
    /// Inline base64-encoded image bytes.
    B64Json,
}

impl ResponseFormat {
    /// Parse the wire name (`"url"` / `"b64_json"`). Unknown values fall back
    /// to [`ResponseFormat::Url`].
    pub fn from_wire(value: &str) -> Self {
        match value {
            "b64_json" => Self::B64Json,
            _ => Self::Url,
        }
    }

    /// Parse the short CLI spelling (`"url"` / `"b64"`). Anything other than
    /// `b64` means URLs.
    pub fn from_cli(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("b64") {
            Self::B64Json
        } else {
            Self::Url
        }
    }

    /// Wire name sent to the provider.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::B64Json => "b64_json",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Clamp a requested image count into `[MIN_IMAGE_COUNT, MAX_IMAGE_COUNT]`.
pub fn clamp_count(requested: i64) -> u8 {
    requested.clamp(i64::from(MIN_IMAGE_COUNT), i64::from(MAX_IMAGE_COUNT)) as u8
}

/// Trim a prompt and reject it when nothing is left.
pub fn validate_prompt(prompt: &str) -> Result<&str, CoreError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(PROMPT_REQUIRED.to_string()));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// A single generation request as seen by [`crate::generator::ImageGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub prompt: String,
    pub count: u8,
    pub format: ResponseFormat,
    pub save_images: bool,
}

impl GenerateOptions {
    /// One URL-format image, saved locally.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            count: DEFAULT_IMAGE_COUNT,
            format: ResponseFormat::Url,
            save_images: true,
        }
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = clamp_count(count);
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_save_images(mut self, save_images: bool) -> Self {
        self.save_images = save_images;
        self
    }
}
