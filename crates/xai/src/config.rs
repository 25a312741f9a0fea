use std::time::Duration;

use grokgen_core::generation::DEFAULT_IMAGE_MODEL;

/// Default xAI API base URL.
pub const DEFAULT_API_URL: &str = "https://api.x.ai/v1";

/// Default timeout for provider calls and image downloads, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Errors loading [`XaiConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum XaiConfigError {
    #[error("XAI_API_KEY is not set. Get an API key from https://console.x.ai/team/api-keys")]
    MissingApiKey,

    #[error("{var} must be a valid number, got '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Connection settings for the xAI images API.
#[derive(Clone)]
pub struct XaiConfig {
    pub api_key: String,
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for XaiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XaiConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl XaiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Default                |
    /// |--------------------|------------------------|
    /// | `XAI_API_KEY`      | required               |
    /// | `XAI_API_URL`      | `https://api.x.ai/v1`  |
    /// | `XAI_IMAGE_MODEL`  | `grok-2-image`         |
    /// | `XAI_TIMEOUT_SECS` | `120`                  |
    pub fn from_env() -> Result<Self, XaiConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, XaiConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("XAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(XaiConfigError::MissingApiKey)?;

        let api_url = lookup("XAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let model = lookup("XAI_IMAGE_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.into());

        let timeout_secs = match lookup("XAI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| XaiConfigError::Invalid {
                var: "XAI_TIMEOUT_SECS",
                value: raw,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
            ..Self::new(String::new())
        }
        .with_api_url(api_url))
    }
}
