//! Seam between the generator and a remote image-generation API.

use async_trait::async_trait;

use crate::generation::ResponseFormat;

/// Parameters sent to the provider for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub model: String,
    pub prompt: String,
    pub n: u8,
    pub format: ResponseFormat,
}

/// One image as returned by the provider. Which of `url` / `b64_json` is set
/// depends on the requested [`ResponseFormat`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderImage {
    pub url: Option<String>,
    pub b64_json: Option<String>,
    pub revised_prompt: Option<String>,
}

/// Errors surfaced by an [`ImageProvider`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request never got a response (network, DNS, TLS, timeout).
    #[error("Request failed: {0}")]
    Request(String),

    /// The provider answered with a non-2xx status.
    #[error("Provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body could not be understood.
    #[error("Invalid provider response: {0}")]
    Decode(String),
}

/// A remote image-generation backend.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate `request.n` images for a prompt.
    async fn generate(&self, request: &ProviderRequest) -> Result<Vec<ProviderImage>, ProviderError>;

    /// Fetch the bytes behind an image URL returned by [`ImageProvider::generate`].
    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}
