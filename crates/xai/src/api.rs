//! HTTP client for the images endpoint, using [`reqwest`].

use crate::config::XaiConfig;
use crate::models::{ErrorEnvelope, ImagesRequest, ImagesResponse};

/// HTTP client for one xAI account.
#[derive(Clone)]
pub struct XaiImagesApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// Errors from the xAI REST layer.
#[derive(Debug, thiserror::Error)]
pub enum XaiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// xAI (or the image host) returned a non-2xx status code.
    #[error("xAI API error ({status}): {body}")]
    ApiError {
        status: u16,
        /// Error message from the body, or the raw body when it has none.
        body: String,
    },
}

impl XaiImagesApi {
    /// Build a client with its own connection pool and the configured timeout.
    pub fn new(config: &XaiConfig) -> Result<Self, XaiApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &XaiConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Generate images.
    ///
    /// Sends `POST {api_url}/images/generations` with bearer auth.
    pub async fn generate_images(
        &self,
        request: &ImagesRequest,
    ) -> Result<ImagesResponse, XaiApiError> {
        tracing::debug!(model = %request.model, n = request.n, "Calling images endpoint");

        let response = self
            .client
            .post(format!("{}/images/generations", self.api_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<ImagesResponse>().await?)
    }

    /// Download the bytes behind a generated image URL.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, XaiApiError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Pass 2xx responses through; turn anything else into
    /// [`XaiApiError::ApiError`], preferring the OpenAI-style error message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, XaiApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let body = serde_json::from_str::<ErrorEnvelope>(&raw)
            .map(|envelope| envelope.error.message)
            .unwrap_or(raw);

        Err(XaiApiError::ApiError {
            status: status.as_u16(),
            body,
        })
    }
}
