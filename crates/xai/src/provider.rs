//! [`ImageProvider`] implementation backed by [`XaiImagesApi`].

use async_trait::async_trait;
use grokgen_core::provider::{ImageProvider, ProviderError, ProviderImage, ProviderRequest};

use crate::api::{XaiApiError, XaiImagesApi};
use crate::models::ImagesRequest;

impl From<XaiApiError> for ProviderError {
    fn from(err: XaiApiError) -> Self {
        match err {
            XaiApiError::Request(e) if e.is_decode() => ProviderError::Decode(e.to_string()),
            XaiApiError::Request(e) => ProviderError::Request(e.to_string()),
            XaiApiError::ApiError { status, body } => ProviderError::Api { status, body },
        }
    }
}

#[async_trait]
impl ImageProvider for XaiImagesApi {
    async fn generate(&self, request: &ProviderRequest) -> Result<Vec<ProviderImage>, ProviderError> {
        let body = ImagesRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            n: request.n,
            response_format: request.format.as_wire().to_string(),
        };

        let response = self.generate_images(&body).await?;

        Ok(response
            .data
            .into_iter()
            .map(|d| ProviderImage {
                url: d.url,
                b64_json: d.b64_json,
                revised_prompt: d.revised_prompt,
            })
            .collect())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(XaiImagesApi::download(self, url).await?)
    }
}
