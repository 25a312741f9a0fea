//! Generation orchestration: ask the provider for images, save them to the
//! local store, and point their URLs at the service's `/images` route.
//!
//! [`ImageGenerator::generate`] never returns an error. Every failure becomes
//! a [`GenerationResult`] with `success == false`, and a failure to save one
//! image leaves that image's provider data untouched.

use std::sync::Arc;

use crate::error::CoreError;
use crate::generation::{
    clamp_count, validate_prompt, GenerateOptions, ResponseFormat, DEFAULT_IMAGE_MODEL,
};
use crate::naming::image_filename;
use crate::provider::{ImageProvider, ProviderImage, ProviderRequest};
use crate::storage::{decode_base64, detect_extension, ImageStore};
use crate::types::{GeneratedImage, GenerationResult};

/// Base URL used for rewritten image links when none is configured.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8081";

#[derive(Clone)]
pub struct ImageGenerator {
    provider: Arc<dyn ImageProvider>,
    store: ImageStore,
    model: String,
    public_base_url: String,
}

impl ImageGenerator {
    pub fn new(provider: Arc<dyn ImageProvider>, store: ImageStore) -> Self {
        Self {
            provider,
            store,
            model: DEFAULT_IMAGE_MODEL.to_string(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Base URL that saved images are advertised under (`{base}/images/{name}`).
    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Run one generation end to end.
    pub async fn generate(&self, options: GenerateOptions) -> GenerationResult {
        let prompt = match validate_prompt(&options.prompt) {
            Ok(p) => p.to_string(),
            Err(e) => return GenerationResult::failure(options.prompt.clone(), e.to_string()),
        };
        let count = clamp_count(i64::from(options.count));

        tracing::info!(prompt = %prompt, count, format = options.format.as_wire(), "Generating images");

        let request = ProviderRequest {
            model: self.model.clone(),
            prompt: prompt.clone(),
            n: count,
            format: options.format,
        };

        let provided = match self.provider.generate(&request).await {
            Ok(images) => images,
            Err(e) => {
                tracing::error!(prompt = %prompt, error = %e, "Image generation failed");
                return GenerationResult::failure(prompt, e.to_string());
            }
        };

        let mut images = Vec::with_capacity(provided.len());
        for (i, item) in provided.into_iter().enumerate() {
            let index = i as u32 + 1;
            let mut image = GeneratedImage {
                index,
                revised_prompt: item.revised_prompt.clone().unwrap_or_else(|| prompt.clone()),
                url: item.url.clone(),
                b64_json: item.b64_json.clone(),
                saved_path: None,
            };

            if options.save_images {
                match self.save_image(&prompt, index, options.format, &item).await {
                    Ok(Some((path, file_name))) => {
                        image.saved_path = Some(path);
                        image.url = Some(format!("{}/images/{file_name}", self.public_base_url));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(prompt = %prompt, index, error = %e, "Failed to save image");
                    }
                }
            }

            images.push(image);
        }

        let result = GenerationResult::success(prompt, images);
        tracing::info!(
            prompt = %result.original_prompt,
            count = result.count,
            "Generated images"
        );
        result
    }

    /// Persist one provider image. Returns `(saved_path, file_name)`, or
    /// `None` when the image carries nothing for the requested format.
    async fn save_image(
        &self,
        prompt: &str,
        index: u32,
        format: ResponseFormat,
        item: &ProviderImage,
    ) -> Result<Option<(String, String)>, CoreError> {
        let bytes = match (format, &item.url, &item.b64_json) {
            (ResponseFormat::Url, Some(url), _) => self.provider.download(url).await?,
            (ResponseFormat::B64Json, _, Some(b64)) => decode_base64(b64)?,
            _ => return Ok(None),
        };

        let file_name = image_filename(prompt, &chrono::Local::now(), index, detect_extension(&bytes));
        let path = self.store.save(&file_name, &bytes).await?;
        let written_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or(file_name);

        Ok(Some((path.display().to_string(), written_name)))
    }
}
