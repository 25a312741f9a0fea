#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use grokgen_api::config::ServerConfig;
use grokgen_api::router::build_app_router;
use grokgen_api::state::AppState;
use grokgen_core::generator::ImageGenerator;
use grokgen_core::provider::{ImageProvider, ProviderError, ProviderImage, ProviderRequest};
use grokgen_core::storage::ImageStore;

/// Smallest byte sequence `image::guess_format` recognizes as JPEG.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

pub const BASE_URL: &str = "http://localhost:8081";

/// Provider double: answers every request with `n` canned images, or fails
/// with `fail_status` when set.
#[derive(Default)]
pub struct FakeProvider {
    pub fail_status: Option<u16>,
    pub requests: Mutex<Vec<ProviderRequest>>,
}

#[async_trait]
impl ImageProvider for FakeProvider {
    async fn generate(&self, request: &ProviderRequest) -> Result<Vec<ProviderImage>, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(status) = self.fail_status {
            return Err(ProviderError::Api {
                status,
                body: "Incorrect API key provided".into(),
            });
        }

        Ok((1..=request.n)
            .map(|i| ProviderImage {
                url: Some(format!("https://cdn.test/{i}.jpg")),
                b64_json: Some("/9j/4AAQSkZJRg==".into()),
                revised_prompt: Some(format!("{} (revised)", request.prompt)),
            })
            .collect())
    }

    async fn download(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(JPEG_BYTES.to_vec())
    }
}

/// Build a test `ServerConfig` rooted at `output_dir`.
pub fn test_config(output_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        output_dir,
        public_base_url: BASE_URL.to_string(),
    }
}

/// Everything a router test needs: the app, the provider double, and the
/// temporary output directory (dropped with the harness).
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<FakeProvider>,
    pub dir: tempfile::TempDir,
}

impl TestApp {
    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("generated_images")
    }
}

pub async fn test_generator(provider: Arc<FakeProvider>, root: PathBuf) -> ImageGenerator {
    let store = ImageStore::open(root).await.unwrap();
    ImageGenerator::new(provider, store).with_public_base_url(BASE_URL)
}

/// Build the full application router with all middleware layers, backed by
/// `provider` and a fresh temporary output directory.
pub async fn build_test_app(provider: FakeProvider) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("generated_images");
    let provider = Arc::new(provider);

    let generator = test_generator(Arc::clone(&provider), root.clone()).await;
    let state = AppState::new(test_config(root), generator);

    TestApp {
        router: build_app_router(state),
        provider,
        dir,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
