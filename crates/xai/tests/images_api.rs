//! Integration tests for `XaiImagesApi` against an in-process mock server.

use assert_matches::assert_matches;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use grokgen_core::generation::ResponseFormat;
use grokgen_core::provider::{ImageProvider, ProviderError, ProviderRequest};
use grokgen_xai::api::{XaiApiError, XaiImagesApi};
use grokgen_xai::config::XaiConfig;
use grokgen_xai::models::ImagesRequest;

const API_KEY: &str = "test-key";

async fn generations(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != format!("Bearer {API_KEY}") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        );
    }

    let n = body["n"].as_u64().unwrap_or(1);
    let as_b64 = body["response_format"] == "b64_json";
    let data: Vec<Value> = (1..=n)
        .map(|i| {
            if as_b64 {
                json!({"b64_json": "aGVsbG8=", "revised_prompt": format!("revised {i}")})
            } else {
                json!({"url": format!("https://cdn.test/{i}.jpg")})
            }
        })
        .collect();

    (StatusCode::OK, Json(json!({"data": data})))
}

/// Spawn the mock server and return its base URL.
async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/v1/images/generations", post(generations))
        .route("/files/ok.jpg", get(|| async { vec![0xFFu8, 0xD8, 0xFF, 0xE0] }))
        .route(
            "/files/broken.jpg",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str, key: &str) -> XaiImagesApi {
    let config = XaiConfig::new(key).with_api_url(format!("{base}/v1/"));
    XaiImagesApi::new(&config).unwrap()
}

fn request(n: u8, format: ResponseFormat) -> ImagesRequest {
    ImagesRequest {
        model: "grok-2-image".into(),
        prompt: "a cat".into(),
        n,
        response_format: format.as_wire().into(),
    }
}

// ---------------------------------------------------------------------------
// Test: URL format returns one URL per requested image
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_returns_urls() {
    let base = spawn_mock().await;
    let api = client(&base, API_KEY);

    let response = api.generate_images(&request(3, ResponseFormat::Url)).await.unwrap();

    assert_eq!(response.data.len(), 3);
    assert_eq!(response.data[2].url.as_deref(), Some("https://cdn.test/3.jpg"));
}

// ---------------------------------------------------------------------------
// Test: b64 format through the provider trait
// ---------------------------------------------------------------------------

#[tokio::test]
async fn provider_maps_b64_images() {
    let base = spawn_mock().await;
    let api = client(&base, API_KEY);

    let images = ImageProvider::generate(
        &api,
        &ProviderRequest {
            model: "grok-2-image".into(),
            prompt: "a cat".into(),
            n: 2,
            format: ResponseFormat::B64Json,
        },
    )
    .await
    .unwrap();

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].b64_json.as_deref(), Some("aGVsbG8="));
    assert_eq!(images[1].revised_prompt.as_deref(), Some("revised 2"));
    assert!(images[0].url.is_none());
}

// ---------------------------------------------------------------------------
// Test: non-2xx surfaces status and the OpenAI-style error message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_key_surfaces_error_message() {
    let base = spawn_mock().await;
    let api = client(&base, "wrong");

    let err = api
        .generate_images(&request(1, ResponseFormat::Url))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        XaiApiError::ApiError { status: 401, ref body } if body == "Incorrect API key provided"
    );
}

// ---------------------------------------------------------------------------
// Test: downloads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_returns_bytes() {
    let base = spawn_mock().await;
    let api = client(&base, API_KEY);

    let bytes = api.download(&format!("{base}/files/ok.jpg")).await.unwrap();
    assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
}

#[tokio::test]
async fn failed_download_maps_to_provider_api_error() {
    let base = spawn_mock().await;
    let api = client(&base, API_KEY);

    let err = ImageProvider::download(&api, &format!("{base}/files/broken.jpg"))
        .await
        .unwrap_err();

    assert_matches!(err, ProviderError::Api { status: 404, ref body } if body == "gone");
}

#[tokio::test]
async fn unreachable_host_is_a_request_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}"), API_KEY);
    let err = ImageProvider::download(&api, &format!("http://{addr}/x.jpg"))
        .await
        .unwrap_err();

    assert_matches!(err, ProviderError::Request(_));
}
