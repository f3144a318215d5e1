use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use mathlens_rust::{
    analysis::AnalysisRelay,
    config::Environment,
    llm::LlmClient,
    server::{self, AppState},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

pub const BOUNDARY: &str = "mathlens-test-boundary";

/// A few bytes that start like a PNG; the server never decodes them.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

pub const INDEX_HTML: &str = "<!doctype html><title>mathlens</title>";

/// Builds a router around `client`, serving assets from `static_dir`.
pub fn create_test_app(
    client: Option<Arc<dyn LlmClient>>,
    environment: Environment,
    static_dir: &std::path::Path,
) -> Router {
    let state = AppState {
        relay: AnalysisRelay::new(client),
        environment,
    };
    server::router(state, static_dir)
}

/// Create a temporary static directory with an index page and one asset
pub fn create_static_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.path().join("script.js"), "console.log('ready');").unwrap();
    dir
}

/// Hand-built multipart/form-data body
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// Multipart request carrying one PNG in the `image` field
pub fn image_request(filename: &str, data: &[u8]) -> Request<Body> {
    MultipartBody::new()
        .file("image", filename, "image/png", data)
        .into_request("/api/analyze")
}

pub async fn read_body(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = read_body(response).await;
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}
