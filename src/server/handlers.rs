use super::types::{AnalyzeResponse, ApiError, ErrorResponse, HealthResponse};
use crate::{
    Error, analysis::AnalysisRelay, config::Environment, error::UploadError, upload,
};
use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::any::Any;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub relay: AnalysisRelay,
    pub environment: Environment,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}

pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    // A body that is not multipart at all has no file part to offer.
    let multipart = multipart.map_err(|rejection| {
        warn!("[{}] Not a multipart request: {}", request_id, rejection);
        reject(UploadError::NoFile, state.environment)
    })?;

    let image = upload::extract_image(multipart).await.map_err(|e| {
        warn!("[{}] Upload rejected: {}", request_id, e);
        reject(e, state.environment)
    })?;

    info!(
        "[{}] Received {} ({} bytes, {})",
        request_id,
        image.filename,
        image.size(),
        image.content_type
    );

    match state.relay.analyze(&image).await {
        Ok(result) => Ok(Json(AnalyzeResponse {
            success: true,
            analysis: result.text,
            metadata: result.metadata,
        })),
        Err(e) => {
            error!("[{}] Error analyzing image: {}", request_id, e);
            Err(ApiError::from_error(&e, state.environment))
        }
    }
}

pub async fn api_not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

/// Last-resort response for a panicking handler.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    error!("Unhandled error: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
        .into_response()
}

fn reject(err: UploadError, environment: Environment) -> ApiError {
    ApiError::from_error(&Error::from(err), environment)
}
