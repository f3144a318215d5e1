use crate::{Error, config::Environment, upload::ImageMetadata};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: Option<String>,
    pub metadata: ImageMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error already resolved to its HTTP shape.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(error),
        }
    }

    /// Maps a crate error to its response. Raw details are attached to the
    /// generic failure only, and only in development.
    pub fn from_error(err: &Error, environment: Environment) -> Self {
        let (status, message) = err.http_status();
        let details = (err.is_unclassified() && environment.exposes_error_details())
            .then(|| err.to_string());

        Self {
            status,
            body: ErrorResponse {
                error: message,
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ANALYSIS_FAILED_MESSAGE, UploadError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_details_only_in_development() {
        let err = Error::upstream(StatusCode::BAD_GATEWAY, "connection reset");

        let prod = ApiError::from_error(&err, Environment::Production);
        assert_eq!(prod.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(prod.body.error, ANALYSIS_FAILED_MESSAGE);
        assert!(prod.body.details.is_none());

        let dev = ApiError::from_error(&err, Environment::Development);
        assert_eq!(
            dev.body.details.as_deref(),
            Some("502 Bad Gateway connection reset")
        );
    }

    #[test]
    fn test_classified_errors_never_carry_details() {
        let err = Error::from(UploadError::WrongType);
        let api = ApiError::from_error(&err, Environment::Development);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.body.details.is_none());
    }

    #[test]
    fn test_error_body_omits_absent_details() {
        let body = ErrorResponse::new("No image file provided");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "error": "No image file provided" })
        );
    }
}
