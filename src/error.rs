use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "OpenAI API key not configured. Please set OPENAI_API_KEY environment variable.";
pub const INVALID_CREDENTIAL_MESSAGE: &str =
    "Invalid OpenAI API key. Please check your API key configuration.";
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const UNSUPPORTED_IMAGE_MESSAGE: &str = "Image format not supported or image too large.";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze image. Please try again later.";

/// Rejections produced while reading the multipart upload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("No image file provided")]
    NoFile,

    #[error("Only image files are allowed")]
    WrongType,

    #[error("File too large. Maximum size is 10MB.")]
    TooLarge,

    #[error("File upload error: {0}")]
    Multipart(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] UploadError),

    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    #[error("{} {message}", .status.as_u16())]
    Upstream { status: StatusCode, message: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// HTTP status and client-facing message for this error.
    pub fn http_status(&self) -> (StatusCode, String) {
        self.classified().unwrap_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ANALYSIS_FAILED_MESSAGE.to_string(),
            )
        })
    }

    /// True for failures that fall through to the generic 500, the only
    /// shape allowed to carry raw `details`.
    pub fn is_unclassified(&self) -> bool {
        self.classified().is_none()
    }

    // The upstream 400 case keys off the word "image" in the upstream
    // message. That match is brittle: a reworded upstream error falls
    // through to the generic 500.
    fn classified(&self) -> Option<(StatusCode, String)> {
        match self {
            Self::Validation(e) => Some((StatusCode::BAD_REQUEST, e.to_string())),
            Self::MissingCredential => Some((
                StatusCode::INTERNAL_SERVER_ERROR,
                MISSING_CREDENTIAL_MESSAGE.to_string(),
            )),
            Self::Upstream { status, .. } if *status == StatusCode::UNAUTHORIZED => Some((
                StatusCode::UNAUTHORIZED,
                INVALID_CREDENTIAL_MESSAGE.to_string(),
            )),
            Self::Upstream { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS => Some((
                StatusCode::TOO_MANY_REQUESTS,
                RATE_LIMIT_MESSAGE.to_string(),
            )),
            Self::Upstream { status, message }
                if *status == StatusCode::BAD_REQUEST && message.contains("image") =>
            {
                Some((
                    StatusCode::BAD_REQUEST,
                    UNSUPPORTED_IMAGE_MESSAGE.to_string(),
                ))
            }
            _ => None,
        }
    }
}
