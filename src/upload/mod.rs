//! Multipart upload validation.
//!
//! Accepts exactly one file part named `image`, rejects non-image content
//! types before reading the part body, and stops reading as soon as the
//! running size passes [`MAX_UPLOAD_BYTES`]. Nothing touches the disk.

mod types;

pub use types::*;

use crate::error::UploadError;
use axum::{
    body::Bytes,
    extract::multipart::{Multipart, MultipartError},
    http::StatusCode,
};
use tracing::debug;

pub const IMAGE_FIELD: &str = "image";
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Room for boundaries, part headers and small text fields on top of the file.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Body limit for the upload route.
pub const fn request_body_limit() -> usize {
    MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES
}

pub async fn extract_image(mut multipart: Multipart) -> Result<UploadedImage, UploadError> {
    let mut image: Option<UploadedImage> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(from_multipart)? {
        // Parts without a filename are plain form values; an empty filename is
        // what browsers send for a file input left blank.
        let Some(filename) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        if field.name() != Some(IMAGE_FIELD) || image.is_some() {
            return Err(UploadError::Multipart("Unexpected field".to_string()));
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            debug!("Rejecting upload {} with content type '{}'", filename, content_type);
            return Err(UploadError::WrongType);
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(from_multipart)? {
            if buffer.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(UploadError::TooLarge);
            }
            buffer.extend_from_slice(&chunk);
        }

        image = Some(UploadedImage {
            bytes: Bytes::from(buffer),
            filename,
            content_type,
        });
    }

    image.ok_or(UploadError::NoFile)
}

fn from_multipart(err: MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge
    } else {
        UploadError::Multipart(err.body_text())
    }
}
