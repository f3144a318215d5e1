use axum::body::Bytes;
use serde::{Deserialize, Serialize};

/// A validated image held entirely in memory for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub filename: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: String,
}

impl UploadedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn metadata(&self) -> ImageMetadata {
        ImageMetadata {
            filename: self.filename.clone(),
            size: self.size(),
            content_type: self.content_type.clone(),
        }
    }
}
