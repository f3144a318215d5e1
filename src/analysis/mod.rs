mod prompt;

pub use prompt::MATH_SORT_PROMPT;

use crate::{
    Error, Result,
    llm::{AnalysisRequest, InlineImage, LlmClient},
    upload::{ImageMetadata, UploadedImage},
};
use std::sync::Arc;
use tracing::{debug, info};

pub const VISION_MODEL: &str = "gpt-4o";
pub const MAX_OUTPUT_TOKENS: u32 = 500;

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// First choice's message content; `None` when the model sent none.
    pub text: Option<String>,
    pub metadata: ImageMetadata,
}

/// Turns one uploaded image into one upstream call.
///
/// The client is optional so the server can run without a credential; in
/// that case every analysis fails with [`Error::MissingCredential`] before
/// anything is sent.
#[derive(Clone)]
pub struct AnalysisRelay {
    client: Option<Arc<dyn LlmClient>>,
}

impl AnalysisRelay {
    pub fn new(client: Option<Arc<dyn LlmClient>>) -> Self {
        Self { client }
    }

    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn build_request(image: &UploadedImage) -> AnalysisRequest {
        AnalysisRequest {
            model: VISION_MODEL.to_string(),
            instruction: MATH_SORT_PROMPT.to_string(),
            image: InlineImage::from_bytes(image.content_type.clone(), &image.bytes),
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }

    pub async fn analyze(&self, image: &UploadedImage) -> Result<AnalysisResult> {
        let client = self.client.as_ref().ok_or(Error::MissingCredential)?;

        info!("Analyzing image: {} ({} bytes)", image.filename, image.size());

        let request = Self::build_request(image);
        let response = client.create_chat_completion(&request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Upstream usage: {} prompt / {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::llm("Upstream returned no completion choices"))?;

        info!("Analysis completed successfully");

        Ok(AnalysisResult {
            text: choice.content,
            metadata: image.metadata(),
        })
    }
}
