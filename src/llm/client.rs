use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_openai::types::CreateChatCompletionResponse;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: &AnalysisRequest,
    ) -> Result<ChatCompletionResponse>;
}

/// Chat-completions client for OpenAI-compatible endpoints.
///
/// The request and response bodies use `async-openai`'s types; transport goes
/// through `reqwest` so the upstream HTTP status reaches the error mapping.
/// Exactly one attempt is made per call.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds a client when the config carries a usable key.
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        config
            .api_key()
            .map(|key| Self::new(key, config.base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn create_chat_completion(
        &self,
        request: &AnalysisRequest,
    ) -> Result<ChatCompletionResponse> {
        let body = request.to_openai_request()?;

        debug!(
            "Sending chat completion to {} with model {}",
            self.completions_url(),
            request.model
        );

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::upstream(status, upstream_message(status, &text)));
        }

        let bytes = response.bytes().await?;
        let parsed: CreateChatCompletionResponse = serde_json::from_slice(&bytes)?;

        debug!(
            "Received chat completion response with {} choices",
            parsed.choices.len()
        );

        Ok(parsed.into())
    }
}

/// Extracts `error.message` from an OpenAI-style error body, falling back to
/// the raw body and then the status reason.
fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<UpstreamErrorBody>(body) {
        return parsed.error.message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
