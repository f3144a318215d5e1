use async_trait::async_trait;
use axum::http::StatusCode;
use mathlens_rust::{
    Error, Result,
    llm::{AnalysisRequest, ChatCompletionResponse, Choice, LlmClient, Usage},
};
use std::sync::{Arc, Mutex};

/// Mock LLM client for testing
#[derive(Debug)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<ChatCompletionResponse>>>,
    pub requests: Arc<Mutex<Vec<AnalysisRequest>>>,
    pub upstream_error: Option<(StatusCode, String)>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            upstream_error: None,
        }
    }

    pub fn with_responses(self, responses: Vec<ChatCompletionResponse>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn with_upstream_error(mut self, status: StatusCode, message: &str) -> Self {
        self.upstream_error = Some((status, message.to_string()));
        self
    }

    pub fn get_requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: &AnalysisRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some((status, message)) = &self.upstream_error {
            return Err(Error::upstream(*status, message.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::llm("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Client whose call panics, for exercising the last-resort handler.
pub struct PanickingLlmClient;

#[async_trait]
impl LlmClient for PanickingLlmClient {
    async fn create_chat_completion(
        &self,
        _request: &AnalysisRequest,
    ) -> Result<ChatCompletionResponse> {
        panic!("upstream client exploded");
    }
}

/// Create a completion response with a single assistant choice
pub fn create_mock_chat_response(content: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: "chatcmpl-mock".to_string(),
        model: "gpt-4o".to_string(),
        choices: vec![Choice {
            index: 0,
            content: Some(content.to_string()),
            finish_reason: Some("Stop".to_string()),
        }],
        usage: Some(Usage {
            prompt_tokens: 800,
            completion_tokens: 40,
            total_tokens: 840,
        }),
    }
}
