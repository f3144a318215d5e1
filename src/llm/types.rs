use async_openai::types::{
    ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    ImageUrlArgs,
};
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

/// Image bytes carried inline in the request as a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_type: String,
    pub data: String,
}

/// One single-turn vision request: a text instruction plus one image.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub model: String,
    pub instruction: String,
    pub image: InlineImage,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Choice {
    pub index: u32,
    pub content: Option<String>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl InlineImage {
    pub fn from_bytes(content_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            content_type: content_type.into(),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.data)
    }
}

impl AnalysisRequest {
    pub fn to_openai_request(&self) -> Result<CreateChatCompletionRequest, crate::Error> {
        let text = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(self.instruction.clone())
            .build()
            .map_err(|e| crate::Error::llm(format!("Failed to build text part: {}", e)))?;

        let image_url = ImageUrlArgs::default()
            .url(self.image.data_url())
            .build()
            .map_err(|e| crate::Error::llm(format!("Failed to build image url: {}", e)))?;

        let image = ChatCompletionRequestMessageContentPartImageArgs::default()
            .image_url(image_url)
            .build()
            .map_err(|e| crate::Error::llm(format!("Failed to build image part: {}", e)))?;

        let parts = vec![
            ChatCompletionRequestUserMessageContentPart::Text(text),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(image),
        ];

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(parts))
            .build()
            .map_err(|e| crate::Error::llm(format!("Failed to build user message: {}", e)))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message.into()])
            .max_tokens(self.max_tokens)
            .build()?;

        Ok(request)
    }
}

impl From<CreateChatCompletionResponse> for ChatCompletionResponse {
    fn from(response: CreateChatCompletionResponse) -> Self {
        let choices = response
            .choices
            .into_iter()
            .map(|choice| Choice {
                index: choice.index,
                content: choice.message.content,
                finish_reason: choice.finish_reason.map(|fr| format!("{fr:?}")),
            })
            .collect();

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Self {
            id: response.id,
            model: response.model,
            choices,
            usage,
        }
    }
}
