use serde::{Deserialize, Serialize};

use super::CompletionError;
use crate::models::Turn;

/// Request body for POST /chat/completions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub temperature: f32,
}

/// Response body from /chat/completions. Only the fields we read.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    /// Some providers answer 200 with an error object instead of choices.
    pub error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderError {
    pub message: String,
}

/// Chat completion client abstraction (allows mocking)
pub trait CompletionClient {
    /// Send the request and return the first choice's message content.
    fn complete(&self, request: &ChatCompletionRequest) -> Result<String, CompletionError>;
}

/// Pull `choices[0].message.content` out of a response body.
pub fn parse_completion_body(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    if let Some(err) = parsed.error {
        return Err(CompletionError::Provider(err.message));
    }

    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::MalformedResponse("response has no choices".into()))?
        .message
        .content
        .ok_or_else(|| CompletionError::MalformedResponse("first choice has no content".into()))
}
