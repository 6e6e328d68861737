use std::sync::Mutex;

use super::types::{parse_completion_body, ChatCompletionRequest, CompletionClient};
use super::CompletionError;
use crate::config::CompletionConfig;

/// Blocking HTTP client for an OpenRouter-compatible chat completions endpoint.
pub struct OpenRouterClient {
    endpoint: String,
    api_key: zeroize::Zeroizing<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenRouterClient {
    pub fn new(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::ClientBuild(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: zeroize::Zeroizing::new(config.api_key().to_string()),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            CompletionError::Connection(self.endpoint.clone())
        } else {
            CompletionError::Http(e.to_string())
        }
    }
}

/// Longest error body kept in a `Status` error. The error text ends up in
/// the conversation and is sent back with every later request.
pub const MAX_ERROR_BODY_CHARS: usize = 500;

fn bounded_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Turn a raw status + body into the reply text or a typed failure.
pub fn interpret_response(status: u16, body: &str) -> Result<String, CompletionError> {
    if !(200..300).contains(&status) {
        return Err(CompletionError::Status {
            status,
            body: bounded_body(body),
        });
    }
    parse_completion_body(body)
}

impl CompletionClient for OpenRouterClient {
    fn complete(&self, request: &ChatCompletionRequest) -> Result<String, CompletionError> {
        tracing::info!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.as_str())
            .json(request)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| self.map_send_error(e))?;

        let reply = interpret_response(status, &body)?;
        tracing::info!(status, reply_length = reply.len(), "Chat completion received");
        Ok(reply)
    }
}

/// Mock completion client for testing. Replies with a fixed outcome and
/// records every request it receives.
pub struct MockCompletionClient {
    outcome: Result<String, CompletionError>,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl MockCompletionClient {
    pub fn replying(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CompletionError) -> Self {
        Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, request: &ChatCompletionRequest) -> Result<String, CompletionError> {
        if let Ok(mut recorded) = self.requests.lock() {
            recorded.push(request.clone());
        }
        self.outcome.clone()
    }
}

impl<C: CompletionClient + ?Sized> CompletionClient for std::sync::Arc<C> {
    fn complete(&self, request: &ChatCompletionRequest) -> Result<String, CompletionError> {
        (**self).complete(request)
    }
}
