pub mod types;
pub mod openrouter;

pub use types::*;
pub use openrouter::*;

use thiserror::Error;

/// Failure talking to the chat completion service.
///
/// Never surfaced as a Rust error past the assistant: it is rendered into
/// the reply text instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("Could not connect to completion service at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Completion service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Completion service reported an error: {0}")]
    Provider(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}
