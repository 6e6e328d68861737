//! User-facing text for contained failures.
//!
//! Shared by the typed-message and upload paths.

use crate::pipeline::completion::CompletionError;

/// Prefix of an assistant turn synthesized from a backend failure.
pub const API_ERROR_PREFIX: &str = "API Error: ";

pub const UNSUPPORTED_FILE_NOTICE: &str = "Unsupported file type. Please upload PDF or image.";

pub const EMPTY_EXTRACTION_NOTICE: &str = "Could not extract any text.";

/// Reply text recorded when the completion call fails.
pub fn api_error_reply(error: &CompletionError) -> String {
    format!("{API_ERROR_PREFIX}{error}")
}

/// Notice for a document that could not be decoded or OCR'd.
pub fn unreadable_document_notice(detail: &str) -> String {
    format!("{EMPTY_EXTRACTION_NOTICE} ({detail})")
}
