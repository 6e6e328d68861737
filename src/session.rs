//! Single-session chat state driven by the front end.
//!
//! One `ChatSession` per conversation. Every event (typed message, upload,
//! clear) runs to completion before the next one is accepted, so state is
//! owned plainly and mutated through `&mut self`.

use std::path::Path;

use uuid::Uuid;

use crate::models::{DisplayMessage, Language};
use crate::pipeline::chat::{
    submit_loaded_upload, submit_upload, ConversationStore, Exchange, MedicalAssistant,
};
use crate::pipeline::extraction::{DocumentExtractor, UploadedFile};

pub struct ChatSession {
    id: Uuid,
    extractor: DocumentExtractor,
    assistant: MedicalAssistant,
    history: ConversationStore,
    language: Option<Language>,
    display: Vec<DisplayMessage>,
    input: String,
}

impl ChatSession {
    pub fn new(extractor: DocumentExtractor, assistant: MedicalAssistant) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, "Chat session started");
        Self {
            id,
            extractor,
            assistant,
            history: ConversationStore::new(),
            language: Some(Language::default()),
            display: Vec::new(),
            input: String::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn display(&self) -> &[DisplayMessage] {
        &self.display
    }

    pub fn history(&self) -> &ConversationStore {
        &self.history
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// `None` when the selector holds a value we do not recognize.
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Set the selector value. Unknown labels are kept as "no hint", not rejected.
    pub fn set_language(&mut self, label: &str) -> Option<Language> {
        self.language = Language::from_label(label);
        if self.language.is_none() {
            tracing::debug!(session_id = %self.id, "Unrecognized language label, no hint will be sent");
        }
        self.language
    }

    /// Text typed into the input box, not yet submitted.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// Submit typed text. Blank text is ignored and nothing is sent.
    pub fn submit_text(&mut self, text: &str) -> &[DisplayMessage] {
        if text.trim().is_empty() {
            tracing::debug!(session_id = %self.id, "Ignoring blank submission");
            return &self.display;
        }
        let history = std::mem::take(&mut self.history);
        let exchange = self.assistant.converse(text, history, self.language);
        self.apply(exchange)
    }

    /// Submit the contents of the input box.
    pub fn submit_input(&mut self) -> &[DisplayMessage] {
        let text = std::mem::take(&mut self.input);
        self.submit_text(&text)
    }

    /// Submit an uploaded document as the next question.
    pub fn upload(&mut self, file: Option<&UploadedFile>) -> &[DisplayMessage] {
        let history = std::mem::take(&mut self.history);
        let exchange = submit_upload(&self.extractor, &self.assistant, file, history, self.language);
        self.apply(exchange)
    }

    /// Read a document from disk and submit it. Read failures show up as a notice.
    pub fn upload_path(&mut self, path: &Path) -> &[DisplayMessage] {
        let loaded = UploadedFile::from_path(path);
        let history = std::mem::take(&mut self.history);
        let exchange =
            submit_loaded_upload(&self.extractor, &self.assistant, loaded, history, self.language);
        self.apply(exchange)
    }

    /// Reset display, history and input to empty.
    pub fn clear(&mut self) -> &[DisplayMessage] {
        self.history.clear();
        tracing::info!(session_id = %self.id, "Chat cleared");
        self.apply(Exchange::cleared())
    }

    fn apply(&mut self, exchange: Exchange) -> &[DisplayMessage] {
        self.display = exchange.display;
        self.history = exchange.history;
        self.input = exchange.input;
        &self.display
    }
}
