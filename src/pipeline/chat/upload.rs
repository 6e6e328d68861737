use super::assistant::{Exchange, MedicalAssistant};
use super::notices::{unreadable_document_notice, EMPTY_EXTRACTION_NOTICE, UNSUPPORTED_FILE_NOTICE};
use super::store::ConversationStore;
use crate::models::Language;
use crate::pipeline::extraction::{DocumentExtractor, ExtractionError, UploadedFile};

/// Why an upload could not be turned into a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    UnsupportedFileType,
    EmptyExtraction,
    /// Bytes could not be decoded, OCR could not run, or the file could not be read.
    CorruptDocument(String),
}

impl UploadFailure {
    pub fn notice(&self) -> String {
        match self {
            Self::UnsupportedFileType => UNSUPPORTED_FILE_NOTICE.to_string(),
            Self::EmptyExtraction => EMPTY_EXTRACTION_NOTICE.to_string(),
            Self::CorruptDocument(detail) => unreadable_document_notice(detail),
        }
    }
}

impl From<ExtractionError> for UploadFailure {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::UnsupportedFileType => Self::UnsupportedFileType,
            other => Self::CorruptDocument(other.to_string()),
        }
    }
}

/// Extract text from the upload and check that it is usable.
pub fn extract_question(
    extractor: &DocumentExtractor,
    file: Option<&UploadedFile>,
) -> Result<String, UploadFailure> {
    let text = extractor.extract(file)?;
    if text.trim().is_empty() {
        return Err(UploadFailure::EmptyExtraction);
    }
    Ok(text)
}

/// Submit an uploaded document as the user's message.
///
/// When nothing usable comes out of the file, the assistant is not called:
/// the result is a single notice and the history is returned unchanged.
pub fn submit_upload(
    extractor: &DocumentExtractor,
    assistant: &MedicalAssistant,
    file: Option<&UploadedFile>,
    history: ConversationStore,
    language: Option<Language>,
) -> Exchange {
    match extract_question(extractor, file) {
        Ok(text) => assistant.converse(&text, history, language),
        Err(failure) => {
            tracing::warn!(failure = ?failure, "Upload produced no usable text");
            Exchange::notice(failure.notice(), history)
        }
    }
}

/// Submit a file that first had to be read from disk. A read failure is
/// reported with its detail, the same way as an unreadable document.
pub fn submit_loaded_upload(
    extractor: &DocumentExtractor,
    assistant: &MedicalAssistant,
    loaded: Result<UploadedFile, ExtractionError>,
    history: ConversationStore,
    language: Option<Language>,
) -> Exchange {
    match loaded {
        Ok(file) => submit_upload(extractor, assistant, Some(&file), history, language),
        Err(e) => {
            let failure = UploadFailure::from(e);
            tracing::warn!(failure = ?failure, "Upload could not be read");
            Exchange::notice(failure.notice(), history)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::ImageOutputFormat;

    use super::*;
    use crate::models::{DisplayMessage, Turn};
    use crate::pipeline::completion::MockCompletionClient;
    use crate::pipeline::extraction::preprocess::tests::make_test_image;
    use crate::pipeline::extraction::{MockOcrEngine, MockPdfExtractor, UnavailableOcrEngine};

    fn history_of_two() -> ConversationStore {
        ConversationStore::from(vec![Turn::user("q1"), Turn::assistant("a1")])
    }

    fn setup(ocr_text: &str, pdf_pages: Vec<&str>) -> (DocumentExtractor, Arc<MockCompletionClient>, MedicalAssistant) {
        let extractor = DocumentExtractor::new(
            Box::new(MockOcrEngine::new(ocr_text, 0.9)),
            Box::new(MockPdfExtractor::with_pages(pdf_pages)),
        );
        let mock = Arc::new(MockCompletionClient::replying("Your hemoglobin is within range."));
        let assistant = MedicalAssistant::new(Box::new(Arc::clone(&mock)), "m", 0.7);
        (extractor, mock, assistant)
    }

    #[test]
    fn unsupported_file_gives_single_notice_and_same_history() {
        let (extractor, mock, assistant) = setup("unused", vec![]);
        let file = UploadedFile::new("results.txt", b"Hemoglobin 13".to_vec());

        let before = history_of_two();
        let exchange = submit_upload(&extractor, &assistant, Some(&file), before.clone(), None);

        assert_eq!(
            exchange.display,
            vec![DisplayMessage::assistant("Unsupported file type. Please upload PDF or image.")]
        );
        assert_eq!(exchange.history, before);
        assert_eq!(exchange.history.len(), 2);
        assert_eq!(exchange.input, "");
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn whitespace_only_extraction_gives_empty_notice() {
        let (extractor, mock, assistant) = setup(" \n\t \n", vec![]);
        let file = UploadedFile::new("blank.png", make_test_image(32, 32, ImageOutputFormat::Png));

        let before = history_of_two();
        let exchange = submit_upload(&extractor, &assistant, Some(&file), before.clone(), None);

        assert_eq!(
            exchange.display,
            vec![DisplayMessage::assistant("Could not extract any text.")]
        );
        assert_eq!(exchange.history, before);
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn no_file_is_empty_extraction() {
        let (extractor, mock, assistant) = setup("unused", vec![]);
        let exchange = submit_upload(&extractor, &assistant, None, ConversationStore::new(), None);
        assert_eq!(exchange.display.len(), 1);
        assert_eq!(exchange.display[0].content, EMPTY_EXTRACTION_NOTICE);
        assert!(exchange.history.is_empty());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn corrupt_image_gives_notice_with_detail() {
        let (extractor, mock, assistant) = setup("unused", vec![]);
        let file = UploadedFile::new("scan.jpg", vec![0x42; 300]);

        let exchange = submit_upload(&extractor, &assistant, Some(&file), ConversationStore::new(), None);

        assert_eq!(exchange.display.len(), 1);
        assert!(exchange.display[0].content.starts_with("Could not extract any text. ("));
        assert!(exchange.history.is_empty());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn ocr_unavailable_is_contained() {
        let extractor = DocumentExtractor::new(
            Box::new(UnavailableOcrEngine::new("no tesseract")),
            Box::new(MockPdfExtractor::empty()),
        );
        let mock = Arc::new(MockCompletionClient::replying("unused"));
        let assistant = MedicalAssistant::new(Box::new(Arc::clone(&mock)), "m", 0.7);
        let file = UploadedFile::new("scan.png", make_test_image(32, 32, ImageOutputFormat::Png));

        let exchange = submit_upload(&extractor, &assistant, Some(&file), ConversationStore::new(), None);

        assert!(exchange.display[0].content.contains("no tesseract"));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn extracted_pdf_text_is_submitted_as_user_message() {
        let (extractor, mock, assistant) = setup("unused", vec!["Hemoglobin: 13.5 g/dL\n", "Ref: 12-16"]);
        let file = UploadedFile::new("cbc.pdf", b"%PDF-fake".to_vec());

        let exchange = submit_upload(
            &extractor,
            &assistant,
            Some(&file),
            ConversationStore::new(),
            Some(Language::Hindi),
        );

        let turns = exchange.history.snapshot();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("Hemoglobin: 13.5 g/dL\nRef: 12-16"));
        assert_eq!(turns[1], Turn::assistant("Your hemoglobin is within range."));

        let sent = &mock.requests()[0];
        assert_eq!(
            sent.messages.last().unwrap().content(),
            "Hemoglobin: 13.5 g/dL\nRef: 12-16\n\nPlease respond in Hindi."
        );
    }

    #[test]
    fn extraction_errors_classify() {
        assert_eq!(
            UploadFailure::from(ExtractionError::UnsupportedFileType),
            UploadFailure::UnsupportedFileType
        );
        assert!(matches!(
            UploadFailure::from(ExtractionError::CorruptDocument("x".into())),
            UploadFailure::CorruptDocument(_)
        ));
        assert!(matches!(
            UploadFailure::from(ExtractionError::OcrProcessing("x".into())),
            UploadFailure::CorruptDocument(_)
        ));
    }

    #[test]
    fn unreadable_file_gives_notice_with_io_detail() {
        let (extractor, mock, assistant) = setup("unused", vec![]);
        let loaded = UploadedFile::from_path(std::path::Path::new("/nonexistent/cbc.pdf"));

        let before = history_of_two();
        let exchange = submit_loaded_upload(&extractor, &assistant, loaded, before.clone(), None);

        assert_eq!(exchange.display.len(), 1);
        let notice = &exchange.display[0].content;
        assert!(notice.starts_with("Could not extract any text. ("), "{notice}");
        assert!(notice.contains("I/O error"), "{notice}");
        assert_eq!(exchange.history, before);
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn loaded_file_is_submitted() {
        let (extractor, mock, assistant) = setup("unused", vec!["Ferritin 40 ng/mL"]);
        let loaded = Ok(UploadedFile::new("iron.pdf", b"%PDF".to_vec()));

        let exchange = submit_loaded_upload(&extractor, &assistant, loaded, ConversationStore::new(), None);

        assert_eq!(exchange.history.snapshot()[0], Turn::user("Ferritin 40 ng/mL"));
        assert_eq!(mock.requests().len(), 1);
    }
}
