use super::format::{FileKind, UploadedFile};
use super::preprocess::prepare_for_ocr;
use super::types::{OcrEngine, PdfExtractor};
use super::ExtractionError;

/// Routes an uploaded file to OCR or PDF text extraction.
/// Uses trait objects for OCR and PDF extraction, enabling dependency injection.
pub struct DocumentExtractor {
    ocr_engine: Box<dyn OcrEngine + Send + Sync>,
    pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
}

impl DocumentExtractor {
    pub fn new(
        ocr_engine: Box<dyn OcrEngine + Send + Sync>,
        pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
    ) -> Self {
        Self {
            ocr_engine,
            pdf_extractor,
        }
    }

    /// Extract the text of an upload.
    ///
    /// No file is a no-op and yields empty text. The returned text is not
    /// trimmed or normalized; deciding whether it is usable is the caller's job.
    pub fn extract(&self, file: Option<&UploadedFile>) -> Result<String, ExtractionError> {
        let Some(file) = file else {
            return Ok(String::new());
        };

        let kind = file.kind();
        tracing::info!(
            kind = kind.as_str(),
            size_bytes = file.bytes.len(),
            "Starting text extraction"
        );

        let text = match kind {
            FileKind::Image => {
                let png = prepare_for_ocr(&file.bytes)?;
                let result = self.ocr_engine.ocr_image(&png)?;
                tracing::debug!(confidence = result.confidence, "OCR complete");
                result.text
            }
            FileKind::Pdf => {
                let pages = self.pdf_extractor.extract_pages(&file.bytes)?;
                tracing::debug!(pages = pages.len(), "PDF pages extracted");
                pages.concat()
            }
            FileKind::Unsupported => {
                tracing::warn!("Rejected upload with unsupported extension");
                return Err(ExtractionError::UnsupportedFileType);
            }
        };

        tracing::info!(
            kind = kind.as_str(),
            text_length = text.len(),
            "Text extraction complete"
        );

        Ok(text)
    }
}
