use super::types::PdfExtractor;
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages yield empty text.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        // pdf-extract panics on some malformed font and xref tables.
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        }));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractionError::CorruptDocument(format!(
                "PDF parsing failed: {e}"
            ))),
            Err(_) => Err(ExtractionError::CorruptDocument(
                "PDF parser aborted on malformed input".into(),
            )),
        }
    }
}

/// Mock PDF extractor returning fixed pages.
pub struct MockPdfExtractor {
    pages: Vec<String>,
}

impl MockPdfExtractor {
    pub fn with_pages(pages: Vec<&str>) -> Self {
        Self {
            pages: pages.into_iter().map(String::from).collect(),
        }
    }

    pub fn empty() -> Self {
        Self { pages: vec![] }
    }
}

impl PdfExtractor for MockPdfExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Ok(self.pages.clone())
    }
}
