pub mod types;
pub mod format;
pub mod preprocess;
pub mod pdf;
pub mod ocr;
pub mod orchestrator;

pub use types::*;
pub use format::*;
pub use pdf::*;
pub use ocr::*;
pub use orchestrator::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported file type. Please upload PDF or image.")]
    UnsupportedFileType,

    #[error("Document could not be read: {0}")]
    CorruptDocument(String),

    #[error("OCR is not available: {0}")]
    OcrUnavailable(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("Tessdata not found at: {0}")]
    TessdataNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
