use std::path::{Path, PathBuf};

use super::types::{OcrEngine, OcrPageResult};
use super::ExtractionError;

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct BundledTesseract {
    tessdata_dir: PathBuf,
    lang: String,
}

#[cfg(feature = "ocr")]
impl BundledTesseract {
    /// Initialize with a tessdata directory. English is the only required model;
    /// Hindi (Devanagari) is added when `hin.traineddata` is installed.
    pub fn new(tessdata_dir: &Path) -> Result<Self, ExtractionError> {
        if !tessdata_dir.join("eng.traineddata").exists() {
            return Err(ExtractionError::TessdataNotFound(tessdata_dir.to_path_buf()));
        }

        let lang = if tessdata_dir.join("hin.traineddata").exists() {
            tracing::info!("Hindi traineddata found, defaulting to eng+hin");
            "eng+hin".to_string()
        } else {
            tracing::info!(
                tessdata = %tessdata_dir.display(),
                "No Hindi traineddata found, using English only"
            );
            "eng".to_string()
        };

        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            lang,
        })
    }

    pub fn languages(&self) -> &str {
        &self.lang
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for BundledTesseract {
    fn ocr_image(&self, png_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        let tessdata_str = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| ExtractionError::OcrUnavailable("Invalid tessdata path".into()))?;

        let tess = tesseract::Tesseract::new(Some(tessdata_str), Some(&self.lang))
            .map_err(|e| ExtractionError::OcrUnavailable(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(png_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        let text = tess
            .get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        let confidence = tess.mean_text_conf().max(0) as f32 / 100.0;

        Ok(OcrPageResult { text, confidence })
    }
}

/// Stand-in engine used when Tesseract is not compiled in or its data is missing.
/// Every call fails with `OcrUnavailable`.
pub struct UnavailableOcrEngine {
    reason: String,
}

impl UnavailableOcrEngine {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl OcrEngine for UnavailableOcrEngine {
    fn ocr_image(&self, _png_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        Err(ExtractionError::OcrUnavailable(self.reason.clone()))
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    pub text: String,
    pub confidence: f32,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _png_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        Ok(OcrPageResult {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

/// Build the OCR engine, respecting feature flags.
///
/// `tessdata_override` wins over discovery. Falls back to `UnavailableOcrEngine`.
pub fn build_ocr_engine(tessdata_override: Option<&Path>) -> Box<dyn OcrEngine + Send + Sync> {
    #[cfg(feature = "ocr")]
    {
        let found = match tessdata_override {
            Some(dir) => Some(dir.to_path_buf()),
            None => find_tessdata_dir(),
        };
        match found.map(|dir| BundledTesseract::new(&dir).map(|e| (dir, e))) {
            Some(Ok((dir, engine))) => {
                tracing::info!(
                    tessdata = %dir.display(),
                    langs = engine.languages(),
                    "Tesseract OCR initialized"
                );
                return Box::new(engine);
            }
            Some(Err(e)) => tracing::warn!(error = %e, "Tesseract OCR unavailable"),
            None => tracing::warn!("Tesseract data not found, images will not be OCR'd"),
        }
        Box::new(UnavailableOcrEngine::new(
            "Tesseract data directory not found. Set TESSDATA_PREFIX or install tesseract-ocr-eng",
        ))
    }

    #[cfg(not(feature = "ocr"))]
    {
        if let Some(dir) = tessdata_override {
            tracing::warn!(
                tessdata = %dir.display(),
                "Built without the `ocr` feature, ignoring tessdata directory"
            );
        }
        tracing::info!("Image OCR unavailable in this build");
        Box::new(UnavailableOcrEngine::new(
            "this build was compiled without the `ocr` feature",
        ))
    }
}

/// Candidate tessdata locations, in priority order.
fn tessdata_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var("TESSDATA_PREFIX") {
        candidates.push(PathBuf::from(path));
    }
    candidates.extend(
        [
            "/usr/share/tesseract-ocr/5/tessdata",
            "/usr/share/tesseract-ocr/4.00/tessdata",
            "/usr/share/tessdata",
            "/usr/local/share/tessdata",
            "/opt/homebrew/share/tessdata",
        ]
        .iter()
        .map(PathBuf::from),
    );
    candidates
}

/// Locate a tessdata directory that holds at least the English model.
pub fn find_tessdata_dir() -> Option<PathBuf> {
    tessdata_candidates()
        .into_iter()
        .find(|p| p.join("eng.traineddata").exists())
}
