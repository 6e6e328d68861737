//! Raster preparation ahead of OCR.
//!
//! Uploads arrive as PNG or JPEG. Truncated or mislabeled files surface here
//! as `CorruptDocument`; the OCR engine only ever receives PNG.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use tracing::debug;

use super::ExtractionError;

/// Maximum accepted image payload.
const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024; // 50 MB

/// Smallest valid PNG (1x1) is 67 bytes.
const MIN_IMAGE_BYTES: usize = 67;

/// Reject payloads that cannot be a real image before decoding.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<(), ExtractionError> {
    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(ExtractionError::CorruptDocument(
            "Image data too small to be valid".into(),
        ));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ExtractionError::CorruptDocument(format!(
            "Image data exceeds {}MB limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Decode an uploaded raster and re-encode it as PNG for the OCR engine.
pub fn prepare_for_ocr(image_bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    validate_image_bytes(image_bytes)?;

    let img = image::load_from_memory(image_bytes).map_err(|e| {
        ExtractionError::CorruptDocument(format!("Failed to decode image: {e}"))
    })?;

    let (width, height) = img.dimensions();
    debug!(width, height, "Decoded image for OCR");

    encode_png(&img)
}

/// Encode a decoded image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ExtractionError> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::CorruptDocument(format!("PNG encoding failed: {e}")))?;
    Ok(cursor.into_inner())
}
