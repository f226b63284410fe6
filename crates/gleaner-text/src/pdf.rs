//! PDF text extraction
//!
//! Ordinary text-layer extraction, pages in order, joined with line
//! breaks. Scanned or image-only pages contribute nothing; OCR is out of
//! scope.

use crate::TextError;
use std::path::Path;

/// Extract the text layer of a PDF.
pub fn extract(path: &Path) -> Result<String, TextError> {
    let text = pdf_extract::extract_text(path)?;
    Ok(text)
}
