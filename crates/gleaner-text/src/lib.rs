//! Gleaner Text Extraction Layer
//!
//! Per-format adapters that turn an office document into plain text for the
//! model prompt. One adapter per [`DocType`]; all of them go through
//! [`extract`], which is the only entry point the orchestrator uses.
//!
//! Extraction is deliberately lossy: layout, styling, and merged-cell
//! structure are discarded, and merged cells may repeat their text. The
//! consumer is a language model, not a renderer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod pdf;
pub mod sheet;
pub mod word;

use gleaner_domain::DocType;
use std::path::Path;
use thiserror::Error;

/// Errors from the format adapters.
///
/// The orchestrator does not distinguish variants; any error means "text
/// extraction failed" for the item. Variants exist so the log stream can
/// name the underlying cause.
#[derive(Debug, Error)]
pub enum TextError {
    /// Filesystem-level read failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The .docx container is not a readable zip archive
    #[error("document archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The WordprocessingML payload is malformed
    #[error("document XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The workbook could not be opened or a sheet could not be read
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] calamine::Error),

    /// PDF text extraction failed
    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_extract::OutputError),
}

/// Extract plain text from `path` using the adapter for `doc_type`.
///
/// The caller is expected to have checked that `path` exists as a regular
/// file; this function goes straight to parsing.
pub fn extract(path: &Path, doc_type: DocType) -> Result<String, TextError> {
    tracing::debug!("extracting text from {} ({})", path.display(), doc_type);
    match doc_type {
        DocType::Word => word::extract(path),
        DocType::Excel => sheet::extract(path),
        DocType::Pdf => pdf::extract(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error_for_every_adapter() {
        let path = Path::new("/nonexistent/file.bin");
        assert!(extract(path, DocType::Word).is_err());
        assert!(extract(path, DocType::Excel).is_err());
        assert!(extract(path, DocType::Pdf).is_err());
    }
}
