//! # mcqgen-pdf: PDF Plugin
//!
//! This crate provides PDF support for the `mcqgen` pipeline: an [`Extractor`]
//! that reads the text of every page, and an [`ArtifactRenderer`] that lays a
//! generation result out as a simple PDF document.

mod render;

pub use render::PdfRenderer;

use mcqgen::{
    extract::Extractor,
    DocumentKind, ExtractError,
};
use std::{panic, path::Path};
use thiserror::Error;
use tracing::debug;

// Re-exported so callers can name the trait without importing `mcqgen` paths.
pub use mcqgen::artifacts::ArtifactRenderer;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("Failed to read PDF file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),
}

impl From<PdfExtractError> for ExtractError {
    fn from(err: PdfExtractError) -> Self {
        match err {
            PdfExtractError::Io(e) => ExtractError::Io(e),
            PdfExtractError::PdfParse(s) => ExtractError::Parse(s),
        }
    }
}

// --- Core Extraction Logic ---

/// Extracts text from all pages of a PDF.
///
/// Glyphs are decoded through each font's encoding or `ToUnicode` map, so
/// Type0/CID fonts come out as readable text. Word and line breaks are
/// recovered from glyph positions: a horizontal gap wider than a fraction of
/// the font size becomes a space, and a move down to a new line becomes a
/// newline. Pages are joined with newlines in page order; a page without text
/// contributes nothing.
pub fn extract_text_from_pdf(pdf_data: &[u8]) -> Result<String, PdfExtractError> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(pdf_data))
        .map_err(|_| PdfExtractError::PdfParse("PDF decoder panicked".to_string()))?
        .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;

    let page_count = pages.len();
    let pages: Vec<String> = pages
        .into_iter()
        .enumerate()
        .filter_map(|(page_num, text)| {
            if text.trim().is_empty() {
                debug!("PDF page {page_num} yielded no text.");
                None
            } else {
                Some(text)
            }
        })
        .collect();

    debug!("Read text from {} of {page_count} PDF pages.", pages.len());
    Ok(pages.join("\n"))
}

// --- Extractor Implementation ---

/// The [`Extractor`] implementation for PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn extract_raw(&self, path: &Path) -> Result<String, ExtractError> {
        let data = std::fs::read(path).map_err(PdfExtractError::from)?;
        Ok(extract_text_from_pdf(&data)?)
    }
}
