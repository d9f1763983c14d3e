//! # `mcqgen-docx`: Word Document Plugin
//!
//! Reads the paragraph text of `.docx` files for the `mcqgen` pipeline. A
//! `.docx` file is a ZIP archive of XML parts; `docx-rs` parses it into a typed
//! tree of paragraphs, runs and text nodes.

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use mcqgen::{extract::Extractor, DocumentKind, ExtractError};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Custom error types for DOCX extraction.
#[derive(Error, Debug)]
pub enum DocxExtractError {
    #[error("Failed to read DOCX file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse DOCX content: {0}")]
    DocxParse(String),
}

impl From<DocxExtractError> for ExtractError {
    fn from(err: DocxExtractError) -> Self {
        match err {
            DocxExtractError::Io(e) => ExtractError::Io(e),
            DocxExtractError::DocxParse(s) => ExtractError::Parse(s),
        }
    }
}

/// Extracts the paragraph texts of a DOCX document, joined with newlines in
/// document order. Tables, images and other non-paragraph content are skipped.
pub fn extract_text_from_docx(data: &[u8]) -> Result<String, DocxExtractError> {
    let docx = read_docx(data).map_err(|e| DocxExtractError::DocxParse(format!("{e:?}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    debug!("Read {} paragraphs from DOCX.", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

/// Runs in a paragraph belong to the same sentence, so they are joined without a separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&para.children, &mut text);
    text
}

/// Hyperlinks wrap their own runs, so their children are walked the same way.
fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            _ => {}
        }
    }
}

/// The [`Extractor`] implementation for DOCX documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl Extractor for DocxExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn extract_raw(&self, path: &Path) -> Result<String, ExtractError> {
        let data = std::fs::read(path).map_err(DocxExtractError::from)?;
        Ok(extract_text_from_docx(&data)?)
    }
}
