use super::Extractor;
use crate::{errors::ExtractError, types::DocumentKind};
use std::path::Path;

/// Reads a plain-text document as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxtExtractor;

impl Extractor for TxtExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Txt
    }

    fn extract_raw(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| ExtractError::Parse(format!("document is not valid UTF-8: {e}")))
    }
}
