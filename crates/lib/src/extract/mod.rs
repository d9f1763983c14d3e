//! # Text Extraction
//!
//! Turns a stored document into a single normalized block of text. Each document
//! kind is handled by an [`Extractor`]; plain text is built in, PDF and DOCX
//! extractors live in the `mcqgen-pdf` and `mcqgen-docx` plugin crates and are
//! registered by the caller.

pub mod txt;

use crate::{
    errors::{ExtractError, McqError},
    types::DocumentKind,
};
use regex::Regex;
use std::{
    collections::HashMap,
    fmt::Debug,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock},
};
use tracing::{debug, info};

pub use txt::TxtExtractor;

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline pattern is valid"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));

/// A trait for reading the raw text out of one kind of document.
///
/// Implementations do blocking I/O and may be CPU heavy; the registry runs them
/// on the blocking thread pool.
pub trait Extractor: Send + Sync + Debug {
    /// The document kind this extractor understands.
    fn kind(&self) -> DocumentKind;

    /// Reads the document at `path` and returns its unnormalized text.
    fn extract_raw(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Drops non-whitespace control characters, collapses newline runs to a space,
/// then any remaining whitespace runs to a single space, then trims.
pub fn normalize_text(raw: &str) -> String {
    let printable: String = raw
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let text = NEWLINE_RUNS.replace_all(&printable, " ");
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

/// The set of extractors available to a pipeline, keyed by document kind.
#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentKind, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that already knows plain text.
    pub fn with_builtin() -> Self {
        Self::new().register(TxtExtractor)
    }

    /// Adds an extractor, replacing any previous one for the same kind.
    pub fn register<E: Extractor + 'static>(mut self, extractor: E) -> Self {
        self.extractors.insert(extractor.kind(), Arc::new(extractor));
        self
    }

    pub fn supports(&self, kind: DocumentKind) -> bool {
        self.extractors.contains_key(&kind)
    }

    /// Extracts and normalizes the text of a document whose kind is known.
    pub async fn extract_kind(&self, path: &Path, kind: DocumentKind) -> Result<String, McqError> {
        let extractor = self
            .extractors
            .get(&kind)
            .cloned()
            .ok_or(McqError::UnsupportedFormat(kind))?;

        info!("Extracting text from '{}' as {kind}.", path.display());
        let owned_path: PathBuf = path.to_path_buf();
        let raw = tokio::task::spawn_blocking(move || extractor.extract_raw(&owned_path))
            .await
            .map_err(|e| extraction_error(path, ExtractError::Internal(e.into())))?
            .map_err(|e| extraction_error(path, e))?;

        let text = normalize_text(&raw);
        debug!(
            raw_len = raw.len(),
            normalized_len = text.len(),
            "Normalized extracted text"
        );
        Ok(text)
    }

    /// Extracts and normalizes the text of the document at `path`.
    ///
    /// `extension` must name one of the accepted document kinds; anything else is
    /// rejected with [`McqError::InvalidFileType`] before the file is touched.
    pub async fn extract(&self, path: &Path, extension: &str) -> Result<String, McqError> {
        let kind: DocumentKind = extension.parse()?;
        self.extract_kind(path, kind).await
    }
}

fn extraction_error(path: &Path, source: ExtractError) -> McqError {
    McqError::Extraction {
        file: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        source,
    }
}
