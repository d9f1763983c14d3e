//! # Upload Storage
//!
//! Uploaded file names are untrusted. Before any path is built from one it is
//! sanitized, and every upload gets a unique storage key so that concurrent
//! requests never write to the same file.

use crate::{
    errors::McqError,
    types::{DocumentKind, StoredUpload, UploadedDocument},
};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};
use tracing::info;
use uuid::Uuid;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("unsafe-char pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// The name used when sanitization leaves nothing behind.
pub const FALLBACK_FILE_NAME: &str = "upload";

/// Reduces an untrusted file name to a safe, single path component.
///
/// Directory parts are dropped, control characters removed, whitespace runs
/// become `_`, anything outside `[A-Za-z0-9._-]` is removed and leading `.`/`_`
/// are stripped.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let without_controls: String = base.chars().filter(|c| !c.is_control()).collect();
    let spaced = WHITESPACE.replace_all(without_controls.trim(), "_");
    let safe = UNSAFE_CHARS.replace_all(&spaced, "");
    let safe = safe.trim_start_matches(['.', '_']);

    if safe.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        safe.to_string()
    }
}

/// Derives a unique storage key from a file name: `<sanitized stem>-<8 hex chars>`.
pub fn storage_key(file_name: &str) -> String {
    let sanitized = sanitize_file_name(file_name);
    let stem = match sanitized.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => sanitized.as_str(),
    };
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{stem}-{}", &suffix[..8])
}

/// Persists uploads into a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_dirs(&self) -> Result<(), McqError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Writes the document under a fresh storage key.
    pub async fn save(
        &self,
        document: &UploadedDocument,
        kind: DocumentKind,
    ) -> Result<StoredUpload, McqError> {
        self.ensure_dirs().await?;
        let key = storage_key(&document.file_name);
        let path = self.dir.join(format!("{key}.{}", kind.extension()));
        tokio::fs::write(&path, &document.bytes).await?;
        info!(
            "Stored upload '{}' ({} bytes) as '{}'.",
            document.file_name,
            document.bytes.len(),
            path.display()
        );
        Ok(StoredUpload { key, kind, path })
    }

    /// Removes a stored upload. A file that is already gone is not an error.
    pub async fn remove(&self, upload: &StoredUpload) -> Result<(), McqError> {
        match tokio::fs::remove_file(&upload.path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
