//! # Output Artifacts
//!
//! Optional persisted copies of a generation result. Each renderer produces one
//! file in the results directory, named `generated_mcqs_<storage key>.<ext>`.
//! Writing is best effort: a renderer that fails is logged and skipped, and the
//! files already written by other renderers stay in place.

use crate::{
    errors::ArtifactError,
    types::OutputArtifact,
};
use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};

/// The fixed prefix of every artifact file name.
pub const ARTIFACT_PREFIX: &str = "generated_mcqs_";

/// Turns a result into the bytes of one output file format.
pub trait ArtifactRenderer: Send + Sync + Debug {
    /// The file extension of the rendered output, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, content: &str) -> Result<Vec<u8>, ArtifactError>;
}

/// Writes the result verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ArtifactRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, content: &str) -> Result<Vec<u8>, ArtifactError> {
        Ok(content.as_bytes().to_vec())
    }
}

/// The artifact file name for a storage key and extension.
pub fn artifact_file_name(key: &str, extension: &str) -> String {
    format!("{ARTIFACT_PREFIX}{key}.{extension}")
}

/// Writes results through every configured renderer.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    results_dir: PathBuf,
    renderers: Vec<Arc<dyn ArtifactRenderer>>,
}

impl ArtifactWriter {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
            renderers: Vec::new(),
        }
    }

    pub fn with_renderer<R: ArtifactRenderer + 'static>(mut self, renderer: R) -> Self {
        self.renderers.push(Arc::new(renderer));
        self
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Creates the results directory if it does not exist yet.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.results_dir).await
    }

    /// Renders and writes `content` with each renderer, returning the artifacts
    /// that were written successfully.
    pub async fn write_all(&self, key: &str, content: &str) -> Vec<OutputArtifact> {
        if let Err(e) = self.ensure_dirs().await {
            warn!(
                "Could not create results directory '{}': {e}. Skipping artifacts.",
                self.results_dir.display()
            );
            return Vec::new();
        }

        let mut written = Vec::with_capacity(self.renderers.len());
        for renderer in &self.renderers {
            match self.write_one(renderer.as_ref(), key, content).await {
                Ok(artifact) => {
                    info!("Wrote artifact '{}'.", artifact.path.display());
                    written.push(artifact);
                }
                Err(e) => warn!(
                    "Failed to write '{}' artifact for '{key}': {e}",
                    renderer.extension()
                ),
            }
        }
        written
    }

    async fn write_one(
        &self,
        renderer: &dyn ArtifactRenderer,
        key: &str,
        content: &str,
    ) -> Result<OutputArtifact, ArtifactError> {
        let bytes = renderer.render(content)?;
        let file_name = artifact_file_name(key, renderer.extension());
        let path = self.results_dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(OutputArtifact {
            kind: renderer.extension().to_string(),
            file_name,
            path,
        })
    }
}
