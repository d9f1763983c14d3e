//! # MCQ Request Pipeline
//!
//! Orchestrates one generation request end to end:
//! validate → store → extract → build prompt → generate → write artifacts.
//! Every step either succeeds or ends the request with an [`McqError`]; nothing
//! is retried. The pipeline holds no per-request state and can be shared
//! between concurrent requests.

use crate::{
    artifacts::ArtifactWriter,
    errors::McqError,
    extract::ExtractorRegistry,
    prompts::mcq::McqPrompts,
    providers::ai::AiProvider,
    storage::UploadStore,
    types::{DocumentKind, McqOutcome, McqRequest, McqResult, QuestionCount, UploadedDocument},
};
use tracing::{debug, info, instrument, warn};

/// The configured MCQ generation pipeline.
#[derive(Debug, Clone)]
pub struct McqPipeline {
    ai_provider: Box<dyn AiProvider>,
    extractors: ExtractorRegistry,
    store: UploadStore,
    artifacts: Option<ArtifactWriter>,
    prompts: McqPrompts,
    keep_uploads: bool,
}

/// Builds an [`McqPipeline`].
#[derive(Debug)]
pub struct McqPipelineBuilder {
    ai_provider: Box<dyn AiProvider>,
    extractors: ExtractorRegistry,
    store: UploadStore,
    artifacts: Option<ArtifactWriter>,
    prompts: McqPrompts,
    keep_uploads: bool,
}

impl McqPipelineBuilder {
    /// Starts a builder with the built-in extractors, an `uploads` directory,
    /// the default prompts and no artifacts.
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self {
            ai_provider,
            extractors: ExtractorRegistry::with_builtin(),
            store: UploadStore::new("uploads"),
            artifacts: None,
            prompts: McqPrompts::default(),
            keep_uploads: true,
        }
    }

    pub fn extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn upload_store(mut self, store: UploadStore) -> Self {
        self.store = store;
        self
    }

    /// Enables artifact writing. A writer without renderers disables it again.
    pub fn artifacts(mut self, writer: ArtifactWriter) -> Self {
        self.artifacts = (!writer.is_empty()).then_some(writer);
        self
    }

    pub fn prompts(mut self, prompts: McqPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Whether stored uploads are kept after extraction. Defaults to `true`.
    pub fn keep_uploads(mut self, keep: bool) -> Self {
        self.keep_uploads = keep;
        self
    }

    pub fn build(self) -> McqPipeline {
        McqPipeline {
            ai_provider: self.ai_provider,
            extractors: self.extractors,
            store: self.store,
            artifacts: self.artifacts,
            prompts: self.prompts,
            keep_uploads: self.keep_uploads,
        }
    }
}

impl McqPipeline {
    pub fn builder(ai_provider: Box<dyn AiProvider>) -> McqPipelineBuilder {
        McqPipelineBuilder::new(ai_provider)
    }

    pub fn upload_store(&self) -> &UploadStore {
        &self.store
    }

    pub fn artifact_writer(&self) -> Option<&ArtifactWriter> {
        self.artifacts.as_ref()
    }

    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    /// Creates the upload and results directories. Safe to call repeatedly.
    pub async fn ensure_dirs(&self) -> Result<(), McqError> {
        self.store.ensure_dirs().await?;
        if let Some(writer) = &self.artifacts {
            writer.ensure_dirs().await?;
        }
        Ok(())
    }

    /// Runs the full pipeline for one uploaded document.
    #[instrument(skip(self, document), fields(file_name = %document.file_name, count = %count))]
    pub async fn run(
        &self,
        document: UploadedDocument,
        count: QuestionCount,
    ) -> Result<McqOutcome, McqError> {
        // 1. Validate before anything touches the disk.
        let kind = DocumentKind::from_file_name(&document.file_name)?;

        // 2. Persist the upload under a unique key.
        let stored = self.store.save(&document, kind).await?;

        // 3. Extract and normalize.
        let extracted = self.extractors.extract_kind(&stored.path, kind).await;
        if !self.keep_uploads {
            if let Err(e) = self.store.remove(&stored).await {
                warn!("Failed to remove upload '{}': {e}", stored.path.display());
            }
        }
        let text = extracted?;

        // 4. Never send an empty document to the provider.
        if text.is_empty() {
            warn!("'{}' produced no text after extraction.", document.file_name);
            return Err(McqError::EmptyDocument);
        }

        let request = McqRequest {
            text,
            question_count: count,
        };

        // 5 & 6. Build the prompt and make the single generation call.
        let result = self.generate(&request).await?;

        // 7. Optional, best-effort artifacts.
        let artifacts = match &self.artifacts {
            Some(writer) => writer.write_all(&stored.key, result.as_str()).await,
            None => Vec::new(),
        };

        info!(
            "Generated MCQs for '{}' ({} artifacts).",
            stored.key,
            artifacts.len()
        );

        Ok(McqOutcome {
            source: stored,
            result,
            artifacts,
        })
    }

    /// Builds the prompt for an already extracted request and calls the provider once.
    pub async fn generate(&self, request: &McqRequest) -> Result<McqResult, McqError> {
        let user_prompt = self
            .prompts
            .user_prompt(&request.text, request.question_count.get());

        debug!(
            system_prompt = %self.prompts.system_prompt,
            user_prompt_len = user_prompt.len(),
            "--> Sending MCQ prompt to AI provider"
        );

        let response = self
            .ai_provider
            .generate(&self.prompts.system_prompt, &user_prompt)
            .await?;

        debug!("<-- Received {} characters of MCQs", response.len());
        Ok(McqResult(response))
    }
}
