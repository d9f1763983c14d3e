//! # mcqgen
//!
//! Generates multiple-choice questions from uploaded documents. A document is
//! stored under a unique key, its text is extracted and normalized, a prompt is
//! built around it and a single call to a configurable AI provider produces the
//! questions. The result can optionally be persisted as text and PDF artifacts.

pub mod artifacts;
pub mod errors;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod storage;
pub mod types;

pub use errors::{ArtifactError, ExtractError, McqError, PromptError};
pub use pipeline::{McqPipeline, McqPipelineBuilder};
pub use types::{
    DocumentKind, McqOutcome, McqRequest, McqResult, OutputArtifact, ProviderConfig,
    QuestionCount, StoredUpload, UploadedDocument,
};
