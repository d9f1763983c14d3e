use crate::types::DocumentKind;
use thiserror::Error;

/// Errors raised while talking to a generation provider.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider returned no text")]
    EmptyResponse,
    #[error("API key is missing for provider '{0}'")]
    MissingApiKey(String),
    #[error("API URL is missing for provider '{0}'")]
    MissingApiUrl(String),
    #[error("Unsupported AI provider type '{0}'")]
    UnsupportedProvider(String),
}

/// A generic error type for extractor plugins.
///
/// Each plugin maps its own failures (PDF parse errors, broken DOCX archives, ...)
/// into these variants so the pipeline can report them uniformly.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read the document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the document: {0}")]
    Parse(String),

    #[error("An unexpected internal error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Errors raised by an artifact renderer.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to render artifact: {0}")]
    Render(String),
}

/// The terminal error of a single MCQ generation request.
#[derive(Error, Debug)]
pub enum McqError {
    #[error("Invalid file type '{0}'. Allowed types are: pdf, txt, docx")]
    InvalidFileType(String),
    #[error("No extractor is available for '{0}' documents")]
    UnsupportedFormat(DocumentKind),
    #[error("Failed to extract text from '{file}': {source}")]
    Extraction {
        file: String,
        #[source]
        source: ExtractError,
    },
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("The document does not contain any extractable text")]
    EmptyDocument,
    #[error("The number of questions must be at least 1, got {0}")]
    InvalidQuestionCount(i64),
    #[error("Question generation failed: {0}")]
    Generation(#[from] PromptError),
}
