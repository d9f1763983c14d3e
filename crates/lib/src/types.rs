use crate::errors::McqError;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

/// The document formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Txt,
    Docx,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Pdf, DocumentKind::Txt, DocumentKind::Docx];

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Txt => "txt",
            DocumentKind::Docx => "docx",
        }
    }

    /// Resolves the kind from a file name by looking at the text after the last `.`.
    ///
    /// A name without a dot has no extension and is rejected.
    pub fn from_file_name(file_name: &str) -> Result<Self, McqError> {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => ext.parse(),
            None => Err(McqError::InvalidFileType(file_name.to_string())),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = McqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.trim().trim_start_matches('.').to_lowercase();
        DocumentKind::ALL
            .into_iter()
            .find(|kind| kind.extension() == ext)
            .ok_or_else(|| McqError::InvalidFileType(s.to_string()))
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A document as received from a client.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// An upload that has been written to the upload directory.
#[derive(Debug, Clone, Serialize)]
pub struct StoredUpload {
    /// The unique, sanitized storage key. Artifacts are named after it.
    pub key: String,
    pub kind: DocumentKind,
    pub path: PathBuf,
}

/// The requested number of questions. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionCount(u32);

impl QuestionCount {
    pub fn new(count: i64) -> Result<Self, McqError> {
        u32::try_from(count)
            .ok()
            .filter(|c| *c >= 1)
            .map(Self)
            .ok_or(McqError::InvalidQuestionCount(count))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The extracted text together with the number of questions to generate from it.
#[derive(Debug, Clone)]
pub struct McqRequest {
    pub text: String,
    pub question_count: QuestionCount,
}

/// The raw text returned by the generation provider. It is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct McqResult(pub String);

impl McqResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A persisted file derived from an [`McqResult`].
#[derive(Debug, Clone, Serialize)]
pub struct OutputArtifact {
    /// The renderer's file extension, e.g. `txt` or `pdf`.
    pub kind: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Everything a successful pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct McqOutcome {
    pub source: StoredUpload,
    pub result: McqResult,
    pub artifacts: Vec<OutputArtifact>,
}

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// The type of provider ("gemini" or "local").
    pub provider: String,
    /// The API URL. Optional for Gemini, where it is derived from the model name.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
}
