//! # Application Configuration
//!
//! This module defines the configuration structure for the `mcqgen-server` and
//! the logic for loading it from a YAML file and environment variables.
//!
//! Layers, lowest precedence first:
//! 1. A YAML file with `${VAR}` placeholders substituted from the environment.
//! 2. Plain environment variables for top-level keys such as `PORT`.
//! 3. `MCQGEN_`-prefixed variables for nested keys, e.g.
//!    `MCQGEN_STORAGE__UPLOAD_DIR`.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use mcqgen::{
    prompts::mcq::{MCQ_SYSTEM_PROMPT, MCQ_USER_PROMPT},
    ProviderConfig,
};
use regex::Regex;
use serde::Deserialize;
use std::{collections::HashMap, env, fs, path::Path, sync::LazyLock};
use thiserror::Error;
use tracing::info;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("placeholder pattern is valid")
});

/// A custom error type for configuration issues.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate or an invalid value.
    #[error("Configuration error: {0}")]
    General(String),
    /// Indicates a required configuration file was not found.
    #[error("{0}")]
    NotFound(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    /// A map of named, reusable AI provider configurations.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_port() -> u16 {
    9090
}

/// Where uploads and generated artifacts live on disk.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub results_dir: String,
    /// Keep the uploaded file after its text has been extracted.
    pub keep_uploads: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            results_dir: "results".to_string(),
            keep_uploads: true,
        }
    }
}

/// Which downloadable artifacts are written for each result.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub text: bool,
    pub pdf: bool,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            text: true,
            pdf: true,
        }
    }
}

/// The provider and prompts used for question generation.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    /// The key of the provider to use from the `providers` map.
    pub provider: String,
    /// Used when a request does not say how many questions it wants.
    pub default_question_count: u32,
    pub max_question_count: u32,
    pub system_prompt: String,
    /// Template with `{count}` and `{text}` placeholders.
    pub user_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "gemini_default".to_string(),
            default_question_count: 5,
            max_question_count: 50,
            system_prompt: MCQ_SYSTEM_PROMPT.to_string(),
            user_prompt: MCQ_USER_PROMPT.to_string(),
        }
    }
}

impl AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;
        if generation.max_question_count == 0 {
            return Err(ConfigError::General(
                "generation.max_question_count must be at least 1".to_string(),
            ));
        }
        if generation.default_question_count == 0
            || generation.default_question_count > generation.max_question_count
        {
            return Err(ConfigError::General(format!(
                "generation.default_question_count must be between 1 and {}, got {}",
                generation.max_question_count, generation.default_question_count
            )));
        }
        Ok(())
    }
}

// Reads a file and substitutes `${VAR}` placeholders with environment values.
// Unset variables become empty strings. Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded_content = ENV_PLACEHOLDER.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.into_owned()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Without an explicit path, `config.yml` next to this crate's manifest is used
/// when present, otherwise `config.<AI_PROVIDER>.yml` (`gemini` by default).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");

    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let user_config_path = format!("{base_path}/config.yml");
        if Path::new(&user_config_path).exists() {
            info!("Loading user-defined configuration from '{user_config_path}'.");
            user_config_path
        } else {
            let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
            let fallback_path = format!("{base_path}/config.{provider}.yml");
            info!("'{user_config_path}' not found. Falling back to '{fallback_path}' based on AI_PROVIDER='{provider}'.");
            fallback_path
        }
    };

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'. Please ensure 'config.yml' exists or set AI_PROVIDER to 'gemini' or 'local'."
        ))
    })?;

    let settings = ConfigBuilder::builder()
        .add_source(File::from_str(&main_content, FileFormat::Yaml))
        // Top-level keys like PORT.
        .add_source(Environment::default())
        // Nested keys, e.g. MCQGEN_GENERATION__DEFAULT_QUESTION_COUNT.
        .add_source(
            Environment::with_prefix("MCQGEN")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
