//! # AI Provider Factory
//!
//! Builds a boxed [`AiProvider`] from a [`ProviderConfig`]. The server calls this
//! once at startup; nothing here reads the environment directly, so the same
//! configuration always yields the same provider.

use crate::{
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
    types::ProviderConfig,
};
use tracing::info;

/// Creates an AI provider instance from its named configuration.
///
/// - `gemini` requires a non-empty `api_key`. The URL is derived from
///   `model_name` unless `api_url` is set.
/// - `local` requires `api_url`; the key is optional.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn AiProvider>, PromptError> {
    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = non_empty(config.api_key.as_deref())
                .ok_or_else(|| PromptError::MissingApiKey(name.to_string()))?;
            let api_url = non_empty(config.api_url.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| GeminiProvider::default_api_url(&config.model_name));
            info!("Configuring Gemini provider '{name}' with URL: {api_url}");
            Box::new(GeminiProvider::new(api_url, api_key.to_string())?)
        }
        "local" => {
            let api_url = non_empty(config.api_url.as_deref())
                .ok_or_else(|| PromptError::MissingApiUrl(name.to_string()))?;
            info!("Configuring local AI provider '{name}' with URL: {api_url}");
            Box::new(LocalAiProvider::new(
                api_url.to_string(),
                non_empty(config.api_key.as_deref()).map(str::to_string),
                Some(config.model_name.clone()),
            )?)
        }
        other => return Err(PromptError::UnsupportedProvider(other.to_string())),
    };

    Ok(provider)
}

// `${VAR}` substitution leaves unset variables as empty strings.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
