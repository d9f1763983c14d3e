//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The configuration and the fully wired MCQ
//! pipeline are created once and shared, read-only, by every request handler.

use crate::config::AppConfig;
use mcqgen::{
    artifacts::{ArtifactWriter, TextRenderer},
    extract::ExtractorRegistry,
    prompts::mcq::McqPrompts,
    providers::{ai::AiProvider, factory::create_provider},
    storage::UploadStore,
    McqPipeline,
};
use std::sync::Arc;
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The generation pipeline, with its provider, extractors and storage.
    pub pipeline: Arc<McqPipeline>,
}

/// Builds the shared application state from the configuration.
///
/// The provider named by `generation.provider` is instantiated from the
/// `providers` map; a missing entry or an incomplete provider configuration
/// aborts startup.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let name = config.generation.provider.clone();
    let provider_config = config.providers.get(&name).ok_or_else(|| {
        anyhow::anyhow!("Provider '{name}' named by 'generation.provider' is not configured")
    })?;
    let ai_provider = create_provider(&name, provider_config)?;

    build_app_state_with_provider(config, ai_provider).await
}

/// Builds the shared application state around an already constructed provider.
///
/// Creates the upload and results directories so that the server starts with a
/// usable filesystem layout.
pub async fn build_app_state_with_provider(
    config: AppConfig,
    ai_provider: Box<dyn AiProvider>,
) -> anyhow::Result<AppState> {
    let pipeline = McqPipeline::builder(ai_provider)
        .extractors(build_extractors())
        .upload_store(UploadStore::new(&config.storage.upload_dir))
        .artifacts(build_artifact_writer(&config))
        .prompts(McqPrompts {
            system_prompt: config.generation.system_prompt.clone(),
            user_prompt_template: config.generation.user_prompt.clone(),
        })
        .keep_uploads(config.storage.keep_uploads)
        .build();

    pipeline.ensure_dirs().await?;
    // Downloads are served from here even when artifact writing is disabled.
    tokio::fs::create_dir_all(&config.storage.results_dir).await?;

    info!(
        "Upload directory: '{}', results directory: '{}'.",
        config.storage.upload_dir, config.storage.results_dir
    );

    Ok(AppState {
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
    })
}

fn build_extractors() -> ExtractorRegistry {
    let registry = ExtractorRegistry::with_builtin();
    #[cfg(feature = "pdf")]
    let registry = registry.register(mcqgen_pdf::PdfExtractor);
    #[cfg(feature = "docx")]
    let registry = registry.register(mcqgen_docx::DocxExtractor);
    registry
}

fn build_artifact_writer(config: &AppConfig) -> ArtifactWriter {
    let mut writer = ArtifactWriter::new(&config.storage.results_dir);
    if config.artifacts.text {
        writer = writer.with_renderer(TextRenderer);
    }
    if config.artifacts.pdf {
        #[cfg(feature = "pdf")]
        {
            writer = writer.with_renderer(mcqgen_pdf::PdfRenderer::default());
        }
        #[cfg(not(feature = "pdf"))]
        warn!("PDF artifacts are enabled but the server was built without the 'pdf' feature.");
    }
    if writer.is_empty() {
        warn!("No artifact renderers are enabled; results will not be downloadable.");
    }
    writer
}
