//! # Generate Handler
//!
//! Accepts a multipart upload with a `file` part and an optional
//! `num_questions` part, runs the MCQ pipeline and renders the result page.

use super::{AppError, AppState};
use crate::{config::GenerationConfig, templates::render_page};
use axum::{extract::State, response::Html};
use axum_extra::extract::Multipart;
use mcqgen::{QuestionCount, UploadedDocument};
use tracing::{info, warn};

/// The handler for `POST /generate`.
pub async fn generate_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut document: Option<UploadedDocument> = None;
    let mut num_questions: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty, nameless part when no file was chosen.
                if file_name.is_empty() {
                    continue;
                }
                info!("Received upload '{}' ({} bytes).", file_name, bytes.len());
                document = Some(UploadedDocument::new(file_name, bytes.to_vec()));
            }
            "num_questions" => num_questions = Some(field.text().await?),
            _ => warn!("Ignoring unknown multipart field: {}", name),
        }
    }

    let document =
        document.ok_or_else(|| AppError::BadRequest("No file has been chosen!".to_string()))?;
    let generation = &app_state.config.generation;
    let count = parse_question_count(num_questions.as_deref(), generation)?;

    let outcome = app_state.pipeline.run(document, count).await?;

    Ok(Html(render_page(generation, Some(&outcome))))
}

/// Resolves the requested question count, falling back to the configured
/// default when the field is absent or blank.
fn parse_question_count(
    raw: Option<&str>,
    generation: &GenerationConfig,
) -> Result<QuestionCount, AppError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(QuestionCount::new(i64::from(generation.default_question_count))?);
    }

    let requested: i64 = raw.parse().map_err(|_| {
        AppError::BadRequest(format!(
            "The number of questions must be a whole number, got '{raw}'"
        ))
    })?;
    let count = QuestionCount::new(requested)?;

    if count.get() > generation.max_question_count {
        return Err(AppError::BadRequest(format!(
            "At most {} questions can be generated per request, got {}",
            generation.max_question_count, requested
        )));
    }
    Ok(count)
}
