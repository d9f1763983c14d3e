use super::{AppError, AppState};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use mcqgen::{artifacts::ARTIFACT_PREFIX, storage::sanitize_file_name};
use std::{io::ErrorKind, path::PathBuf};
use tracing::info;

/// The handler for `GET /download/{file_name}`.
///
/// Only plain artifact names from the results directory are served. A name
/// that would change under sanitization (directories, `..`, odd characters)
/// is rejected outright.
pub async fn download_handler(
    State(app_state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    if sanitize_file_name(&file_name) != file_name {
        return Err(AppError::BadRequest(format!(
            "Invalid file name '{file_name}'."
        )));
    }
    if !file_name.starts_with(ARTIFACT_PREFIX) {
        return Err(not_found(&file_name));
    }

    let path = PathBuf::from(&app_state.config.storage.results_dir).join(&file_name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found(&file_name)),
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    info!("Serving artifact '{}' ({} bytes).", file_name, bytes.len());

    let content_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn not_found(file_name: &str) -> AppError {
    AppError::NotFound(format!("File '{file_name}' was not found."))
}
