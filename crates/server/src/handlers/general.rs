use super::AppState;
use crate::templates::render_page;
use axum::{extract::State, response::Html};

/// The handler for the root (`/`) endpoint: the upload form.
pub async fn index(State(app_state): State<AppState>) -> Html<String> {
    Html(render_page(&app_state.config.generation, None))
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
