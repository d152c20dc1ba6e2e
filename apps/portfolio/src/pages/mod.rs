pub mod render;

use axum::{extract::State, response::Html, response::Redirect};

use crate::state::AppState;

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Html<String> {
    let doc = state.repo.document().await;
    Html(render::render_page(&doc))
}

/// Former per-section pages now live as anchors on the index page.
pub fn legacy_redirect(anchor: &'static str) -> Redirect {
    Redirect::permanent(&format!("/#{anchor}"))
}
