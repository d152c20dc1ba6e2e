pub mod health;

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Router,
};
use tower_http::services::ServeDir;

use crate::pages;
use crate::profile::handlers::{self, JsonBody};
use crate::profile::models::{Section, TextList};
use crate::state::AppState;

/// Routes for a position-addressed record collection, mounted under its
/// collection path.
fn record_routes(section: Section) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(move |State(state): State<AppState>| async move {
                handlers::list_records(&state, section).await
            })
            .post(move |State(state): State<AppState>, body: JsonBody| async move {
                handlers::create_record(&state, section, body).await
            }),
        )
        .route(
            "/:index",
            get(
                move |State(state): State<AppState>, Path(index): Path<String>| async move {
                    handlers::get_record(&state, section, &index).await
                },
            )
            .put(
                move |State(state): State<AppState>,
                      Path(index): Path<String>,
                      body: JsonBody| async move {
                    handlers::update_record(&state, section, &index, body).await
                },
            )
            .delete(
                move |State(state): State<AppState>, Path(index): Path<String>| async move {
                    handlers::delete_record(&state, section, &index).await
                },
            ),
        )
}

/// Routes for a string list: read, bulk replace, append, delete by index.
fn text_routes(list: TextList) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(move |State(state): State<AppState>| async move {
                handlers::list_texts(&state, list).await
            })
            .put(move |State(state): State<AppState>, body: JsonBody| async move {
                handlers::replace_texts(&state, list, body).await
            })
            .post(move |State(state): State<AppState>, body: JsonBody| async move {
                handlers::append_text(&state, list, body).await
            }),
        )
        .route(
            "/:index",
            delete(
                move |State(state): State<AppState>, Path(index): Path<String>| async move {
                    handlers::delete_text(&state, list, &index).await
                },
            ),
        )
}

/// Full application router. Paths no route claims are served from the
/// static directory, so `public/assets/x.png` answers at `/assets/x.png`.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(pages::handle_index))
        .route(
            "/formacao",
            get(|| async { pages::legacy_redirect("education") }),
        )
        .route(
            "/competencias",
            get(|| async { pages::legacy_redirect("skills") }),
        )
        .route("/social", get(|| async { pages::legacy_redirect("social") }))
        // JSON API
        .route("/api/dados", get(handlers::handle_get_document))
        .route(
            "/api/projetos",
            get(handlers::handle_list_projects).post(handlers::handle_create_project),
        )
        .route(
            "/api/projetos/:id",
            get(handlers::handle_get_project)
                .put(handlers::handle_update_project)
                .delete(handlers::handle_delete_project),
        )
        .route(
            "/api/presentation",
            get(handlers::handle_get_presentation).put(handlers::handle_update_presentation),
        )
        .nest("/api/education", record_routes(Section::Education))
        .nest("/api/certifications", record_routes(Section::Certifications))
        .nest("/api/social-links", record_routes(Section::SocialLinks))
        .nest(
            "/api/technical-skills",
            text_routes(TextList::TechnicalSkills),
        )
        .nest("/api/soft-skills", text_routes(TextList::SoftSkills))
        .nest("/api/languages", text_routes(TextList::Languages))
        .fallback_service(static_files)
        .with_state(state)
}
