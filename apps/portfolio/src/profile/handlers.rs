use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::profile::models::{as_record, is_present, Document, Project, Record, Section, TextList};
use crate::state::AppState;

/// A missing or malformed JSON body reads as an empty object.
pub type JsonBody = Option<Json<Value>>;

fn body_value(body: JsonBody) -> Value {
    body.map(|Json(v)| v).unwrap_or(Value::Null)
}

fn body_record(body: JsonBody) -> Record {
    as_record(body_value(body))
}

const PROJECT_NOT_FOUND: &str = "Project not found";
const INVALID_INDEX: &str = "Invalid index";

/// GET /api/dados
pub async fn handle_get_document(State(state): State<AppState>) -> Json<Document> {
    Json(state.repo.document().await)
}

// ── Projects ────────────────────────────────────────────────────────────────

/// GET /api/projetos
pub async fn handle_list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    Json(state.repo.projects().await)
}

/// GET /api/projetos/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    state
        .repo
        .project(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.to_string()))
}

/// POST /api/projetos
/// Requires non-empty `title` and `description`; only the known project
/// fields are taken from the body.
pub async fn handle_create_project(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let body = body_record(body);
    if !is_present(body.get("title")) || !is_present(body.get("description")) {
        return Err(AppError::BadRequest(
            "Required fields: title, description".to_string(),
        ));
    }

    let fields: Record = body
        .into_iter()
        .filter(|(key, _)| matches!(key.as_str(), "title" | "description" | "imageUrl" | "link"))
        .collect();
    let created = state
        .repo
        .add_project(fields)
        .await?
        .ok_or_else(|| AppError::BadRequest("Project id space exhausted".to_string()))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/projetos/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Project>, AppError> {
    state
        .repo
        .update_project(&id, body_record(body))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.to_string()))
}

/// DELETE /api/projetos/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_project(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(PROJECT_NOT_FOUND.to_string()))
    }
}

// ── Presentation ────────────────────────────────────────────────────────────

/// GET /api/presentation
pub async fn handle_get_presentation(State(state): State<AppState>) -> Json<Record> {
    Json(state.repo.presentation().await)
}

/// PUT /api/presentation
pub async fn handle_update_presentation(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Record>, AppError> {
    let updated = state.repo.update_presentation(body_record(body)).await?;
    Ok(Json(updated))
}

// ── Position-addressed records (education, certifications, social links) ────

pub async fn list_records(state: &AppState, section: Section) -> Json<Vec<Value>> {
    Json(state.repo.records(section).await)
}

pub async fn get_record(
    state: &AppState,
    section: Section,
    index: &str,
) -> Result<Json<Value>, AppError> {
    state
        .repo
        .record(section, index)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(section.not_found_message().to_string()))
}

pub async fn create_record(
    state: &AppState,
    section: Section,
    body: JsonBody,
) -> Result<(StatusCode, Json<Record>), AppError> {
    let created = state.repo.add_record(section, body_record(body)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_record(
    state: &AppState,
    section: Section,
    index: &str,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    state
        .repo
        .update_record(section, index, body_record(body))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(section.not_found_message().to_string()))
}

pub async fn delete_record(
    state: &AppState,
    section: Section,
    index: &str,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_record(section, index).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(section.not_found_message().to_string()))
    }
}

// ── Text lists (technical skills, soft skills, languages) ───────────────────

pub async fn list_texts(state: &AppState, list: TextList) -> Json<Vec<String>> {
    Json(state.repo.texts(list).await)
}

/// Bulk replace. Accepts a bare array or `{ "list": [...] }`.
pub async fn replace_texts(
    state: &AppState,
    list: TextList,
    body: JsonBody,
) -> Result<Json<Vec<String>>, AppError> {
    let items = match body_value(body) {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove("list").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    let stored = state.repo.replace_texts(list, items).await?;
    Ok(Json(stored))
}

/// Appends the body's `skill` (or `language`) value; returns the whole list.
pub async fn append_text(
    state: &AppState,
    list: TextList,
    body: JsonBody,
) -> Result<(StatusCode, Json<Vec<String>>), AppError> {
    let item = body_record(body).remove(list.item_key());
    let stored = state.repo.push_text(list, item).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn delete_text(
    state: &AppState,
    list: TextList,
    index: &str,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_text(list, index).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(INVALID_INDEX.to_string()))
    }
}
