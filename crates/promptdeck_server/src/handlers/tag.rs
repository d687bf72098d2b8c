//! Tag HTTP handlers.

use crate::{error::HttpError, AppError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use promptdeck_core::models::{CreateTagRequest, Tag, UpdateTagRequest};

/// Create a new tag.
///
/// # Errors
/// Returns an error if the name is blank or storage fails.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), HttpError> {
    let tag = state.store.tags.create(req)?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Rename a tag.
///
/// # Errors
/// Returns 404 if the id is unknown, 400 if the new name is blank.
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, HttpError> {
    state
        .store
        .tags
        .update(&id, &req)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound.into())
}

/// Delete a tag by id.
///
/// No cascade: prompts keep the deleted tag id until they are updated.
///
/// # Errors
/// Returns 404 if the id is unknown.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    if state.store.tags.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound.into())
    }
}
