//! Folder HTTP handlers.

use crate::{error::HttpError, AppError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use promptdeck_core::models::{CreateFolderRequest, Folder, UpdateFolderRequest};

/// Create a new folder.
///
/// # Errors
/// Returns an error if the name is blank or storage fails.
pub async fn create_folder(
    State(state): State<AppState>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>), HttpError> {
    let folder = state.store.folders.create(req)?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// Rename a folder.
///
/// # Errors
/// Returns 404 if the id is unknown, 400 if the new name is blank.
pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<Folder>, HttpError> {
    state
        .store
        .folders
        .update(&id, &req)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound.into())
}

/// Delete a folder by id.
///
/// Prompts filed under the folder are left untouched; their `folder_id`
/// dangles until updated.
///
/// # Errors
/// Returns 404 if the id is unknown.
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    if state.store.folders.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound.into())
    }
}
