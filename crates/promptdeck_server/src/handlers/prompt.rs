//! Prompt HTTP handlers.

use crate::{error::HttpError, AppError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use promptdeck_core::models::{CreatePromptRequest, Prompt, Snapshot, UpdatePromptRequest};

fn check_content_size(state: &AppState, content: &str) -> Result<(), HttpError> {
    if content.len() > state.config.max_prompt_size {
        return Err(AppError::BadRequest(format!(
            "Prompt content exceeds maximum of {} bytes",
            state.config.max_prompt_size
        ))
        .into());
    }
    Ok(())
}

/// Fetch the full `{prompts, folders, tags}` snapshot.
///
/// # Errors
/// Returns an error if any collection cannot be read.
pub async fn snapshot(State(state): State<AppState>) -> Result<Json<Snapshot>, HttpError> {
    Ok(Json(state.store.snapshot()?))
}

/// Create a new prompt.
///
/// The server assigns id, `version = 1`, timestamps, and avatar/color
/// defaults; the response body is the created prompt.
///
/// # Errors
/// Returns an error if validation or storage fails.
pub async fn create_prompt(
    State(state): State<AppState>,
    Json(req): Json<CreatePromptRequest>,
) -> Result<(StatusCode, Json<Prompt>), HttpError> {
    check_content_size(&state, &req.content)?;
    let prompt = state.store.prompts.create(req)?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

/// Partially update an existing prompt.
///
/// # Errors
/// Returns 404 if the id is unknown, or an error if validation or storage
/// fails.
pub async fn update_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePromptRequest>,
) -> Result<Json<Prompt>, HttpError> {
    if let Some(content) = &req.content {
        check_content_size(&state, content)?;
    }
    state
        .store
        .prompts
        .update(&id, &req)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound.into())
}

/// Delete a prompt by id.
///
/// # Errors
/// Returns 404 if the id is unknown.
pub async fn delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    if state.store.prompts.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound.into())
    }
}
