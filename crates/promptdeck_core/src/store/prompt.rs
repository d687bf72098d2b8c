//! Prompt collection operations.

use super::lock_poisoned;
use crate::error::AppError;
use crate::models::{CreatePromptRequest, Prompt, UpdatePromptRequest};
use chrono::Utc;
use std::sync::RwLock;

/// In-memory prompt collection.
#[derive(Default)]
pub struct PromptStore {
    items: RwLock<Vec<Prompt>>,
}

impl PromptStore {
    /// All prompts in insertion order.
    pub fn list(&self) -> Result<Vec<Prompt>, AppError> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.clone())
    }

    /// Look up a prompt by id.
    pub fn get(&self, id: &str) -> Result<Option<Prompt>, AppError> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.iter().find(|p| p.id == id).cloned())
    }

    /// Create a prompt, assigning id, `version = 1`, and timestamps.
    ///
    /// # Errors
    /// `BadRequest` when the title is empty after trimming.
    pub fn create(&self, req: CreatePromptRequest) -> Result<Prompt, AppError> {
        if req.title.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Prompt title cannot be empty".to_string(),
            ));
        }
        let prompt = Prompt::from_request(req);
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        items.push(prompt.clone());
        Ok(prompt)
    }

    /// Apply a partial update, incrementing `version` by exactly one and
    /// refreshing `updated_at`.
    ///
    /// # Returns
    /// The updated prompt, or `None` when the id is unknown.
    pub fn update(
        &self,
        id: &str,
        req: &UpdatePromptRequest,
    ) -> Result<Option<Prompt>, AppError> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let Some(prompt) = items.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        prompt.apply_updates(req);
        prompt.version += 1;
        // updated_at must never move backwards, even across a clock step.
        prompt.updated_at = Utc::now().max(prompt.updated_at);
        Ok(Some(prompt.clone()))
    }

    /// Hard-remove a prompt.
    ///
    /// # Returns
    /// `true` when a prompt was removed.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let before = items.len();
        items.retain(|p| p.id != id);
        Ok(items.len() < before)
    }
}
