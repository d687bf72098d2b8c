//! Tag collection operations.

use super::lock_poisoned;
use crate::error::AppError;
use crate::models::{CreateTagRequest, Tag, UpdateTagRequest};
use chrono::Utc;
use std::sync::RwLock;

/// In-memory tag collection.
///
/// Like folders, tag deletion does not cascade: prompts may carry dangling
/// tag ids afterwards and readers resolve them defensively.
#[derive(Default)]
pub struct TagStore {
    items: RwLock<Vec<Tag>>,
}

impl TagStore {
    pub fn list(&self) -> Result<Vec<Tag>, AppError> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.clone())
    }

    pub fn get(&self, id: &str) -> Result<Option<Tag>, AppError> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.iter().find(|t| t.id == id).cloned())
    }

    /// Create a tag.
    ///
    /// # Errors
    /// `BadRequest` when the name is empty after trimming.
    pub fn create(&self, req: CreateTagRequest) -> Result<Tag, AppError> {
        if req.name.trim().is_empty() {
            return Err(AppError::BadRequest("Tag name cannot be empty".to_string()));
        }
        let tag = Tag::new(req.name);
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        items.push(tag.clone());
        Ok(tag)
    }

    /// Rename a tag, refreshing `updated_at`.
    ///
    /// # Returns
    /// The updated tag, or `None` when the id is unknown.
    pub fn update(&self, id: &str, req: &UpdateTagRequest) -> Result<Option<Tag>, AppError> {
        if let Some(name) = &req.name {
            if name.trim().is_empty() {
                return Err(AppError::BadRequest("Tag name cannot be empty".to_string()));
            }
        }
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let Some(tag) = items.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &req.name {
            tag.name = name.clone();
        }
        tag.updated_at = Utc::now().max(tag.updated_at);
        Ok(Some(tag.clone()))
    }

    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let before = items.len();
        items.retain(|t| t.id != id);
        Ok(items.len() < before)
    }
}
