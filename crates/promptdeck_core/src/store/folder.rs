//! Folder collection operations.

use super::lock_poisoned;
use crate::error::AppError;
use crate::models::{CreateFolderRequest, Folder, UpdateFolderRequest};
use chrono::Utc;
use std::sync::RwLock;

/// In-memory folder collection.
///
/// Deleting a folder does not cascade to prompts; a prompt keeps its
/// `folder_id` until it is updated, and readers must treat a missing folder
/// as unfiled.
#[derive(Default)]
pub struct FolderStore {
    items: RwLock<Vec<Folder>>,
}

impl FolderStore {
    pub fn list(&self) -> Result<Vec<Folder>, AppError> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.clone())
    }

    pub fn get(&self, id: &str) -> Result<Option<Folder>, AppError> {
        let items = self.items.read().map_err(|_| lock_poisoned())?;
        Ok(items.iter().find(|f| f.id == id).cloned())
    }

    /// Create a folder.
    ///
    /// # Errors
    /// `BadRequest` when the name is empty after trimming.
    pub fn create(&self, req: CreateFolderRequest) -> Result<Folder, AppError> {
        if req.name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Folder name cannot be empty".to_string(),
            ));
        }
        let folder = Folder::new(req.name);
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        items.push(folder.clone());
        Ok(folder)
    }

    /// Rename a folder, refreshing `updated_at`.
    ///
    /// # Returns
    /// The updated folder, or `None` when the id is unknown.
    pub fn update(
        &self,
        id: &str,
        req: &UpdateFolderRequest,
    ) -> Result<Option<Folder>, AppError> {
        if let Some(name) = &req.name {
            if name.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "Folder name cannot be empty".to_string(),
                ));
            }
        }
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let Some(folder) = items.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &req.name {
            folder.name = name.clone();
        }
        folder.updated_at = Utc::now().max(folder.updated_at);
        Ok(Some(folder.clone()))
    }

    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut items = self.items.write().map_err(|_| lock_poisoned())?;
        let before = items.len();
        items.retain(|f| f.id != id);
        Ok(items.len() < before)
    }
}
