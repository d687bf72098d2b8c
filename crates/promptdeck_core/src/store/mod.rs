//! In-memory entity store.
//!
//! The server process owns the canonical collections; clients only ever hold
//! a cache of the last snapshot they fetched. There is no persistence and no
//! cross-request serialization beyond the per-collection locks, so two
//! concurrent writers to the same entity race last-write-wins.

/// Folder collection.
pub mod folder;
/// Prompt collection.
pub mod prompt;
/// Tag collection.
pub mod tag;

pub use folder::FolderStore;
pub use prompt::PromptStore;
pub use tag::TagStore;

use crate::error::AppError;
use crate::models::{CreateFolderRequest, CreatePromptRequest, CreateTagRequest, Snapshot};

#[cfg(test)]
mod tests;

/// Handle bundling the three entity collections.
#[derive(Default)]
pub struct Store {
    pub prompts: PromptStore,
    pub folders: FolderStore,
    pub tags: TagStore,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full copy of all three collections, in insertion order.
    ///
    /// # Errors
    /// Returns a storage error if any collection lock is poisoned.
    pub fn snapshot(&self) -> Result<Snapshot, AppError> {
        Ok(Snapshot {
            prompts: self.prompts.list()?,
            folders: self.folders.list()?,
            tags: self.tags.list()?,
        })
    }

    /// Populate the store with one sample prompt, folder, and tag.
    ///
    /// Mirrors the sample data a fresh server ships with so the UI has
    /// something to show before the first user-created record.
    ///
    /// # Errors
    /// Propagates validation or lock errors from the create operations.
    pub fn seed_sample_data(&self) -> Result<(), AppError> {
        let folder = self.folders.create(CreateFolderRequest {
            name: "Getting started".to_string(),
        })?;
        let tag = self.tags.create(CreateTagRequest {
            name: "example".to_string(),
        })?;
        self.prompts.create(CreatePromptRequest {
            title: "Example prompt".to_string(),
            content: "Describe the task, the audience, and the output format.".to_string(),
            folder_id: Some(folder.id),
            tags: vec![tag.id],
            ..CreatePromptRequest::default()
        })?;
        Ok(())
    }
}

/// Map a poisoned-lock failure to a storage error instead of panicking.
pub(crate) fn lock_poisoned() -> AppError {
    AppError::StorageMessage("entity collection lock poisoned".to_string())
}
