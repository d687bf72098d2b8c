//! Data models for API requests and storage.

/// Folder data types.
pub mod folder;
/// Prompt data types.
pub mod prompt;
/// Tag data types.
pub mod tag;

pub use folder::{CreateFolderRequest, Folder, UpdateFolderRequest};
pub use prompt::{CreatePromptRequest, Prompt, UpdatePromptRequest};
pub use tag::{CreateTagRequest, Tag, UpdateTagRequest};

use serde::{Deserialize, Serialize};

/// Full snapshot of the three entity collections, as returned by
/// `GET /api/prompts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub prompts: Vec<Prompt>,
    pub folders: Vec<Folder>,
    pub tags: Vec<Tag>,
}
