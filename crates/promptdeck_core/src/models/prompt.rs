//! Prompt data models and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Icon key assigned when a create request omits one.
pub const DEFAULT_AVATAR: &str = "Book";
/// Background color token assigned when a create request omits one.
pub const DEFAULT_BG_COLOR: &str = "#E9D5FF";

/// A stored prompt, as kept by the server and returned by the API.
///
/// `version` starts at 1 and increments by exactly one on every successful
/// update. `tags` holds tag ids; order is irrelevant and dangling ids are
/// allowed after a tag deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub content: String,
    pub version: u64,
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub avatar: String,
    pub bg_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub avatar: Option<String>,
    pub bg_color: Option<String>,
}

/// Request payload for partially updating a prompt.
///
/// An empty `folder_id` string clears the folder assignment; an absent field
/// leaves it unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromptRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

impl Prompt {
    /// Build a new prompt from a create request, assigning id, version 1,
    /// timestamps, and avatar/color defaults.
    pub fn from_request(req: CreatePromptRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            content: req.content,
            version: 1,
            folder_id: req.folder_id.filter(|id| !id.is_empty()),
            tags: req.tags,
            is_favorite: req.is_favorite,
            avatar: req
                .avatar
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            bg_color: req
                .bg_color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BG_COLOR.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place, without touching `version` or
    /// `updated_at` (the store owns those).
    pub fn apply_updates(&mut self, req: &UpdatePromptRequest) {
        if let Some(title) = &req.title {
            self.title = title.clone();
        }
        if let Some(content) = &req.content {
            self.content = content.clone();
        }
        if let Some(folder_id) = &req.folder_id {
            self.folder_id = if folder_id.is_empty() {
                None
            } else {
                Some(folder_id.clone())
            };
        }
        if let Some(tags) = &req.tags {
            self.tags = tags.clone();
        }
        if let Some(is_favorite) = req.is_favorite {
            self.is_favorite = is_favorite;
        }
        if let Some(avatar) = &req.avatar {
            self.avatar = avatar.clone();
        }
        if let Some(bg_color) = &req.bg_color {
            self.bg_color = bg_color.clone();
        }
    }
}
