//! Export document and import parsing.
//!
//! Export produces a self-contained JSON document. Import validates the
//! whole document up front and yields a plan of records to re-create through
//! the normal create operations; imported ids are discarded and folder/tag
//! references are carried by name so they can be remapped to the fresh ids.

use crate::models::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Format marker written into every export document.
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// Backup document: the full snapshot plus export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportDocument {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            export_date: Utc::now(),
            version: EXPORT_FORMAT_VERSION.to_string(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Import rejection reasons. Any of these means zero records were created.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing '{0}' collection")]
    MissingCollection(&'static str),

    #[error("'{0}' is not an array")]
    NotAnArray(&'static str),
}

/// A prompt record ready to re-create, with folder/tag references by name.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPrompt {
    pub title: String,
    pub content: String,
    pub folder_name: Option<String>,
    pub tag_names: Vec<String>,
    pub is_favorite: bool,
    pub avatar: Option<String>,
    pub bg_color: Option<String>,
}

/// Validated import plan. `skipped` counts records dropped for missing or
/// blank required fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub folders: Vec<String>,
    pub tags: Vec<String>,
    pub prompts: Vec<PlannedPrompt>,
    pub skipped: usize,
}

/// Parse and validate an export document.
///
/// The whole document is checked before anything is returned, so a malformed
/// file never results in a partial import.
///
/// # Errors
/// Returns an [`ImportError`] when the document is not JSON or any of the
/// three collections is missing or not an array.
pub fn parse_import(raw: &str) -> Result<ImportPlan, ImportError> {
    let doc: Value = serde_json::from_str(raw)?;
    let prompts = collection(&doc, "prompts")?;
    let folders = collection(&doc, "folders")?;
    let tags = collection(&doc, "tags")?;

    let mut plan = ImportPlan::default();
    let mut folder_names_by_id: HashMap<String, String> = HashMap::new();
    let mut tag_names_by_id: HashMap<String, String> = HashMap::new();

    for entry in folders {
        match named_entry(entry) {
            Some((id, name)) => {
                if let Some(id) = id {
                    folder_names_by_id.insert(id, name.clone());
                }
                plan.folders.push(name);
            }
            None => plan.skipped += 1,
        }
    }

    for entry in tags {
        match named_entry(entry) {
            Some((id, name)) => {
                if let Some(id) = id {
                    tag_names_by_id.insert(id, name.clone());
                }
                plan.tags.push(name);
            }
            None => plan.skipped += 1,
        }
    }

    for entry in prompts {
        match planned_prompt(entry, &folder_names_by_id, &tag_names_by_id) {
            Some(prompt) => plan.prompts.push(prompt),
            None => plan.skipped += 1,
        }
    }

    Ok(plan)
}

fn collection<'a>(doc: &'a Value, key: &'static str) -> Result<&'a Vec<Value>, ImportError> {
    let value = doc.get(key).ok_or(ImportError::MissingCollection(key))?;
    value.as_array().ok_or(ImportError::NotAnArray(key))
}

/// Extract `(id, name)` from a folder/tag record; `None` when the name is
/// missing, non-string, or blank after trimming.
fn named_entry(entry: &Value) -> Option<(Option<String>, String)> {
    let name = entry.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let id = entry
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some((id, name.to_string()))
}

fn planned_prompt(
    entry: &Value,
    folder_names_by_id: &HashMap<String, String>,
    tag_names_by_id: &HashMap<String, String>,
) -> Option<PlannedPrompt> {
    let title = entry.get("title")?.as_str()?.trim();
    if title.is_empty() {
        return None;
    }
    let content = entry.get("content")?.as_str()?;

    let folder_name = entry
        .get("folderId")
        .and_then(Value::as_str)
        .and_then(|id| folder_names_by_id.get(id))
        .cloned();
    // Dangling tag ids inside the document are silently dropped.
    let tag_names = entry
        .get("tags")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .filter_map(|id| tag_names_by_id.get(id))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Some(PlannedPrompt {
        title: title.to_string(),
        content: content.to_string(),
        folder_name,
        tag_names,
        is_favorite: entry
            .get("isFavorite")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        avatar: entry
            .get("avatar")
            .and_then(Value::as_str)
            .map(str::to_string),
        bg_color: entry
            .get("bgColor")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
