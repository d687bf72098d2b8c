//! Client cache and synchronization layer.
//!
//! [`PromptCache`] holds a local mirror of the server's collections plus the
//! UI selection state. Mutations follow a fixed contract: updates and
//! deletes apply optimistically and roll back to a pre-mutation snapshot on
//! failure; creates wait for the server-assigned entity and never guess ids.
//! No method propagates an error past this boundary; failures are recorded
//! as a human-readable message in `error` for the caller to render.

use crate::api::{ApiError, PromptApi};
use promptdeck_core::export::{parse_import, ExportDocument, PlannedPrompt};
use promptdeck_core::models::{
    CreateFolderRequest, CreatePromptRequest, CreateTagRequest, Folder, Prompt, Snapshot, Tag,
    UpdateFolderRequest, UpdatePromptRequest, UpdateTagRequest,
};
use promptdeck_core::view::{self, SortField, ViewState};
use std::collections::HashMap;

/// Outcome of an import run.
///
/// Import is not transactional against the server: a mid-run failure stops
/// the run and the counts say how far it got (with `error` set on the cache).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub folders_created: usize,
    pub tags_created: usize,
    pub prompts_created: usize,
    pub records_skipped: usize,
    pub completed: bool,
}

/// Local mirror of the server collections plus UI selection state.
pub struct PromptCache<A: PromptApi> {
    api: A,
    pub prompts: Vec<Prompt>,
    pub folders: Vec<Folder>,
    pub tags: Vec<Tag>,
    pub selected_prompt_id: Option<String>,
    pub view: ViewState,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Per-entity mutation counters used to discard stale reconciliations:
    /// a response is only applied when the entity has not been touched again
    /// since the request was sent.
    generations: HashMap<String, u64>,
}

impl<A: PromptApi> PromptCache<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            prompts: Vec::new(),
            folders: Vec::new(),
            tags: Vec::new(),
            selected_prompt_id: None,
            view: ViewState::default(),
            is_loading: false,
            error: None,
            generations: HashMap::new(),
        }
    }

    /// The visible, sorted prompt list for the current view state.
    pub fn visible_prompts(&self) -> Vec<&Prompt> {
        view::visible_prompts(&self.prompts, &self.tags, &self.view)
    }

    pub fn prompt(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn select_prompt(&mut self, id: Option<String>) {
        self.selected_prompt_id = id;
    }

    pub fn select_folder(&mut self, id: Option<String>) {
        self.view.select_folder(id);
    }

    pub fn select_tag(&mut self, id: Option<String>) {
        self.view.select_tag(id);
    }

    pub fn set_show_favorites(&mut self, show: bool) {
        self.view.set_show_favorites(show);
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.view.set_search_query(query);
    }

    pub fn set_sort_field(&mut self, field: SortField) {
        self.view.set_sort_field(field);
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn finish(&mut self) {
        self.is_loading = false;
    }

    fn fail(&mut self, context: &str, err: &ApiError) {
        self.is_loading = false;
        let message = format!("{}: {}", context, err);
        tracing::warn!("{}", message);
        self.error = Some(message);
    }

    fn bump_generation(&mut self, id: &str) -> u64 {
        let counter = self.generations.entry(id.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    fn generation(&self, id: &str) -> u64 {
        self.generations.get(id).copied().unwrap_or(0)
    }

    fn is_current(&self, id: &str, generation: u64, what: &str) -> bool {
        if self.generation(id) == generation {
            return true;
        }
        tracing::warn!("discarding stale {} response for {}", what, id);
        false
    }

    /// Replace the whole cache with the server's current snapshot.
    ///
    /// Last fetch wins entirely; there is no merge. On failure the cache is
    /// left untouched and `error` carries the message.
    pub async fn fetch_data(&mut self) -> bool {
        self.begin();
        match self.api.fetch_all().await {
            Ok(Snapshot {
                prompts,
                folders,
                tags,
            }) => {
                self.prompts = prompts;
                self.folders = folders;
                self.tags = tags;
                self.generations.clear();
                self.finish();
                true
            }
            Err(err) => {
                self.fail("Failed to fetch data", &err);
                false
            }
        }
    }

    /// Create a prompt. No optimistic insert: the cache only gains the
    /// entity the server returns, so ids are never guessed.
    pub async fn add_prompt(&mut self, req: CreatePromptRequest) -> Option<Prompt> {
        if req.title.trim().is_empty() {
            self.error = Some("Prompt title cannot be empty".to_string());
            return None;
        }
        self.begin();
        match self.api.create_prompt(&req).await {
            Ok(prompt) => {
                self.prompts.push(prompt.clone());
                self.finish();
                Some(prompt)
            }
            Err(err) => {
                self.fail("Failed to create prompt", &err);
                None
            }
        }
    }

    /// Optimistically apply a partial update, then reconcile with the
    /// server's authoritative copy (`version`, `updatedAt`). On failure the
    /// pre-mutation snapshot is restored verbatim.
    pub async fn update_prompt(&mut self, id: &str, updates: UpdatePromptRequest) -> bool {
        let snapshot = self.prompts.clone();
        if let Some(prompt) = self.prompts.iter_mut().find(|p| p.id == id) {
            prompt.apply_updates(&updates);
        }
        let generation = self.bump_generation(id);
        self.begin();
        match self.api.update_prompt(id, &updates).await {
            Ok(server_prompt) => {
                self.finish();
                if self.is_current(id, generation, "prompt update") {
                    if let Some(prompt) = self.prompts.iter_mut().find(|p| p.id == id) {
                        *prompt = server_prompt;
                    }
                }
                true
            }
            Err(err) => {
                if self.is_current(id, generation, "prompt update") {
                    self.prompts = snapshot;
                }
                self.fail("Failed to update prompt", &err);
                false
            }
        }
    }

    /// Optimistically remove a prompt (clearing any selection pointing at
    /// it), re-inserting the snapshot on failure.
    pub async fn delete_prompt(&mut self, id: &str) -> bool {
        let snapshot = self.prompts.clone();
        self.prompts.retain(|p| p.id != id);
        if self.selected_prompt_id.as_deref() == Some(id) {
            self.selected_prompt_id = None;
        }
        let generation = self.bump_generation(id);
        self.begin();
        match self.api.delete_prompt(id).await {
            Ok(()) => {
                self.finish();
                true
            }
            Err(err) => {
                if self.is_current(id, generation, "prompt delete") {
                    self.prompts = snapshot;
                }
                self.fail("Failed to delete prompt", &err);
                false
            }
        }
    }

    /// Flip a prompt's favorite flag. Unknown ids are a no-op guard: no
    /// request is sent and no error is raised.
    pub async fn toggle_favorite(&mut self, id: &str) -> bool {
        let Some(prompt) = self.prompt(id) else {
            return false;
        };
        let updates = UpdatePromptRequest {
            is_favorite: Some(!prompt.is_favorite),
            ..UpdatePromptRequest::default()
        };
        self.update_prompt(id, updates).await
    }

    pub async fn add_folder(&mut self, name: &str) -> Option<Folder> {
        if name.trim().is_empty() {
            self.error = Some("Folder name cannot be empty".to_string());
            return None;
        }
        self.begin();
        let req = CreateFolderRequest {
            name: name.to_string(),
        };
        match self.api.create_folder(&req).await {
            Ok(folder) => {
                self.folders.push(folder.clone());
                self.finish();
                Some(folder)
            }
            Err(err) => {
                self.fail("Failed to create folder", &err);
                None
            }
        }
    }

    pub async fn update_folder(&mut self, id: &str, name: &str) -> bool {
        if name.trim().is_empty() {
            self.error = Some("Folder name cannot be empty".to_string());
            return false;
        }
        let snapshot = self.folders.clone();
        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) {
            folder.name = name.to_string();
        }
        let generation = self.bump_generation(id);
        self.begin();
        let req = UpdateFolderRequest {
            name: Some(name.to_string()),
        };
        match self.api.update_folder(id, &req).await {
            Ok(server_folder) => {
                self.finish();
                if self.is_current(id, generation, "folder update") {
                    if let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) {
                        *folder = server_folder;
                    }
                }
                true
            }
            Err(err) => {
                if self.is_current(id, generation, "folder update") {
                    self.folders = snapshot;
                }
                self.fail("Failed to update folder", &err);
                false
            }
        }
    }

    /// Delete a folder. Prompts filed under it are untouched (no cascade);
    /// the view layer treats their dangling `folder_id` as unfiled.
    pub async fn delete_folder(&mut self, id: &str) -> bool {
        let snapshot = self.folders.clone();
        self.folders.retain(|f| f.id != id);
        if self.view.selected_folder_id.as_deref() == Some(id) {
            self.view.selected_folder_id = None;
        }
        let generation = self.bump_generation(id);
        self.begin();
        match self.api.delete_folder(id).await {
            Ok(()) => {
                self.finish();
                true
            }
            Err(err) => {
                if self.is_current(id, generation, "folder delete") {
                    self.folders = snapshot;
                }
                self.fail("Failed to delete folder", &err);
                false
            }
        }
    }

    pub async fn add_tag(&mut self, name: &str) -> Option<Tag> {
        if name.trim().is_empty() {
            self.error = Some("Tag name cannot be empty".to_string());
            return None;
        }
        self.begin();
        let req = CreateTagRequest {
            name: name.to_string(),
        };
        match self.api.create_tag(&req).await {
            Ok(tag) => {
                self.tags.push(tag.clone());
                self.finish();
                Some(tag)
            }
            Err(err) => {
                self.fail("Failed to create tag", &err);
                None
            }
        }
    }

    pub async fn update_tag(&mut self, id: &str, name: &str) -> bool {
        if name.trim().is_empty() {
            self.error = Some("Tag name cannot be empty".to_string());
            return false;
        }
        let snapshot = self.tags.clone();
        if let Some(tag) = self.tags.iter_mut().find(|t| t.id == id) {
            tag.name = name.to_string();
        }
        let generation = self.bump_generation(id);
        self.begin();
        let req = UpdateTagRequest {
            name: Some(name.to_string()),
        };
        match self.api.update_tag(id, &req).await {
            Ok(server_tag) => {
                self.finish();
                if self.is_current(id, generation, "tag update") {
                    if let Some(tag) = self.tags.iter_mut().find(|t| t.id == id) {
                        *tag = server_tag;
                    }
                }
                true
            }
            Err(err) => {
                if self.is_current(id, generation, "tag update") {
                    self.tags = snapshot;
                }
                self.fail("Failed to update tag", &err);
                false
            }
        }
    }

    /// Delete a tag. Prompts keep the dangling tag id (no cascade).
    pub async fn delete_tag(&mut self, id: &str) -> bool {
        let snapshot = self.tags.clone();
        self.tags.retain(|t| t.id != id);
        if self.view.selected_tag_id.as_deref() == Some(id) {
            self.view.selected_tag_id = None;
        }
        let generation = self.bump_generation(id);
        self.begin();
        match self.api.delete_tag(id).await {
            Ok(()) => {
                self.finish();
                true
            }
            Err(err) => {
                if self.is_current(id, generation, "tag delete") {
                    self.tags = snapshot;
                }
                self.fail("Failed to delete tag", &err);
                false
            }
        }
    }

    /// Build a backup document from the current cache contents.
    pub fn export_document(&self) -> ExportDocument {
        ExportDocument::from_snapshot(Snapshot {
            prompts: self.prompts.clone(),
            folders: self.folders.clone(),
            tags: self.tags.clone(),
        })
    }

    /// Import a backup document by re-creating every record through the
    /// normal create operations, with fresh ids. The whole document is
    /// validated before the first create, so a malformed file changes
    /// nothing (`None` is returned and `error` is set). A create failure
    /// mid-run stops the import; the report's `completed` flag is false and
    /// the counts say how far it got.
    pub async fn import_document(&mut self, raw: &str) -> Option<ImportReport> {
        let plan = match parse_import(raw) {
            Ok(plan) => plan,
            Err(err) => {
                let message = format!("Import failed: {}", err);
                tracing::warn!("{}", message);
                self.error = Some(message);
                return None;
            }
        };

        let mut report = ImportReport {
            records_skipped: plan.skipped,
            ..ImportReport::default()
        };

        // Imported ids were discarded at parse time; creates below assign
        // fresh ones and the name maps rewire prompt references.
        let mut folder_ids_by_name: HashMap<String, String> = HashMap::new();
        for name in &plan.folders {
            let Some(folder) = self.add_folder(name).await else {
                return Some(report);
            };
            folder_ids_by_name.insert(name.clone(), folder.id);
            report.folders_created += 1;
        }

        let mut tag_ids_by_name: HashMap<String, String> = HashMap::new();
        for name in &plan.tags {
            let Some(tag) = self.add_tag(name).await else {
                return Some(report);
            };
            tag_ids_by_name.insert(name.clone(), tag.id);
            report.tags_created += 1;
        }

        for planned in &plan.prompts {
            let req = Self::plan_to_request(planned, &folder_ids_by_name, &tag_ids_by_name);
            if self.add_prompt(req).await.is_none() {
                return Some(report);
            }
            report.prompts_created += 1;
        }

        report.completed = true;
        Some(report)
    }

    fn plan_to_request(
        planned: &PlannedPrompt,
        folder_ids_by_name: &HashMap<String, String>,
        tag_ids_by_name: &HashMap<String, String>,
    ) -> CreatePromptRequest {
        CreatePromptRequest {
            title: planned.title.clone(),
            content: planned.content.clone(),
            folder_id: planned
                .folder_name
                .as_ref()
                .and_then(|name| folder_ids_by_name.get(name))
                .cloned(),
            tags: planned
                .tag_names
                .iter()
                .filter_map(|name| tag_ids_by_name.get(name))
                .cloned()
                .collect(),
            is_favorite: planned.is_favorite,
            avatar: planned.avatar.clone(),
            bg_color: planned.bg_color.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
