//! Debounced auto-save for the prompt editor.
//!
//! [`Autosave`] tracks a draft of one prompt's editable fields and decides
//! when to emit an update request. It is driven by a caller-supplied clock
//! (`Instant` passed into every method), so the schedule is deterministic
//! and testable without real timers.
//!
//! Content keystrokes arm a long typing-pause window; when it fires, a short
//! commit window runs and only then is the save sent. Title edits and
//! non-text field changes use a single shorter window. A fired window whose
//! draft equals the last saved state emits nothing.

use promptdeck_core::models::{Prompt, UpdatePromptRequest};
use std::time::{Duration, Instant};

/// Typing pause after a content edit before the commit window starts.
pub const CONTENT_PAUSE: Duration = Duration::from_millis(1500);
/// Commit window after the typing pause, and the window for non-text edits.
pub const COMMIT_DELAY: Duration = Duration::from_millis(800);
/// Window after a title edit.
pub const TITLE_DELAY: Duration = Duration::from_millis(1000);
/// How long the "saved" indicator stays visible after a save.
pub const SAVED_INDICATOR: Duration = Duration::from_millis(2000);

/// The editable fields of a prompt, in draft form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFields {
    pub title: String,
    pub content: String,
    pub folder_id: Option<String>,
    pub tags: Vec<String>,
    pub avatar: String,
    pub bg_color: String,
}

impl DraftFields {
    pub fn of_prompt(prompt: &Prompt) -> Self {
        Self {
            title: prompt.title.clone(),
            content: prompt.content.clone(),
            folder_id: prompt.folder_id.clone(),
            tags: prompt.tags.clone(),
            avatar: prompt.avatar.clone(),
            bg_color: prompt.bg_color.clone(),
        }
    }
}

/// Debounce state for one open prompt.
pub struct Autosave {
    pub prompt_id: String,
    pub draft: DraftFields,
    last_saved: DraftFields,
    deadline: Option<Instant>,
    /// Whether the pending deadline commits directly. Content edits first
    /// fire a typing-pause deadline that re-arms into a commit window.
    commit_armed: bool,
    saved_indicator_until: Option<Instant>,
}

impl Autosave {
    /// Start tracking a prompt. The draft and last-saved state both begin
    /// as the prompt's current fields, so nothing is pending.
    pub fn new(prompt: &Prompt) -> Self {
        let fields = DraftFields::of_prompt(prompt);
        Self {
            prompt_id: prompt.id.clone(),
            draft: fields.clone(),
            last_saved: fields,
            deadline: None,
            commit_armed: false,
            saved_indicator_until: None,
        }
    }

    /// Record the server's copy after a save round-trips, without touching
    /// the draft or schedule. Keeps later diffs honest if the server
    /// normalized anything.
    pub fn reconcile(&mut self, prompt: &Prompt) {
        if prompt.id == self.prompt_id {
            self.last_saved = DraftFields::of_prompt(prompt);
        }
    }

    pub fn edit_content(&mut self, value: impl Into<String>, now: Instant) {
        self.draft.content = value.into();
        self.deadline = Some(now + CONTENT_PAUSE);
        self.commit_armed = false;
    }

    pub fn edit_title(&mut self, value: impl Into<String>, now: Instant) {
        self.draft.title = value.into();
        self.arm_commit(now, TITLE_DELAY);
    }

    pub fn set_folder(&mut self, folder_id: Option<String>, now: Instant) {
        self.draft.folder_id = folder_id;
        self.arm_commit(now, COMMIT_DELAY);
    }

    pub fn set_tags(&mut self, tags: Vec<String>, now: Instant) {
        self.draft.tags = tags;
        self.arm_commit(now, COMMIT_DELAY);
    }

    pub fn set_avatar(&mut self, avatar: impl Into<String>, now: Instant) {
        self.draft.avatar = avatar.into();
        self.arm_commit(now, COMMIT_DELAY);
    }

    pub fn set_bg_color(&mut self, bg_color: impl Into<String>, now: Instant) {
        self.draft.bg_color = bg_color.into();
        self.arm_commit(now, COMMIT_DELAY);
    }

    fn arm_commit(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
        self.commit_armed = true;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.last_saved
    }

    /// Drive the schedule. Returns the update to send when a commit window
    /// fires with real changes; the caller sends it and then calls
    /// [`reconcile`](Self::reconcile) with the server's reply.
    pub fn poll(&mut self, now: Instant) -> Option<UpdatePromptRequest> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        if !self.is_dirty() {
            // The draft drifted back to the saved state; nothing to send.
            self.deadline = None;
            return None;
        }
        if !self.commit_armed {
            // Typing pause elapsed; run the commit window before saving.
            self.arm_commit(now, COMMIT_DELAY);
            return None;
        }
        self.deadline = None;
        self.commit_armed = false;
        self.last_saved = self.draft.clone();
        self.saved_indicator_until = Some(now + SAVED_INDICATOR);
        Some(self.update_request())
    }

    /// Emit whatever is dirty right now, skipping any pending windows.
    /// Used when the editor closes or switches prompts.
    pub fn flush(&mut self, now: Instant) -> Option<UpdatePromptRequest> {
        self.deadline = None;
        self.commit_armed = false;
        if !self.is_dirty() {
            return None;
        }
        self.last_saved = self.draft.clone();
        self.saved_indicator_until = Some(now + SAVED_INDICATOR);
        Some(self.update_request())
    }

    pub fn saved_indicator_visible(&self, now: Instant) -> bool {
        self.saved_indicator_until.is_some_and(|until| now < until)
    }

    /// Full-field update for the draft. An unset folder serializes as an
    /// empty string, which the server reads as "clear the assignment".
    fn update_request(&self) -> UpdatePromptRequest {
        UpdatePromptRequest {
            title: Some(self.draft.title.clone()),
            content: Some(self.draft.content.clone()),
            folder_id: Some(self.draft.folder_id.clone().unwrap_or_default()),
            tags: Some(self.draft.tags.clone()),
            is_favorite: None,
            avatar: Some(self.draft.avatar.clone()),
            bg_color: Some(self.draft.bg_color.clone()),
        }
    }
}
