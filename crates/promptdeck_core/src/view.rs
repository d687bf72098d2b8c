//! View derivation: pure filter/search/sort over the prompt collection.
//!
//! These functions are side-effect free; the client cache and the CLI both
//! feed them the raw collections plus the current [`ViewState`].

use crate::models::{Prompt, Tag};
use std::cmp::Ordering;

/// Sort key for the visible prompt list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    UpdatedAt,
    Title,
}

/// Sort direction for the visible prompt list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Filter and sort state for the prompt list.
///
/// The three filter axes (favorites, folder, tag) are mutually exclusive:
/// the setters clear the other two. Search text is independent but only
/// applies when none of the three axes is active.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub selected_folder_id: Option<String>,
    pub selected_tag_id: Option<String>,
    pub show_favorites: bool,
    pub search_query: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ViewState {
    /// Select a folder, clearing the tag selection and favorites flag.
    pub fn select_folder(&mut self, id: Option<String>) {
        self.selected_folder_id = id;
        self.selected_tag_id = None;
        self.show_favorites = false;
    }

    /// Select a tag, clearing the folder selection and favorites flag.
    pub fn select_tag(&mut self, id: Option<String>) {
        self.selected_tag_id = id;
        self.selected_folder_id = None;
        self.show_favorites = false;
    }

    /// Toggle favorites-only mode, clearing folder and tag selections.
    pub fn set_show_favorites(&mut self, show: bool) {
        self.show_favorites = show;
        self.selected_folder_id = None;
        self.selected_tag_id = None;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Change the sort field. Selecting a new field resets the direction to
    /// descending; re-selecting the current field toggles the direction.
    pub fn set_sort_field(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = match self.sort_direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Desc;
        }
    }
}

/// Compute the visible, ordered prompt list.
///
/// Filter precedence (first match wins): favorites, folder, tag, search,
/// everything. The sort is stable, so prompts with equal keys keep their
/// original relative order.
pub fn visible_prompts<'a>(
    prompts: &'a [Prompt],
    tags: &[Tag],
    view: &ViewState,
) -> Vec<&'a Prompt> {
    let mut visible: Vec<&Prompt> = prompts
        .iter()
        .filter(|prompt| matches_filter(prompt, tags, view))
        .collect();
    visible.sort_by(|a, b| compare_prompts(a, b, view.sort_field, view.sort_direction));
    visible
}

fn matches_filter(prompt: &Prompt, tags: &[Tag], view: &ViewState) -> bool {
    if view.show_favorites {
        return prompt.is_favorite;
    }
    if let Some(folder_id) = &view.selected_folder_id {
        return prompt.folder_id.as_deref() == Some(folder_id.as_str());
    }
    if let Some(tag_id) = &view.selected_tag_id {
        return prompt.tags.iter().any(|id| id == tag_id);
    }
    if !view.search_query.is_empty() {
        return matches_search(prompt, tags, &view.search_query.to_lowercase());
    }
    true
}

/// Case-insensitive substring match against title, content, or the name of
/// any referenced tag. Dangling tag ids resolve to nothing and never match.
fn matches_search(prompt: &Prompt, tags: &[Tag], query_lower: &str) -> bool {
    if prompt.title.to_lowercase().contains(query_lower)
        || prompt.content.to_lowercase().contains(query_lower)
    {
        return true;
    }
    prompt.tags.iter().any(|tag_id| {
        tags.iter()
            .find(|t| &t.id == tag_id)
            .is_some_and(|t| t.name.to_lowercase().contains(query_lower))
    })
}

fn compare_prompts(a: &Prompt, b: &Prompt, field: SortField, direction: SortDirection) -> Ordering {
    let ordering = match field {
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
