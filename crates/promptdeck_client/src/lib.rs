//! Client library for the PromptDeck API.
//!
//! [`PromptCache`] mirrors the server's collections and keeps them in sync
//! through optimistic mutations with rollback; [`api::HttpApi`] is the HTTP
//! transport; [`autosave`] batches free-text edits into debounced saves.

/// API transport trait and HTTP implementation.
pub mod api;
/// Debounced auto-save for the prompt editor.
pub mod autosave;
/// Client cache and synchronization layer.
pub mod cache;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiError, HttpApi, PromptApi};
pub use autosave::{Autosave, DraftFields};
pub use cache::{ImportReport, PromptCache};
