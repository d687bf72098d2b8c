//! HTTP request handlers.

/// Folder endpoints.
pub mod folder;
/// Prompt endpoints, including the full-snapshot fetch.
pub mod prompt;
/// Tag endpoints.
pub mod tag;
