//! Core domain library for PromptDeck (models, store, view derivation).

/// Configuration loading and defaults.
pub mod config;
/// Application error types.
pub mod error;
/// Export/import document handling.
pub mod export;
/// Data models for API requests and storage.
pub mod models;
/// In-memory entity store.
pub mod store;
/// Pure filter/search/sort functions over the prompt collection.
pub mod view;

pub use config::Config;
pub use error::AppError;
pub use store::Store;

/// Default HTTP port for the API server.
pub const DEFAULT_PORT: u16 = 4620;

/// Default server URL used by client tooling.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4620";
