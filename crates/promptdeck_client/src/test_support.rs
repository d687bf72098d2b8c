//! Scriptable in-process API for cache tests.

use crate::api::{ApiError, PromptApi};
use promptdeck_core::models::{
    CreateFolderRequest, CreatePromptRequest, CreateTagRequest, Folder, Prompt, Snapshot, Tag,
    UpdateFolderRequest, UpdatePromptRequest, UpdateTagRequest,
};
use promptdeck_core::store::Store;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A [`PromptApi`] backed by the real in-memory store, with switches to make
/// individual operations fail as if the network dropped.
#[derive(Default)]
pub(crate) struct MockApi {
    pub store: Store,
    pub fail_fetch: AtomicBool,
    pub fail_creates: AtomicBool,
    pub fail_updates: AtomicBool,
    pub fail_deletes: AtomicBool,
    /// Creates allowed before `fail_creates` kicks in; lets import tests
    /// fail partway through a run.
    pub creates_before_failure: AtomicUsize,
    pub calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            creates_before_failure: AtomicUsize::new(usize::MAX),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn unreachable() -> ApiError {
        ApiError::Transport("connection refused".to_string())
    }

    fn check_fetch(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        Ok(())
    }

    fn check_create(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        if self.creates_before_failure.load(Ordering::SeqCst) == 0 {
            return Err(Self::unreachable());
        }
        let budget = self.creates_before_failure.load(Ordering::SeqCst);
        if budget != usize::MAX {
            self.creates_before_failure
                .store(budget - 1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn check_update(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        Ok(())
    }

    fn check_delete(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        Ok(())
    }

    fn storage(err: promptdeck_core::error::AppError) -> ApiError {
        ApiError::Server {
            status: 500,
            message: err.to_string(),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Server {
            status: 404,
            message: "Not found".to_string(),
        }
    }
}

impl PromptApi for &MockApi {
    async fn fetch_all(&self) -> Result<Snapshot, ApiError> {
        self.check_fetch()?;
        self.store.snapshot().map_err(MockApi::storage)
    }

    async fn create_prompt(&self, req: &CreatePromptRequest) -> Result<Prompt, ApiError> {
        self.check_create()?;
        self.store
            .prompts
            .create(req.clone())
            .map_err(MockApi::storage)
    }

    async fn update_prompt(
        &self,
        id: &str,
        req: &UpdatePromptRequest,
    ) -> Result<Prompt, ApiError> {
        self.check_update()?;
        self.store
            .prompts
            .update(id, req)
            .map_err(MockApi::storage)?
            .ok_or_else(MockApi::not_found)
    }

    async fn delete_prompt(&self, id: &str) -> Result<(), ApiError> {
        self.check_delete()?;
        match self.store.prompts.delete(id).map_err(MockApi::storage)? {
            true => Ok(()),
            false => Err(MockApi::not_found()),
        }
    }

    async fn create_folder(&self, req: &CreateFolderRequest) -> Result<Folder, ApiError> {
        self.check_create()?;
        self.store
            .folders
            .create(req.clone())
            .map_err(MockApi::storage)
    }

    async fn update_folder(
        &self,
        id: &str,
        req: &UpdateFolderRequest,
    ) -> Result<Folder, ApiError> {
        self.check_update()?;
        self.store
            .folders
            .update(id, req)
            .map_err(MockApi::storage)?
            .ok_or_else(MockApi::not_found)
    }

    async fn delete_folder(&self, id: &str) -> Result<(), ApiError> {
        self.check_delete()?;
        match self.store.folders.delete(id).map_err(MockApi::storage)? {
            true => Ok(()),
            false => Err(MockApi::not_found()),
        }
    }

    async fn create_tag(&self, req: &CreateTagRequest) -> Result<Tag, ApiError> {
        self.check_create()?;
        self.store.tags.create(req.clone()).map_err(MockApi::storage)
    }

    async fn update_tag(&self, id: &str, req: &UpdateTagRequest) -> Result<Tag, ApiError> {
        self.check_update()?;
        self.store
            .tags
            .update(id, req)
            .map_err(MockApi::storage)?
            .ok_or_else(MockApi::not_found)
    }

    async fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        self.check_delete()?;
        match self.store.tags.delete(id).map_err(MockApi::storage)? {
            true => Ok(()),
            false => Err(MockApi::not_found()),
        }
    }
}
