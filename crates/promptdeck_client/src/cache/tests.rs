use super::*;
use crate::test_support::MockApi;
use promptdeck_core::models::CreatePromptRequest;
use serde_json::json;
use std::sync::atomic::Ordering;

fn create_req(title: &str) -> CreatePromptRequest {
    CreatePromptRequest {
        title: title.to_string(),
        content: format!("{} content", title),
        ..CreatePromptRequest::default()
    }
}

#[tokio::test]
async fn fetch_replaces_the_whole_cache() {
    let api = MockApi::new();
    api.store.seed_sample_data().unwrap();
    let mut cache = PromptCache::new(&api);

    assert!(cache.fetch_data().await);
    assert_eq!(cache.prompts.len(), 1);
    assert_eq!(cache.folders.len(), 1);
    assert_eq!(cache.tags.len(), 1);
    assert!(cache.error.is_none());
    assert!(!cache.is_loading);
}

#[tokio::test]
async fn failed_fetch_leaves_cache_untouched() {
    let api = MockApi::new();
    api.store.seed_sample_data().unwrap();
    let mut cache = PromptCache::new(&api);
    assert!(cache.fetch_data().await);

    api.fail_fetch.store(true, Ordering::SeqCst);
    assert!(!cache.fetch_data().await);
    assert_eq!(cache.prompts.len(), 1);
    assert!(cache.error.as_deref().unwrap().starts_with("Failed to fetch"));
}

#[tokio::test]
async fn create_waits_for_the_server_assigned_entity() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);

    let prompt = cache.add_prompt(create_req("First")).await.unwrap();
    assert_eq!(prompt.version, 1);
    assert_eq!(cache.prompts.len(), 1);
    // The cached copy is the server's object, id included.
    assert_eq!(cache.prompts[0].id, prompt.id);
}

#[tokio::test]
async fn failed_create_adds_nothing() {
    let api = MockApi::new();
    api.fail_creates.store(true, Ordering::SeqCst);
    let mut cache = PromptCache::new(&api);

    assert!(cache.add_prompt(create_req("First")).await.is_none());
    assert!(cache.prompts.is_empty());
    assert!(cache.error.is_some());
}

#[tokio::test]
async fn blank_title_is_rejected_locally() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);

    assert!(cache.add_prompt(create_req("   ")).await.is_none());
    assert_eq!(api.calls(), 0);
    assert_eq!(cache.error.as_deref(), Some("Prompt title cannot be empty"));
}

#[tokio::test]
async fn update_applies_optimistically_then_takes_server_fields() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let prompt = cache.add_prompt(create_req("First")).await.unwrap();

    let updates = UpdatePromptRequest {
        title: Some("Renamed".to_string()),
        ..UpdatePromptRequest::default()
    };
    assert!(cache.update_prompt(&prompt.id, updates).await);
    let cached = cache.prompt(&prompt.id).unwrap();
    assert_eq!(cached.title, "Renamed");
    // Version comes from the server's authoritative copy.
    assert_eq!(cached.version, 2);
}

#[tokio::test]
async fn failed_update_restores_the_snapshot() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let prompt = cache.add_prompt(create_req("First")).await.unwrap();

    api.fail_updates.store(true, Ordering::SeqCst);
    let updates = UpdatePromptRequest {
        title: Some("Renamed".to_string()),
        ..UpdatePromptRequest::default()
    };
    assert!(!cache.update_prompt(&prompt.id, updates).await);
    let cached = cache.prompt(&prompt.id).unwrap();
    assert_eq!(cached.title, "First");
    assert_eq!(cached.version, 1);
    assert!(cache
        .error
        .as_deref()
        .unwrap()
        .starts_with("Failed to update prompt"));
}

#[tokio::test]
async fn delete_removes_optimistically_and_clears_selection() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let prompt = cache.add_prompt(create_req("First")).await.unwrap();
    cache.select_prompt(Some(prompt.id.clone()));

    assert!(cache.delete_prompt(&prompt.id).await);
    assert!(cache.prompts.is_empty());
    assert!(cache.selected_prompt_id.is_none());
}

#[tokio::test]
async fn failed_delete_restores_the_prompt_but_not_the_selection() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let prompt = cache.add_prompt(create_req("First")).await.unwrap();
    cache.select_prompt(Some(prompt.id.clone()));

    api.fail_deletes.store(true, Ordering::SeqCst);
    assert!(!cache.delete_prompt(&prompt.id).await);
    assert_eq!(cache.prompts.len(), 1);
    assert!(cache.selected_prompt_id.is_none());
}

#[tokio::test]
async fn toggle_favorite_flips_and_persists() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let prompt = cache.add_prompt(create_req("First")).await.unwrap();
    assert!(!prompt.is_favorite);

    assert!(cache.toggle_favorite(&prompt.id).await);
    assert!(cache.prompt(&prompt.id).unwrap().is_favorite);
    assert!(api.store.prompts.get(&prompt.id).unwrap().unwrap().is_favorite);

    assert!(cache.toggle_favorite(&prompt.id).await);
    assert!(!cache.prompt(&prompt.id).unwrap().is_favorite);
}

#[tokio::test]
async fn toggle_favorite_on_unknown_id_is_a_silent_noop() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);

    assert!(!cache.toggle_favorite("nope").await);
    assert_eq!(api.calls(), 0);
    assert!(cache.error.is_none());
}

#[tokio::test]
async fn failed_toggle_rolls_back_the_flag() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let prompt = cache.add_prompt(create_req("First")).await.unwrap();

    api.fail_updates.store(true, Ordering::SeqCst);
    assert!(!cache.toggle_favorite(&prompt.id).await);
    assert!(!cache.prompt(&prompt.id).unwrap().is_favorite);
}

#[tokio::test]
async fn folder_delete_clears_its_selection_and_keeps_prompts() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let folder = cache.add_folder("Work").await.unwrap();
    let prompt = cache
        .add_prompt(CreatePromptRequest {
            title: "Filed".to_string(),
            folder_id: Some(folder.id.clone()),
            ..CreatePromptRequest::default()
        })
        .await
        .unwrap();
    cache.select_folder(Some(folder.id.clone()));

    assert!(cache.delete_folder(&folder.id).await);
    assert!(cache.folders.is_empty());
    assert!(cache.view.selected_folder_id.is_none());
    // No cascade: the prompt keeps its dangling folder reference.
    assert_eq!(
        cache.prompt(&prompt.id).unwrap().folder_id.as_deref(),
        Some(folder.id.as_str())
    );
}

#[tokio::test]
async fn failed_folder_rename_rolls_back() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let folder = cache.add_folder("Work").await.unwrap();

    api.fail_updates.store(true, Ordering::SeqCst);
    assert!(!cache.update_folder(&folder.id, "Personal").await);
    assert_eq!(cache.folders[0].name, "Work");
}

#[tokio::test]
async fn tag_delete_leaves_prompt_tag_lists_alone() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let tag = cache.add_tag("draft").await.unwrap();
    let prompt = cache
        .add_prompt(CreatePromptRequest {
            title: "Tagged".to_string(),
            tags: vec![tag.id.clone()],
            ..CreatePromptRequest::default()
        })
        .await
        .unwrap();
    cache.select_tag(Some(tag.id.clone()));

    assert!(cache.delete_tag(&tag.id).await);
    assert!(cache.tags.is_empty());
    assert!(cache.view.selected_tag_id.is_none());
    assert_eq!(cache.prompt(&prompt.id).unwrap().tags, vec![tag.id]);
}

#[tokio::test]
async fn visible_prompts_honors_the_view_state() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let keep = cache.add_prompt(create_req("Keep")).await.unwrap();
    cache.add_prompt(create_req("Other")).await.unwrap();
    cache.toggle_favorite(&keep.id).await;

    cache.set_show_favorites(true);
    let visible = cache.visible_prompts();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, keep.id);
}

#[tokio::test]
async fn export_then_import_recreates_records_with_fresh_ids() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let folder = cache.add_folder("Work").await.unwrap();
    let tag = cache.add_tag("draft").await.unwrap();
    cache
        .add_prompt(CreatePromptRequest {
            title: "Filed".to_string(),
            content: "body".to_string(),
            folder_id: Some(folder.id.clone()),
            tags: vec![tag.id.clone()],
            is_favorite: true,
            ..CreatePromptRequest::default()
        })
        .await
        .unwrap();
    let raw = cache.export_document().to_json_pretty().unwrap();

    // Import into a fresh cache against a fresh server.
    let target_api = MockApi::new();
    let mut target = PromptCache::new(&target_api);
    let report = target.import_document(&raw).await.unwrap();
    assert!(report.completed);
    assert_eq!(report.folders_created, 1);
    assert_eq!(report.tags_created, 1);
    assert_eq!(report.prompts_created, 1);

    let imported = &target.prompts[0];
    assert_eq!(imported.title, "Filed");
    assert!(imported.is_favorite);
    // References were remapped to the newly assigned ids.
    assert_eq!(
        imported.folder_id.as_deref(),
        Some(target.folders[0].id.as_str())
    );
    assert_eq!(imported.tags, vec![target.tags[0].id.clone()]);
    assert_ne!(target.folders[0].id, folder.id);
}

#[tokio::test]
async fn malformed_import_changes_nothing() {
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    cache.add_prompt(create_req("Existing")).await.unwrap();
    let calls_before = api.calls();

    assert!(cache.import_document("{\"prompts\": []}").await.is_none());
    assert_eq!(api.calls(), calls_before);
    assert_eq!(cache.prompts.len(), 1);
    assert!(cache.error.as_deref().unwrap().starts_with("Import failed"));
}

#[tokio::test]
async fn import_stops_at_the_first_server_failure() {
    let raw = json!({
        "prompts": [
            { "title": "One", "content": "" },
            { "title": "Two", "content": "" }
        ],
        "folders": [{ "id": "f1", "name": "Work" }],
        "tags": [],
        "exportDate": "2025-01-01T00:00:00Z",
        "version": "1.0"
    })
    .to_string();

    let api = MockApi::new();
    // Folder create and the first prompt create succeed, then the line drops.
    api.creates_before_failure.store(2, Ordering::SeqCst);
    let mut cache = PromptCache::new(&api);

    let report = cache.import_document(&raw).await.unwrap();
    assert!(!report.completed);
    assert_eq!(report.folders_created, 1);
    assert_eq!(report.prompts_created, 1);
    assert!(cache.error.is_some());
    assert_eq!(cache.prompts.len(), 1);
}

#[tokio::test]
async fn stale_update_response_does_not_clobber_a_later_edit() {
    // Simulates request A's reply arriving after edit B by bumping the
    // generation between the optimistic apply and the reconcile.
    let api = MockApi::new();
    let mut cache = PromptCache::new(&api);
    let prompt = cache.add_prompt(create_req("First")).await.unwrap();

    let snapshot = cache.prompts.clone();
    if let Some(p) = cache.prompts.iter_mut().find(|p| p.id == prompt.id) {
        p.title = "Edit A".to_string();
    }
    let generation_a = cache.bump_generation(&prompt.id);

    // Edit B lands before A's response.
    cache.bump_generation(&prompt.id);
    if let Some(p) = cache.prompts.iter_mut().find(|p| p.id == prompt.id) {
        p.title = "Edit B".to_string();
    }

    // A's response (or failure rollback) must now be discarded.
    assert!(!cache.is_current(&prompt.id, generation_a, "prompt update"));
    drop(snapshot);
    assert_eq!(cache.prompt(&prompt.id).unwrap().title, "Edit B");
}
