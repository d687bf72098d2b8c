use super::Store;
use crate::error::AppError;
use crate::models::{
    CreateFolderRequest, CreatePromptRequest, CreateTagRequest, UpdateFolderRequest,
    UpdatePromptRequest, UpdateTagRequest,
};

fn prompt_request(title: &str) -> CreatePromptRequest {
    CreatePromptRequest {
        title: title.to_string(),
        content: "body".to_string(),
        ..CreatePromptRequest::default()
    }
}

#[test]
fn create_prompt_assigns_unique_ids() {
    let store = Store::new();
    let a = store.prompts.create(prompt_request("a")).unwrap();
    let b = store.prompts.create(prompt_request("b")).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.prompts.list().unwrap().len(), 2);
}

#[test]
fn create_prompt_rejects_blank_title() {
    let store = Store::new();
    let err = store.prompts.create(prompt_request("   ")).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(store.prompts.list().unwrap().is_empty());
}

#[test]
fn update_prompt_increments_version_by_one_each_time() {
    let store = Store::new();
    let created = store.prompts.create(prompt_request("v")).unwrap();
    assert_eq!(created.version, 1);

    let mut last = created.clone();
    for expected in 2..=5u64 {
        let updated = store
            .prompts
            .update(
                &created.id,
                &UpdatePromptRequest {
                    content: Some(format!("rev {}", expected)),
                    ..UpdatePromptRequest::default()
                },
            )
            .unwrap()
            .expect("prompt exists");
        assert_eq!(updated.version, expected);
        assert!(updated.updated_at >= last.updated_at);
        last = updated;
    }
}

#[test]
fn update_prompt_unknown_id_returns_none() {
    let store = Store::new();
    let result = store
        .prompts
        .update("missing", &UpdatePromptRequest::default())
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn update_prompt_clears_folder_with_empty_string() {
    let store = Store::new();
    let mut req = prompt_request("filed");
    req.folder_id = Some("f1".to_string());
    let created = store.prompts.create(req).unwrap();
    assert_eq!(created.folder_id.as_deref(), Some("f1"));

    let updated = store
        .prompts
        .update(
            &created.id,
            &UpdatePromptRequest {
                folder_id: Some(String::new()),
                ..UpdatePromptRequest::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.folder_id, None);
}

#[test]
fn delete_prompt_is_hard_removal() {
    let store = Store::new();
    let created = store.prompts.create(prompt_request("gone")).unwrap();
    assert!(store.prompts.delete(&created.id).unwrap());
    assert!(!store.prompts.delete(&created.id).unwrap());
    assert!(store.prompts.get(&created.id).unwrap().is_none());
}

#[test]
fn folder_and_tag_names_must_be_non_empty_after_trim() {
    let store = Store::new();
    assert!(matches!(
        store
            .folders
            .create(CreateFolderRequest {
                name: " \t ".to_string()
            })
            .unwrap_err(),
        AppError::BadRequest(_)
    ));
    assert!(matches!(
        store
            .tags
            .create(CreateTagRequest {
                name: String::new()
            })
            .unwrap_err(),
        AppError::BadRequest(_)
    ));

    let folder = store
        .folders
        .create(CreateFolderRequest {
            name: "work".to_string(),
        })
        .unwrap();
    assert!(matches!(
        store
            .folders
            .update(
                &folder.id,
                &UpdateFolderRequest {
                    name: Some("  ".to_string())
                }
            )
            .unwrap_err(),
        AppError::BadRequest(_)
    ));
}

#[test]
fn renaming_refreshes_updated_at() {
    let store = Store::new();
    let tag = store
        .tags
        .create(CreateTagRequest {
            name: "draft".to_string(),
        })
        .unwrap();
    let renamed = store
        .tags
        .update(
            &tag.id,
            &UpdateTagRequest {
                name: Some("final".to_string()),
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "final");
    assert!(renamed.updated_at >= tag.updated_at);
    assert_eq!(renamed.created_at, tag.created_at);
}

#[test]
fn deleting_tag_leaves_dangling_reference_on_prompt() {
    let store = Store::new();
    let tag = store
        .tags
        .create(CreateTagRequest {
            name: "stale".to_string(),
        })
        .unwrap();
    let mut req = prompt_request("holder");
    req.tags = vec![tag.id.clone()];
    let prompt = store.prompts.create(req).unwrap();

    assert!(store.tags.delete(&tag.id).unwrap());
    // No cascade: the prompt still references the deleted tag id.
    let kept = store.prompts.get(&prompt.id).unwrap().unwrap();
    assert_eq!(kept.tags, vec![tag.id]);
}

#[test]
fn deleting_folder_leaves_prompt_folder_id_dangling() {
    let store = Store::new();
    let folder = store
        .folders
        .create(CreateFolderRequest {
            name: "doomed".to_string(),
        })
        .unwrap();
    let mut req = prompt_request("orphan");
    req.folder_id = Some(folder.id.clone());
    let prompt = store.prompts.create(req).unwrap();

    assert!(store.folders.delete(&folder.id).unwrap());
    let kept = store.prompts.get(&prompt.id).unwrap().unwrap();
    assert_eq!(kept.folder_id, Some(folder.id));
}

#[test]
fn snapshot_returns_all_three_collections() {
    let store = Store::new();
    store.seed_sample_data().unwrap();
    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.prompts.len(), 1);
    assert_eq!(snapshot.folders.len(), 1);
    assert_eq!(snapshot.tags.len(), 1);
    // Seeded prompt references the seeded folder and tag.
    let prompt = &snapshot.prompts[0];
    assert_eq!(prompt.folder_id.as_deref(), Some(snapshot.folders[0].id.as_str()));
    assert_eq!(prompt.tags, vec![snapshot.tags[0].id.clone()]);
}

#[test]
fn snapshot_is_idempotent_without_mutations() {
    let store = Store::new();
    store.seed_sample_data().unwrap();
    let first = store.snapshot().unwrap();
    let second = store.snapshot().unwrap();
    assert_eq!(first, second);
}
