mod helpers;

use mcp_instruct::knowledge::types::{PersonalInfo, ProfessionalInfo};
use mcp_instruct::knowledge::{HistoryAction, KnowledgeError, KnowledgeStore, StoreSettings};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn personal_update_persists_and_records_history() {
    let (tmp, mut store) = helpers::test_store();
    assert!(store.is_new());

    let updated = store
        .update_personal(&PersonalInfo {
            name: Some("Ada".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(updated, 1);
    assert!(!store.is_new());

    let history = store.history(10);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, HistoryAction::Add);
    assert_eq!(history[0].category, "personal");
    assert_eq!(history[0].field.as_deref(), Some("name"));
    assert_eq!(history[0].old_value, None);
    assert_eq!(history[0].new_value, Some(json!("Ada")));

    store
        .update_personal(&PersonalInfo {
            name: Some("Ada Lovelace".into()),
            ..Default::default()
        })
        .unwrap();
    let last = store.history(1).pop().unwrap();
    assert_eq!(last.action, HistoryAction::Update);
    assert_eq!(last.old_value, Some(json!("Ada")));
    assert_eq!(last.new_value, Some(json!("Ada Lovelace")));

    // A restarted process sees the same document.
    let reopened = helpers::reopen(tmp.path());
    assert_eq!(reopened.personal().name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(reopened.history(10).len(), 2);
    assert_eq!(reopened.knowledge_base().id, store.knowledge_base().id);
}

#[test]
fn partial_update_leaves_other_fields_alone() {
    let (_tmp, mut store) = helpers::test_store();
    store
        .update_professional(&ProfessionalInfo {
            occupation: Some("Engineer".into()),
            skills: Some(vec!["Rust".into()]),
            ..Default::default()
        })
        .unwrap();
    store
        .update_professional(&ProfessionalInfo {
            years_of_experience: Some(7.0),
            ..Default::default()
        })
        .unwrap();

    let professional = store.professional();
    assert_eq!(professional.occupation.as_deref(), Some("Engineer"));
    assert_eq!(professional.skills, Some(vec!["Rust".to_string()]));
    assert_eq!(professional.years_of_experience, Some(7.0));
    assert_eq!(store.history(10).len(), 3);
}

#[test]
fn empty_update_is_a_no_op() {
    let (_tmp, mut store) = helpers::test_store();
    let updated = store.update_personal(&PersonalInfo::default()).unwrap();

    assert_eq!(updated, 0);
    assert!(store.history(10).is_empty());
    // nothing was saved
    assert!(!store.file_path().exists());
}

#[test]
fn history_ignored_by_is_new() {
    let (_tmp, mut store) = helpers::test_store();
    store
        .add_custom_knowledge("hobbies", "chess", json!("weekly"), None)
        .unwrap();
    assert!(!store.is_new());

    store.remove_custom_knowledge("hobbies", "chess").unwrap();
    assert_eq!(store.history(10).len(), 2);
    assert!(store.is_new());
}

#[test]
fn export_import_round_trip() {
    let (_tmp, mut source) = helpers::test_store();
    source
        .update_personal(&PersonalInfo {
            name: Some("Ada Lovelace".into()),
            languages: Some(vec!["English".into(), "French".into()]),
            ..Default::default()
        })
        .unwrap();
    source
        .add_custom_knowledge("family", "pet", json!({"kind": "cat"}), Some(vec!["home".into()]))
        .unwrap();
    let exported = source.export_document().unwrap();

    let (tmp, mut target) = helpers::test_store();
    target.import_document(&exported).unwrap();

    let original = source.knowledge_base();
    let imported = target.knowledge_base();
    assert_eq!(imported.id, original.id);
    assert_eq!(imported.personal, original.personal);
    assert_eq!(imported.custom, original.custom);
    assert_eq!(imported.history, original.history);
    assert_eq!(imported.created_at, original.created_at);

    // and it was persisted
    let reopened = helpers::reopen(tmp.path());
    assert_eq!(reopened.knowledge_base().id, original.id);
}

#[test]
fn import_accepts_empty_personal_section() {
    let (_tmp, mut store) = helpers::test_store();
    let doc = json!({
        "id": "kb_imported",
        "version": "1.0.0",
        "personal": {},
        "createdAt": "2024-01-01T00:00:00Z",
        "lastUpdated": "2024-01-01T00:00:00Z"
    });
    store.import_document(&doc.to_string()).unwrap();

    let kb = store.knowledge_base();
    assert_eq!(kb.id, "kb_imported");
    assert!(kb.is_new());
    assert!(kb.history.is_empty());
}

#[test]
fn import_rejects_unknown_category_fields() {
    let (_tmp, mut store) = helpers::test_store();
    let doc = json!({
        "id": "kb_x",
        "version": "1.0.0",
        "personal": { "shoeSize": 42 },
        "createdAt": "2024-01-01T00:00:00Z",
        "lastUpdated": "2024-01-01T00:00:00Z"
    });
    let err = store.import_document(&doc.to_string()).unwrap_err();
    assert!(matches!(err, KnowledgeError::Format(_)));
    assert!(store.is_new());
}

#[test]
fn profiles_are_separate_files() {
    let tmp = TempDir::new().unwrap();
    let mut work = KnowledgeStore::open(tmp.path(), "work", StoreSettings::default()).unwrap();
    work.update_personal(&PersonalInfo {
        name: Some("Ada".into()),
        ..Default::default()
    })
    .unwrap();

    let home = KnowledgeStore::open(tmp.path(), "home", StoreSettings::default()).unwrap();
    assert!(home.is_new());
    assert!(tmp.path().join("work.json").exists());
    assert!(!tmp.path().join("home.json").exists());
}

#[test]
fn corrupt_document_recovers_and_is_replaced_on_save() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("default.json");
    std::fs::write(&path, "{\"id\": 12").unwrap();

    let mut store = helpers::reopen(tmp.path());
    assert!(store.is_new());

    store
        .update_personal(&PersonalInfo {
            pronouns: Some("they/them".into()),
            ..Default::default()
        })
        .unwrap();
    let reopened = helpers::reopen(tmp.path());
    assert_eq!(reopened.personal().pronouns.as_deref(), Some("they/them"));
}
