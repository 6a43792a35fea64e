mod helpers;

use mcp_instruct::knowledge::types::{PersonalInfo, ProfessionalInfo};
use serde_json::json;

#[test]
fn finds_name_with_near_perfect_relevance() {
    let (_tmp, mut store) = helpers::test_store();
    store
        .update_personal(&PersonalInfo {
            name: Some("Ada Lovelace".into()),
            ..Default::default()
        })
        .unwrap();

    let results = store.search("Ada");
    assert!(!results.is_empty());
    let top = &results[0];
    assert_eq!(top.category, "personal");
    assert_eq!(top.field, "name");
    assert_eq!(top.value, json!("Ada Lovelace"));
    assert!(top.relevance > 0.99, "relevance was {}", top.relevance);
}

#[test]
fn tolerates_typos_and_ranks_closer_matches_first() {
    let (_tmp, mut store) = helpers::test_store();
    store
        .update_professional(&ProfessionalInfo {
            skills: Some(vec!["Kubernetes".into(), "Terraform".into()]),
            occupation: Some("Platform engineer".into()),
            ..Default::default()
        })
        .unwrap();

    let results = store.search("kubernets");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].field, "skills");
    assert!(results[0].relevance < 1.0);
    assert_eq!(results[0].context, "Technical and professional skills");
}

#[test]
fn index_follows_mutations() {
    let (_tmp, mut store) = helpers::test_store();
    store
        .add_custom_knowledge("travel", "visited", json!(["Lisbon", "Kyoto"]), Some(vec!["trips".into()]))
        .unwrap();

    let results = store.search("kyoto");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].category, "custom");
    assert_eq!(results[0].field, "visited");
    assert_eq!(results[0].context, "Custom knowledge in category: travel");

    // tags are searchable too
    assert_eq!(store.search("trips").len(), 1);

    store.remove_custom_knowledge("travel", "visited").unwrap();
    assert!(store.search("kyoto").is_empty());
}

#[test]
fn search_works_after_reopen() {
    let (tmp, mut store) = helpers::test_store();
    store
        .update_personal(&PersonalInfo {
            current_location: Some("London".into()),
            ..Default::default()
        })
        .unwrap();
    drop(store);

    let mut reopened = helpers::reopen(tmp.path());
    let results = reopened.search("london");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].field, "currentLocation");
}

#[test]
fn blank_query_returns_nothing() {
    let (_tmp, mut store) = helpers::test_store();
    store
        .update_personal(&PersonalInfo {
            name: Some("Ada".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(store.search("  ").is_empty());
}
