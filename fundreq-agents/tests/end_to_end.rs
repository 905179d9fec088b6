mod common;

use common::MockLlmClient;
use fundreq_agents::{
    ControllerState, ExtractorConfig, FieldExtractor, InteractionController, RecordStore,
    RequestStore, RetryPolicy,
};
use rusqlite::Connection;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

const SENTENCE: &str =
    "I need to request 500 riyals for project 223 named Abha University to buy some tools";

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10))
}

#[tokio::test]
async fn test_sentence_to_saved_request() {
    let file = NamedTempFile::new().unwrap();
    let store = Arc::new(RecordStore::open(file.path(), fast_policy()).unwrap());
    let client = Arc::new(MockLlmClient::with_responses(vec![
        r#"{"project_number": "223", "project_name": "Abha University", "amount": 500, "reason": "to buy some tools", "missing_fields": []}"#,
    ]));
    let extractor = FieldExtractor::new(client.clone(), ExtractorConfig::default());
    let mut controller = InteractionController::new(extractor, store.clone());

    let outcome = controller.submit_text(SENTENCE).await.unwrap();
    assert!(outcome.missing_fields.is_empty());
    assert!(outcome.translated_text.is_none());

    let draft = controller.draft().unwrap();
    assert_eq!(draft.fields.project_number, "223");
    assert_eq!(draft.fields.project_name, "Abha University");
    assert_eq!(draft.fields.amount, 500.0);
    assert_eq!(draft.fields.reason, "to buy some tools");

    controller.submit().unwrap();
    controller.confirm().await.unwrap();
    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(client.get_call_count(), 1);

    let reopened = RecordStore::open(file.path(), fast_policy()).unwrap();
    let all = reopened.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].project_number, "223");
    assert_eq!(all[0].project_name, "Abha University");
    assert_eq!(all[0].amount, 500.0);
    assert_eq!(all[0].reason, "to buy some tools");
    assert_eq!(all[0].original_text, SENTENCE);
}

#[tokio::test]
async fn test_malformed_answer_leaves_nothing_saved() {
    let store = Arc::new(RecordStore::in_memory(fast_policy()).unwrap());
    let client = Arc::new(MockLlmClient::with_responses(vec!["Sure! Here are the details."]));
    let extractor = FieldExtractor::new(client, ExtractorConfig::default());
    let mut controller = InteractionController::new(extractor, store.clone());

    assert!(controller.submit_text(SENTENCE).await.is_err());
    assert_eq!(controller.history(), vec![SENTENCE.to_string()]);
    assert!(controller.confirm().await.is_err());
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_legacy_database_is_repaired_on_open() {
    let file = NamedTempFile::new().unwrap();
    {
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE requests (
                timestamp DATETIME,
                project_number TEXT,
                project_name TEXT,
                amount REAL,
                reason TEXT
            );
            INSERT INTO requests VALUES ('2024-01-10 12:00:00.000000', '100', 'Old Project', 250.0, 'printer ink');
            INSERT INTO requests VALUES ('2024-02-10 12:00:00.000000', '101', 'Older Project', 80.0, 'cables');",
        )
        .unwrap();
    }

    let store = RecordStore::open(file.path(), fast_policy()).unwrap();
    let all = store.list_all().unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].project_number, "101");
    assert_eq!(all[1].project_number, "100");
    assert_eq!(all[1].project_name, "Old Project");
    assert_eq!(all[1].amount, 250.0);
    assert_eq!(all[1].reason, "printer ink");
    assert!(all.iter().all(|r| r.original_text.is_empty()));
    assert!(all.iter().all(|r| r.id > 0));

    let columns: Vec<String> = Connection::open(file.path())
        .unwrap()
        .prepare("PRAGMA table_info(requests)")
        .unwrap()
        .query_map([], |row| row.get(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert!(columns.contains(&"original_text".to_string()));
    assert!(columns.contains(&"id".to_string()));
}
