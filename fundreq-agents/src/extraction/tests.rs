use super::*;
use crate::test_support::{MockLlmClient, ABHA_ANSWER, ABHA_SENTENCE};
use fundreq_llm_sdk::types::{ContentBlock, ResponseFormat};

fn setup_extractor(client: Arc<MockLlmClient>) -> FieldExtractor {
    FieldExtractor::new(
        client,
        ExtractorConfig {
            model: Some("gemini-test".to_string()),
            temperature: 0.1,
            max_output_tokens: 512,
        },
    )
}

fn prompt_text(request: &CompletionRequest) -> String {
    request
        .messages
        .iter()
        .flat_map(|m| m.content.iter())
        .map(|block| match block {
            ContentBlock::Text { text } => text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_arabic_detection() {
    assert!(is_arabic("أحتاج إلى طلب 500 ريال"));
    assert!(is_arabic("project 223 للمشروع"));
    assert!(is_arabic("\u{0600}"));
    assert!(is_arabic("\u{06FF}"));
    assert!(!is_arabic("I need 500 riyals"));
    assert!(!is_arabic(""));
}

#[test]
fn test_compose_full_text() {
    assert_eq!(compose_full_text("", "hello"), "hello");
    assert_eq!(compose_full_text("first", "second"), "first second");
    assert_eq!(compose_full_text("  first ", " second "), "first second");
    assert_eq!(compose_full_text("one", "  "), "one");
}

#[test]
fn test_compose_keeps_utterance_repeated_in_context() {
    assert_eq!(
        compose_full_text("first second", "second"),
        "first second second"
    );
    assert_eq!(compose_full_text("hello", "hello"), "hello hello");
}

#[tokio::test]
async fn test_extracts_english_sentence() {
    let client = Arc::new(MockLlmClient::with_responses(vec![ABHA_ANSWER]));
    let extractor = setup_extractor(client.clone());

    let draft = extractor
        .try_extract(ABHA_SENTENCE, "")
        .await
        .unwrap();

    assert_eq!(draft.fields.project_number, "223");
    assert_eq!(draft.fields.project_name, "Abha University");
    assert_eq!(draft.fields.amount, 500.0);
    assert_eq!(draft.fields.reason, "to buy some tools");
    assert!(draft.missing_fields.is_empty());
    assert!(draft.translated_text.is_none());
    assert_eq!(draft.original_text, ABHA_SENTENCE);

    assert_eq!(client.call_count(), 1);
    let request = &client.requests()[0];
    assert_eq!(request.model, "gemini-test");
    assert_eq!(request.max_tokens, 512);
    assert_eq!(request.temperature, Some(0.1));
    assert_eq!(request.response_format, Some(ResponseFormat::JsonObject));
    assert!(request
        .system
        .as_deref()
        .unwrap()
        .contains("missing_fields"));
    assert!(prompt_text(request).contains(ABHA_SENTENCE));
}

#[tokio::test]
async fn test_context_is_prepended() {
    let client = Arc::new(MockLlmClient::with_responses(vec![ABHA_ANSWER]));
    let extractor = setup_extractor(client.clone());

    let draft = extractor
        .try_extract("to buy some tools", "500 riyals for project 223")
        .await
        .unwrap();

    assert_eq!(
        draft.original_text,
        "500 riyals for project 223 to buy some tools"
    );
    assert!(prompt_text(&client.requests()[0])
        .contains("500 riyals for project 223 to buy some tools"));
}

#[tokio::test]
async fn test_context_ending_with_utterance_still_gets_it() {
    let client = Arc::new(MockLlmClient::with_responses(vec![ABHA_ANSWER]));
    let extractor = setup_extractor(client);

    let draft = extractor
        .try_extract("to buy some tools", "project 223 to buy some tools")
        .await
        .unwrap();

    assert_eq!(
        draft.original_text,
        "project 223 to buy some tools to buy some tools"
    );
}

#[tokio::test]
async fn test_arabic_input_is_translated_first() {
    let arabic = "أحتاج إلى طلب 500 ريال للمشروع 223 المسمى جامعة أبها لشراء بعض الأدوات";
    let translation =
        "I need to request 500 riyals for project 223 called Abha University to buy some tools";
    let client = Arc::new(MockLlmClient::with_responses(vec![translation, ABHA_ANSWER]));
    let extractor = setup_extractor(client.clone());

    let draft = extractor.try_extract(arabic, "").await.unwrap();

    assert_eq!(client.call_count(), 2);
    let requests = client.requests();
    assert!(prompt_text(&requests[0]).contains("Translate the following Arabic text"));
    assert!(prompt_text(&requests[0]).contains(arabic));
    assert!(prompt_text(&requests[1]).contains(translation));
    assert_eq!(draft.translated_text.as_deref(), Some(translation));
    assert_eq!(draft.original_text, arabic);
    assert_eq!(draft.fields.project_name, "Abha University");
}

#[tokio::test]
async fn test_translation_failure_falls_back_to_original() {
    let arabic = "مشروع 223";
    let client = Arc::new(MockLlmClient::new());
    client.push_failure("translation service down");
    client.push_response(ABHA_ANSWER);
    let extractor = setup_extractor(client.clone());

    let draft = extractor.try_extract(arabic, "").await.unwrap();

    assert!(draft.translated_text.is_none());
    assert!(prompt_text(&client.requests()[1]).contains(arabic));
}

#[tokio::test]
async fn test_empty_translation_falls_back_to_original() {
    let client = Arc::new(MockLlmClient::with_responses(vec!["   ", ABHA_ANSWER]));
    let extractor = setup_extractor(client.clone());

    let draft = extractor.try_extract("مرحبا", "").await.unwrap();

    assert!(draft.translated_text.is_none());
    assert!(prompt_text(&client.requests()[1]).contains("مرحبا"));
}

#[tokio::test]
async fn test_missing_fields_are_reported() {
    let client = Arc::new(MockLlmClient::with_responses(vec![
        r#"{"project_number": "", "project_name": "Abha University", "amount": 0, "reason": "", "missing_fields": ["project_number", "amount", "reason"]}"#,
    ]));
    let extractor = setup_extractor(client);

    let draft = extractor
        .try_extract("something for Abha University", "")
        .await
        .unwrap();

    assert_eq!(
        draft.missing_fields,
        vec!["project_number", "amount", "reason"]
    );
    assert_eq!(draft.fields.amount, 0.0);
}

#[tokio::test]
async fn test_malformed_output_yields_none() {
    let client = Arc::new(MockLlmClient::with_responses(vec!["not json at all"]));
    let extractor = setup_extractor(client);

    assert!(extractor.extract("I need money", "").await.is_none());
}

#[tokio::test]
async fn test_incomplete_object_is_rejected() {
    let client = Arc::new(MockLlmClient::with_responses(vec![
        r#"{"project_number": "1", "project_name": "x", "amount": 2}"#,
    ]));
    let extractor = setup_extractor(client);

    let result = extractor.try_extract("I need money", "").await;

    assert!(matches!(result, Err(ExtractionError::MissingKey("reason"))));
}

#[tokio::test]
async fn test_model_failure_is_an_error() {
    let client = Arc::new(MockLlmClient::new());
    client.push_failure("overloaded");
    let extractor = setup_extractor(client);

    let result = extractor.try_extract("I need money", "").await;

    assert!(matches!(result, Err(ExtractionError::Llm(_))));
}

#[tokio::test]
async fn test_empty_input_does_not_call_model() {
    let client = Arc::new(MockLlmClient::new());
    let extractor = setup_extractor(client.clone());

    let result = extractor.try_extract("   ", "").await;

    assert!(matches!(result, Err(ExtractionError::EmptyInput)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_unset_model_uses_client_model() {
    let client = Arc::new(MockLlmClient::with_responses(vec![ABHA_ANSWER]));
    let extractor = FieldExtractor::new(
        client.clone(),
        ExtractorConfig {
            model: None,
            ..ExtractorConfig::default()
        },
    );

    extractor.try_extract(ABHA_SENTENCE, "").await.unwrap();

    assert_eq!(client.requests()[0].model, "mock-model");
}
