use fundreq_llm_sdk::client::LlmClient;
use fundreq_llm_sdk::error::LlmError;
use fundreq_llm_sdk::types::{CompletionRequest, CompletionResponse, ContentBlock, Role, Usage};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Language model double that replays scripted answers in order
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<&str>) -> Self {
        let client = Self::new();
        for response in responses {
            client.push_response(response);
        }
        client
    }

    pub fn push_response(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    pub fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse {
                content: vec![ContentBlock::Text { text }],
                role: Role::Assistant,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
                stop_reason: Some("STOP".to_string()),
            }),
            Some(Err(message)) => Err(LlmError::api_error(503, message)),
            None => Err(LlmError::internal("no scripted response left")),
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

pub const ABHA_SENTENCE: &str =
    "I need to request 500 riyals for project 223 named Abha University to buy some tools";

pub const ABHA_ANSWER: &str = r#"{
    "project_number": "223",
    "project_name": "Abha University",
    "amount": 500,
    "reason": "to buy some tools",
    "missing_fields": []
}"#;
