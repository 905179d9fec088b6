use fundreq_llm_sdk::client::LlmClient;
use fundreq_llm_sdk::error::LlmError;
use fundreq_llm_sdk::types::{CompletionRequest, CompletionResponse, ContentBlock, Role, Usage};
use std::sync::{Arc, Mutex};

pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<String>>>,
    pub call_count: Arc<Mutex<usize>>,
}

impl MockLlmClient {
    pub fn with_responses(responses: Vec<&str>) -> Self {
        MockLlmClient {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        *self.call_count.lock().unwrap() += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::internal("no scripted response left"));
        }
        let text = responses.remove(0);

        Ok(CompletionResponse {
            content: vec![ContentBlock::Text { text }],
            role: Role::Assistant,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
            },
            stop_reason: Some("STOP".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
