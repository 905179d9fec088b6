use crate::config::FundreqConfig;
use crate::controller::InteractionController;
use crate::database::RequestStore;
use crate::extraction::FieldExtractor;
use fundreq_llm_sdk::client::LlmClient;
use fundreq_llm_sdk::gemini::GeminiClient;
use std::sync::Arc;

/// Build the Gemini client described by `config`
pub fn create_llm_client(config: &FundreqConfig) -> anyhow::Result<Arc<dyn LlmClient>> {
    let api_key = config.gemini_api_key()?;
    let mut client = GeminiClient::new(api_key)?.with_model(config.llm.model.clone());
    if let Some(base_url) = config.llm.base_url.as_deref().filter(|u| !u.is_empty()) {
        client = client.with_base_url(base_url);
    }
    Ok(Arc::new(client))
}

/// Builds the session pieces that share one language model client
pub struct SessionFactory {
    llm_client: Arc<dyn LlmClient>,
    config: FundreqConfig,
}

impl SessionFactory {
    pub fn new(llm_client: Arc<dyn LlmClient>, config: FundreqConfig) -> Self {
        Self { llm_client, config }
    }

    pub fn from_config(config: FundreqConfig) -> anyhow::Result<Self> {
        let llm_client = create_llm_client(&config)?;
        Ok(Self::new(llm_client, config))
    }

    pub fn config(&self) -> &FundreqConfig {
        &self.config
    }

    pub fn create_extractor(&self) -> FieldExtractor {
        FieldExtractor::new(self.llm_client.clone(), self.config.extractor_config())
    }

    pub fn create_controller(&self, store: Arc<dyn RequestStore>) -> InteractionController {
        InteractionController::new(self.create_extractor(), store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::RecordStore;
    use crate::test_support::{MockLlmClient, ABHA_ANSWER, ABHA_SENTENCE};

    #[test]
    fn test_create_llm_client_uses_configured_model() {
        let mut config = FundreqConfig::default();
        config.api_keys.gemini_api_key = Some("test-key".to_string());
        config.llm.model = "gemini-2.5-pro".to_string();

        // Environment keys win over the file, so only check the model here
        let client = create_llm_client(&config).unwrap();
        assert_eq!(client.provider_name(), "google");
        assert_eq!(client.model_name(), "gemini-2.5-pro");
    }

    #[tokio::test]
    async fn test_factory_controller_shares_client() {
        let client = Arc::new(MockLlmClient::with_responses(vec![ABHA_ANSWER]));
        let factory = SessionFactory::new(client.clone(), FundreqConfig::default());
        let store = Arc::new(RecordStore::in_memory(factory.config().retry_policy()).unwrap());

        let mut controller = factory.create_controller(store);
        controller.submit_text(ABHA_SENTENCE).await.unwrap();

        assert_eq!(client.call_count(), 1);
        assert_eq!(client.requests()[0].model, "gemini-2.5-flash");
    }
}
