use super::types::*;
use crate::error::LlmError;
use crate::models::gemini::DEFAULT_MODEL;
use crate::types::{
    CompletionRequest, CompletionResponse, ContentBlock, ResponseFormat, Role, Usage,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

const PAYLOAD_LOG_ENV: &str = "FUNDREQ_LLM_LOG_PAYLOADS";

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_client,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model used by [`LlmClient::complete`] when the request does not name one
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub async fn generate_content(
        &self,
        model: impl Into<String>,
        request: GeminiGenerateContentRequest,
    ) -> Result<GeminiGenerateContentResponse, LlmError> {
        let model = model.into();
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| LlmError::authentication(format!("Invalid API key format: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if std::env::var(PAYLOAD_LOG_ENV).is_ok() {
            if let Ok(json_str) = serde_json::to_string_pretty(&request) {
                tracing::debug!(model = %model, "Gemini request:\n{}", json_str);
            }
        }

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_body) {
                return Err(Self::map_error(
                    error_response.error.code,
                    error_response.error.message,
                ));
            }

            return Err(Self::map_error(status.as_u16(), error_body));
        }

        let body = response.text().await?;
        let generate_response: GeminiGenerateContentResponse = serde_json::from_str(&body)?;

        if std::env::var(PAYLOAD_LOG_ENV).is_ok() {
            if let Ok(json_str) = serde_json::to_string_pretty(&generate_response) {
                tracing::debug!(model = %model, "Gemini response:\n{}", json_str);
            }
        }

        Ok(generate_response)
    }

    fn map_error(status: u16, message: String) -> LlmError {
        match status {
            400 => LlmError::invalid_request(message),
            401 | 403 => LlmError::Authentication { message },
            429 => LlmError::rate_limit(message, None),
            _ => LlmError::api_error(status, message),
        }
    }

    /// Convert a provider-agnostic request into a generateContent body
    fn to_gemini_request(request: CompletionRequest) -> GeminiGenerateContentRequest {
        let mut system_parts: Vec<String> = request.system.into_iter().collect();
        let mut contents = Vec::new();

        for message in request.messages {
            let text = message
                .content
                .into_iter()
                .map(|block| match block {
                    ContentBlock::Text { text } => text,
                })
                .collect::<Vec<_>>()
                .join("");

            match message.role {
                Role::User => contents.push(GeminiContent::new(GeminiRole::User, text)),
                Role::Assistant => contents.push(GeminiContent::new(GeminiRole::Model, text)),
                // Gemini has no system turn; fold it into the system instruction
                Role::System => system_parts.push(text),
            }
        }

        let response_mime_type = match request.response_format {
            Some(ResponseFormat::JsonObject) => Some("application/json".to_string()),
            Some(ResponseFormat::Text) | None => None,
        };

        let generation_config = GenerationConfig {
            temperature: request.temperature,
            top_p: request.top_p,
            max_output_tokens: (request.max_tokens > 0).then_some(request.max_tokens),
            stop_sequences: request.stop_sequences,
            response_mime_type,
        };

        GeminiGenerateContentRequest {
            contents,
            system_instruction: if system_parts.is_empty() {
                None
            } else {
                Some(GeminiContent::new(GeminiRole::User, system_parts.join("\n\n")))
            },
            generation_config: Some(generation_config),
        }
    }
}

#[async_trait]
impl crate::client::LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if request.messages.is_empty() {
            return Err(LlmError::invalid_request(
                "At least one message is required",
            ));
        }

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        let gemini_request = Self::to_gemini_request(request);
        let response = self.generate_content(model, gemini_request).await?;

        let candidate = match response.candidates.first() {
            Some(candidate) => candidate,
            None => {
                let reason = response
                    .prompt_feedback
                    .as_ref()
                    .and_then(|feedback| feedback.block_reason.clone())
                    .unwrap_or_else(|| "no candidates returned".to_string());
                return Err(LlmError::empty_response(reason));
            }
        };

        let text = candidate.text().ok_or_else(|| {
            LlmError::empty_response(format!(
                "candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        let usage = response
            .usage_metadata
            .as_ref()
            .map(|usage| Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: vec![ContentBlock::Text { text }],
            role: Role::Assistant,
            usage,
            stop_reason: candidate.finish_reason.clone(),
        })
    }

    fn provider_name(&self) -> &str {
        crate::providers::GOOGLE
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
