use fundreq_llm_sdk::client::LlmClient;
use fundreq_llm_sdk::error::LlmError;
use fundreq_llm_sdk::models::gemini::DEFAULT_MODEL;
use fundreq_llm_sdk::types::{CompletionRequest, Message, ResponseFormat};
use shared_types::Draft;
use std::sync::Arc;

mod validator;
pub use validator::{validate_json_syntax, validate_structure, ExtractedFields, REQUIRED_KEYS};

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Nothing to extract from")]
    EmptyInput,

    #[error("Language model request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    InvalidJson(String),

    #[error("Model response is not a JSON object")]
    NotAnObject,

    #[error("Model response is missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ExtractionError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Model name; the client's own model is used when unset
    pub model: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: Some(DEFAULT_MODEL.to_string()),
            temperature: 0.2,
            max_output_tokens: 2048,
        }
    }
}

/// True when the text contains any character from the Arabic block (U+0600..U+06FF)
pub fn is_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Context followed by the utterance, space-joined
pub fn compose_full_text(context: &str, utterance: &str) -> String {
    format!("{} {}", context.trim(), utterance.trim())
        .trim()
        .to_string()
}

/// Turns free-form request sentences into a [`Draft`] with a language model
pub struct FieldExtractor {
    client: Arc<dyn LlmClient>,
    config: ExtractorConfig,
    system_prompt: String,
}

impl FieldExtractor {
    pub fn new(client: Arc<dyn LlmClient>, config: ExtractorConfig) -> Self {
        Self {
            client,
            config,
            system_prompt: Self::generate_system_prompt(),
        }
    }

    fn generate_system_prompt() -> String {
        r#"You extract the details of a money request from text a user wrote or spoke.
The input has been translated from Arabic if it contained Arabic text.

Respond with exactly one JSON object of this shape:

{
  "project_number": "extracted project number or empty string",
  "project_name": "extracted project name or empty string",
  "amount": extracted amount as a number or 0,
  "reason": "extracted reason or empty string",
  "missing_fields": ["names of required fields you could not determine"]
}

IMPORTANT RULES:
1. Your entire response must be valid JSON
2. All five keys must be present
3. If any information is missing, leave it empty ("" for text, 0 for amount)
4. missing_fields may only contain: project_number, project_name, amount, reason
5. Do not invent values that are not stated in the text
6. Return the JSON object directly, not wrapped in markdown code blocks
"#
        .to_string()
    }

    fn model(&self) -> String {
        self.config
            .model
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.client.model_name().to_string())
    }

    fn build_request(&self, prompt: String) -> CompletionRequest {
        let mut request = CompletionRequest::new(self.model(), vec![Message::user(prompt)]);
        request.max_tokens = self.config.max_output_tokens;
        request.temperature = Some(self.config.temperature);
        request
    }

    /// Like [`try_extract`](Self::try_extract), but logs the failure and returns `None`
    pub async fn extract(&self, utterance: &str, context: &str) -> Option<Draft> {
        match self.try_extract(utterance, context).await {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!(error = %e, "Could not extract request details");
                None
            }
        }
    }

    pub async fn try_extract(
        &self,
        utterance: &str,
        context: &str,
    ) -> Result<Draft, ExtractionError> {
        let full_text = compose_full_text(context, utterance);
        if full_text.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let translated_text = if is_arabic(&full_text) {
            self.translate(&full_text).await
        } else {
            None
        };
        let processing_text = translated_text.as_deref().unwrap_or(&full_text);

        let mut request = self.build_request(format!("Text to analyze: {}", processing_text));
        request.system = Some(self.system_prompt.clone());
        request.response_format = Some(ResponseFormat::JsonObject);

        tracing::debug!(
            model = %request.model,
            chars = processing_text.chars().count(),
            translated = translated_text.is_some(),
            "Requesting field extraction"
        );

        let response = self.client.complete(request).await?;
        let text = response.text();
        tracing::debug!(response = %text, "Extraction answer");

        let value = validate_json_syntax(&text)?;
        let extracted = validate_structure(&value)?;

        Ok(Draft {
            fields: extracted.fields,
            missing_fields: extracted.missing_fields,
            translated_text,
            original_text: full_text,
        })
    }

    /// Translate the Arabic parts of `text` to English.
    ///
    /// Returns `None` when the model fails or answers with nothing; the caller
    /// then works on the untranslated text.
    pub async fn translate(&self, text: &str) -> Option<String> {
        let prompt = format!(
            "Translate the following Arabic text to English. If the text is mixed (Arabic and English), \
translate only the Arabic parts and keep the English parts as is.\n\
Keep numbers in their original format.\n\
Answer with the translation only.\n\n\
Text to translate: {}",
            text
        );
        let mut request = self.build_request(prompt);
        request.response_format = Some(ResponseFormat::Text);

        match self.client.complete(request).await {
            Ok(response) => {
                let translation = response.text().trim().to_string();
                if translation.is_empty() {
                    tracing::warn!("Translation came back empty, using original text");
                    None
                } else {
                    Some(translation)
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    status = ?e.status(),
                    "Translation failed, using original text"
                );
                None
            }
        }
    }
}
