use crate::database::{RequestStore, StoreError};
use crate::extraction::FieldExtractor;
use crate::memory::ConversationMemory;
use crate::speech::{classify_transcript, SpeechCapture, Transcript};
use crate::validation::{validate_fields, MissingFields};
use shared_types::{Draft, FormField, LanguageMode, NewRequest, Request, RequestFields};
use std::sync::Arc;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No draft pending
    Idle,
    /// A draft is waiting for review and edits
    DraftPending,
    /// The reviewed draft is being persisted
    ReviewConfirmed,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Please enter some text first.")]
    EmptyInput,

    #[error("Could not extract request details. Please try again or use manual input.")]
    ExtractionFailed,

    #[error("{0}")]
    Validation(#[from] MissingFields),

    #[error("Error saving request: {0}")]
    Storage(#[from] StoreError),

    #[error("Could not access the microphone. Check that a recognizer is configured and the microphone is connected.")]
    SpeechUnavailable,

    #[error("{0}")]
    SpeechFailed(String),

    #[error("{0}")]
    SpeechWarning(String),

    #[error("Amount must be a non-negative number, got '{0}'")]
    InvalidAmount(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// What the UI should show after a successful extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    /// The utterance as typed or recognized
    pub utterance: String,
    pub translated_text: Option<String>,
    pub missing_fields: Vec<String>,
}

impl ExtractionOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Drives one session: input, extraction, review, validation and persistence
pub struct InteractionController {
    extractor: FieldExtractor,
    store: Arc<dyn RequestStore>,
    memory: ConversationMemory,
    draft: Option<Draft>,
    state: ControllerState,
}

impl InteractionController {
    pub fn new(extractor: FieldExtractor, store: Arc<dyn RequestStore>) -> Self {
        Self {
            extractor,
            store,
            memory: ConversationMemory::default(),
            draft: None,
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Utterances currently in the context window, oldest first
    pub fn history(&self) -> Vec<String> {
        self.memory.entries().map(String::from).collect()
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Record a typed utterance and extract a new draft from the accumulated context.
    ///
    /// On extraction failure the previous draft stays in place and the
    /// utterance stays in memory.
    pub async fn submit_text(&mut self, text: &str) -> Result<ExtractionOutcome, ControllerError> {
        let utterance = text.trim();
        if utterance.is_empty() {
            return Err(ControllerError::EmptyInput);
        }

        self.memory.record(utterance);
        let context = self.memory.prior_context();

        let draft = self
            .extractor
            .extract(utterance, &context)
            .await
            .ok_or(ControllerError::ExtractionFailed)?;

        let outcome = ExtractionOutcome {
            utterance: utterance.to_string(),
            translated_text: draft.translated_text.clone(),
            missing_fields: draft.missing_fields.clone(),
        };

        tracing::debug!(
            missing = outcome.missing_fields.len(),
            translated = outcome.translated_text.is_some(),
            "Draft updated"
        );

        self.draft = Some(draft);
        self.state = ControllerState::DraftPending;
        Ok(outcome)
    }

    /// Capture one utterance and handle it like typed text.
    ///
    /// Sentinel transcripts never reach memory or extraction.
    pub async fn capture_voice(
        &mut self,
        speech: &dyn SpeechCapture,
        mode: LanguageMode,
    ) -> Result<ExtractionOutcome, ControllerError> {
        if !speech.check_access().await {
            return Err(ControllerError::SpeechUnavailable);
        }

        match classify_transcript(&speech.listen(mode).await) {
            Transcript::Recognized(text) => self.submit_text(&text).await,
            Transcript::Failed(message) => Err(ControllerError::SpeechFailed(message)),
            Transcript::Warning(message) => Err(ControllerError::SpeechWarning(message)),
        }
    }

    /// Change one field of the pending draft, starting a blank one if none is pending
    pub fn edit_field(&mut self, field: FormField, value: &str) -> Result<(), ControllerError> {
        let value = value.trim();
        let amount = match field {
            FormField::Amount => Some(parse_amount(value)?),
            _ => None,
        };

        let draft = self.draft.get_or_insert_with(Draft::blank);
        match field {
            FormField::ProjectNumber => draft.fields.project_number = value.to_string(),
            FormField::ProjectName => draft.fields.project_name = value.to_string(),
            FormField::Amount => draft.fields.amount = amount.unwrap_or_default(),
            FormField::Reason => draft.fields.reason = value.to_string(),
        }

        self.state = ControllerState::DraftPending;
        Ok(())
    }

    /// Current form values; blank when no draft is pending
    pub fn current_fields(&self) -> RequestFields {
        self.draft
            .as_ref()
            .map(|draft| draft.fields.clone())
            .unwrap_or_default()
    }

    /// Validate the form and return the review summary
    pub fn submit(&self) -> Result<String, ControllerError> {
        let fields = self.current_fields();
        validate_fields(&fields)?;
        Ok(confirmation_summary(&fields))
    }

    /// Validate and persist the form.
    ///
    /// Success clears the draft and the memory. A storage failure keeps the
    /// draft so the user can retry.
    pub async fn confirm(&mut self) -> Result<Request, ControllerError> {
        let fields = self.current_fields();
        validate_fields(&fields)?;

        let original_text = self
            .draft
            .as_ref()
            .map(|draft| draft.original_text.clone())
            .unwrap_or_default();
        let new_request = NewRequest::new(fields, original_text);

        self.state = ControllerState::ReviewConfirmed;
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || store.add(&new_request))
            .await
            .map_err(|e| ControllerError::Task(e.to_string()));

        match result {
            Ok(Ok(saved)) => {
                self.draft = None;
                self.memory.clear();
                self.state = ControllerState::Idle;
                Ok(saved)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Saving request failed, draft kept");
                self.state = ControllerState::DraftPending;
                Err(ControllerError::Storage(e))
            }
            Err(e) => {
                self.state = ControllerState::DraftPending;
                Err(e)
            }
        }
    }

    /// Forget the context window and discard the draft
    pub fn clear_memory(&mut self) {
        self.memory.clear();
        self.draft = None;
        self.state = ControllerState::Idle;
    }

    pub async fn list_requests(&self) -> Result<Vec<Request>, ControllerError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.list_all())
            .await
            .map_err(|e| ControllerError::Task(e.to_string()))?
            .map_err(ControllerError::Storage)
    }
}

fn parse_amount(value: &str) -> Result<f64, ControllerError> {
    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(ControllerError::InvalidAmount(value.to_string())),
    }
}

pub fn confirmation_summary(fields: &RequestFields) -> String {
    format!(
        "Please review the following request and confirm to save it:\n\
         - Project Number: {}\n\
         - Project Name: {}\n\
         - Amount: {} riyals\n\
         - Reason: {}",
        fields.project_number, fields.project_name, fields.amount, fields.reason
    )
}
