//! Request extraction, conversation state and persistence for the fundreq assistant.

pub mod config;
pub mod controller;
pub mod database;
pub mod extraction;
pub mod factory;
pub mod memory;
pub mod retry;
pub mod speech;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use controller::{ControllerError, ControllerState, ExtractionOutcome, InteractionController};
pub use database::{RecordStore, RequestStore, StoreError};
pub use extraction::{ExtractionError, ExtractorConfig, FieldExtractor};
pub use memory::ConversationMemory;
pub use retry::{RetryError, RetryPolicy};
pub use speech::{classify_transcript, CommandSpeechCapture, SpeechCapture, SpeechError, Transcript};
pub use validation::{validate, MissingFields};
