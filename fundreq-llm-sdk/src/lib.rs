//! # Fundreq LLM SDK
//!
//! A small provider-agnostic LLM layer used by the fundreq request assistant.
//! Google Gemini is the supported provider.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fundreq_llm_sdk::client::LlmClient;
//! use fundreq_llm_sdk::gemini::GeminiClient;
//! use fundreq_llm_sdk::types::{CompletionRequest, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new("your-gemini-api-key")?;
//!     let response = client
//!         .complete(CompletionRequest::new(
//!             client.model_name(),
//!             vec![Message::user("Hello!")],
//!         ))
//!         .await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod gemini;
pub mod models;
pub mod providers;
pub mod types;

#[cfg(test)]
mod tests {
    use crate::gemini::{client::GeminiClient, types::GeminiRole};
    use crate::types::{ContentBlock, Message, Role};

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("test-key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_gemini_client_creation_empty_key() {
        let client = GeminiClient::new("");
        assert!(client.is_err());
    }

    #[test]
    fn test_generic_message_creation() {
        let message = Message::user("Hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content.len(), 1);
        match &message.content[0] {
            ContentBlock::Text { text } => assert_eq!(text, "Hello"),
        }
    }

    #[test]
    fn test_gemini_role_serialization() {
        let json = serde_json::to_string(&GeminiRole::Model).unwrap();
        assert_eq!(json, "\"model\"");
    }
}
