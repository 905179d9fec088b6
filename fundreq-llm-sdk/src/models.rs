//! Model constants for supported LLM providers
//!
//! Model IDs are sourced from official provider documentation.

/// Google Gemini model constants
pub mod gemini {
    /// Gemini 2.5 Flash - Fast, low-cost model, good at short structured answers
    pub const GEMINI_2_5_FLASH_ID: &str = "gemini-2.5-flash";
    pub const GEMINI_2_5_FLASH_NAME: &str = "Gemini 2.5 Flash";

    /// Gemini 2.5 Pro - Higher quality reasoning model
    pub const GEMINI_2_5_PRO_ID: &str = "gemini-2.5-pro";
    pub const GEMINI_2_5_PRO_NAME: &str = "Gemini 2.5 Pro";

    /// Gemini 3 Flash - Pro-level intelligence at Flash speed
    /// Released: Preview, Context: 1M/64k, Thinking: minimal/low/medium/high
    pub const GEMINI_3_FLASH_ID: &str = "gemini-3-flash-preview";
    pub const GEMINI_3_FLASH_NAME: &str = "Gemini 3 Flash";

    pub const GEMINI_2_5_FLASH: &str = GEMINI_2_5_FLASH_ID;
    pub const GEMINI_2_5_PRO: &str = GEMINI_2_5_PRO_ID;
    pub const GEMINI_3_FLASH: &str = GEMINI_3_FLASH_ID;

    /// Model used when the configuration does not name one
    pub const DEFAULT_MODEL: &str = GEMINI_2_5_FLASH_ID;
}
