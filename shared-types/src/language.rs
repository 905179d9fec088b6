use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input language selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageMode {
    #[default]
    #[serde(rename = "en-US")]
    English,
    #[serde(rename = "ar-SA")]
    Arabic,
    #[serde(rename = "mixed")]
    Mixed,
}

impl LanguageMode {
    /// Recognizer language code
    pub fn code(&self) -> &'static str {
        match self {
            LanguageMode::English => "en-US",
            LanguageMode::Arabic => "ar-SA",
            LanguageMode::Mixed => "mixed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LanguageMode::English => "English",
            LanguageMode::Arabic => "Arabic",
            LanguageMode::Mixed => "Mixed (Arabic/English)",
        }
    }
}

impl fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError(pub String);

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown language '{}'. Expected english, arabic or mixed",
            self.0
        )
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for LanguageMode {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(LanguageMode::English),
            "ar" | "ar-sa" | "arabic" => Ok(LanguageMode::Arabic),
            "mixed" | "mix" | "both" => Ok(LanguageMode::Mixed),
            _ => Err(ParseLanguageError(s.to_string())),
        }
    }
}
