use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::request::{NewRequest, RequestFields};

/// Editable fields of the review form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    ProjectNumber,
    ProjectName,
    Amount,
    Reason,
}

impl FormField {
    /// Human-readable name used in messages
    pub fn label(&self) -> &'static str {
        match self {
            FormField::ProjectNumber => "project number",
            FormField::ProjectName => "project name",
            FormField::Amount => "amount",
            FormField::Reason => "reason",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "project_number" | "number" => Ok(FormField::ProjectNumber),
            "project_name" | "name" => Ok(FormField::ProjectName),
            "amount" => Ok(FormField::Amount),
            "reason" => Ok(FormField::Reason),
            _ => Err(format!(
                "Unknown field '{}'. Expected one of: project_number, project_name, amount, reason",
                s
            )),
        }
    }
}

/// Transient, editable result of one extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(flatten)]
    pub fields: RequestFields,
    /// Required fields the extractor could not fill
    pub missing_fields: Vec<String>,
    /// English text the fields were extracted from, when the input contained Arabic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    pub original_text: String,
}

impl Draft {
    /// Empty draft for manual entry
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn to_new_request(&self) -> NewRequest {
        NewRequest::new(self.fields.clone(), self.original_text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field_parsing() {
        assert_eq!("project_number".parse(), Ok(FormField::ProjectNumber));
        assert_eq!("Project Name".parse(), Ok(FormField::ProjectName));
        assert_eq!("project-name".parse(), Ok(FormField::ProjectName));
        assert_eq!("amount".parse(), Ok(FormField::Amount));
        assert_eq!("number".parse(), Ok(FormField::ProjectNumber));
        assert!("budget".parse::<FormField>().is_err());
    }

    #[test]
    fn test_form_field_labels() {
        let labels: Vec<String> = [
            FormField::ProjectNumber,
            FormField::ProjectName,
            FormField::Amount,
            FormField::Reason,
        ]
        .iter()
        .map(|f| f.to_string())
        .collect();
        assert_eq!(
            labels,
            vec!["project number", "project name", "amount", "reason"]
        );
    }

    #[test]
    fn test_draft_to_new_request_keeps_original_text() {
        let draft = Draft {
            fields: RequestFields::new("9", "Depot", 12.0, "paint"),
            missing_fields: vec![],
            translated_text: Some("translated".to_string()),
            original_text: "نص أصلي".to_string(),
        };
        let request = draft.to_new_request();
        assert_eq!(request.original_text, "نص أصلي");
        assert_eq!(request.fields.project_name, "Depot");
    }

    #[test]
    fn test_draft_serialization_omits_missing_translation() {
        let json = serde_json::to_value(Draft::blank()).unwrap();
        assert!(json.get("translated_text").is_none());
        assert_eq!(json["amount"], 0.0);
    }
}
