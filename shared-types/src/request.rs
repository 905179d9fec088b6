use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four business fields of a money request, as shown in the review form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestFields {
    pub project_number: String,
    pub project_name: String,
    pub amount: f64,
    pub reason: String,
}

impl RequestFields {
    pub fn new(
        project_number: impl Into<String>,
        project_name: impl Into<String>,
        amount: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            project_number: project_number.into(),
            project_name: project_name.into(),
            amount,
            reason: reason.into(),
        }
    }
}

/// A confirmed request on its way into the log. The store assigns id and timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRequest {
    #[serde(flatten)]
    pub fields: RequestFields,
    /// Untranslated utterance(s) the request was extracted from; may be empty
    pub original_text: String,
}

impl NewRequest {
    pub fn new(fields: RequestFields, original_text: impl Into<String>) -> Self {
        Self {
            fields,
            original_text: original_text.into(),
        }
    }
}

/// A persisted, immutable request row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: i64,
    /// `None` for legacy rows whose stored timestamp is missing or unreadable
    pub timestamp: Option<DateTime<Utc>>,
    pub project_number: String,
    pub project_name: String,
    pub amount: f64,
    pub reason: String,
    pub original_text: String,
}

impl Request {
    pub fn fields(&self) -> RequestFields {
        RequestFields {
            project_number: self.project_number.clone(),
            project_name: self.project_name.clone(),
            amount: self.amount,
            reason: self.reason.clone(),
        }
    }
}
