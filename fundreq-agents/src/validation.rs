use shared_types::{FormField, RequestFields};
use std::fmt;

/// Required fields that are empty, in form order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<FormField>);

impl MissingFields {
    pub fn fields(&self) -> &[FormField] {
        &self.0
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|field| field.label()).collect();
        write!(
            f,
            "Please provide the following missing information: {}",
            names.join(", ")
        )
    }
}

impl std::error::Error for MissingFields {}

/// Check that every required field is filled in.
///
/// Only the empty string counts as empty text; an amount of exactly zero
/// counts as missing. No range or format checks are made.
pub fn validate(
    project_number: &str,
    project_name: &str,
    amount: f64,
    reason: &str,
) -> Result<(), MissingFields> {
    let mut missing = Vec::new();

    if project_number.is_empty() {
        missing.push(FormField::ProjectNumber);
    }
    if project_name.is_empty() {
        missing.push(FormField::ProjectName);
    }
    if amount == 0.0 {
        missing.push(FormField::Amount);
    }
    if reason.is_empty() {
        missing.push(FormField::Reason);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingFields(missing))
    }
}

pub fn validate_fields(fields: &RequestFields) -> Result<(), MissingFields> {
    validate(
        &fields.project_number,
        &fields.project_name,
        fields.amount,
        &fields.reason,
    )
}
