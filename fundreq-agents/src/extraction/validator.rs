use super::ExtractionError;
use serde_json::{Map, Value};
use shared_types::RequestFields;

/// Keys every extraction answer must carry
pub const REQUIRED_KEYS: [&str; 5] = [
    "project_number",
    "project_name",
    "amount",
    "reason",
    "missing_fields",
];

/// Typed view of a validated extraction answer
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub fields: RequestFields,
    pub missing_fields: Vec<String>,
}

pub fn validate_json_syntax(text: &str) -> Result<Value, ExtractionError> {
    serde_json::from_str::<Value>(text.trim())
        .map_err(|e| ExtractionError::InvalidJson(format!("Invalid JSON syntax: {}", e)))
}

pub fn validate_structure(value: &Value) -> Result<ExtractedFields, ExtractionError> {
    let object = value.as_object().ok_or(ExtractionError::NotAnObject)?;

    if let Some(key) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(ExtractionError::MissingKey(*key));
    }

    let fields = RequestFields {
        project_number: project_number(object)?,
        project_name: text_field(object, "project_name")?,
        amount: amount(object)?,
        reason: text_field(object, "reason")?,
    };

    Ok(ExtractedFields {
        fields,
        missing_fields: missing_fields(object)?,
    })
}

fn text_field(object: &Map<String, Value>, key: &'static str) -> Result<String, ExtractionError> {
    match &object[key] {
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(ExtractionError::invalid_field(
            key,
            format!("expected a string, got {}", kind(other)),
        )),
    }
}

/// Integers are accepted and rendered as text
fn project_number(object: &Map<String, Value>) -> Result<String, ExtractionError> {
    match &object["project_number"] {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => text_field(object, "project_number"),
    }
}

/// Number, numeric string or null; null and empty become 0, negatives clamp to 0
fn amount(object: &Map<String, Value>) -> Result<f64, ExtractionError> {
    let value = match &object["amount"] {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            ExtractionError::invalid_field("amount", format!("{} is not representable", n))
        })?,
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            ExtractionError::invalid_field("amount", format!("'{}' is not a number", s))
        })?,
        other => {
            return Err(ExtractionError::invalid_field(
                "amount",
                format!("expected a number, got {}", kind(other)),
            ))
        }
    };

    if !value.is_finite() {
        return Err(ExtractionError::invalid_field(
            "amount",
            format!("{} is not finite", value),
        ));
    }

    Ok(value.max(0.0))
}

/// Array of strings, trimmed and deduplicated in model order
fn missing_fields(object: &Map<String, Value>) -> Result<Vec<String>, ExtractionError> {
    let items = object["missing_fields"].as_array().ok_or_else(|| {
        ExtractionError::invalid_field(
            "missing_fields",
            format!("expected an array, got {}", kind(&object["missing_fields"])),
        )
    })?;

    let mut result: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let name = item.as_str().ok_or_else(|| {
            ExtractionError::invalid_field(
                "missing_fields",
                format!("expected strings, got {}", kind(item)),
            )
        })?;
        let name = name.trim();
        if !name.is_empty() && !result.iter().any(|existing| existing == name) {
            result.push(name.to_string());
        }
    }

    Ok(result)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
