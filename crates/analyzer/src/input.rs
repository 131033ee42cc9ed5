use bddgen_core::specs::value_kind;
use bddgen_core::{RawSpecification, SpecError};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Caller-supplied specification before format detection
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Already structured mapping
    Structured(Map<String, Value>),
    /// File path, inline JSON, or a free-text description
    Text(String),
}

impl RawInput {
    /// Classify an arbitrary JSON value; only mappings and strings are accepted
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        match value {
            Value::Object(map) => Ok(RawInput::Structured(map)),
            Value::String(text) => Ok(RawInput::Text(text)),
            other => Err(SpecError::invalid_format(value_kind(&other))),
        }
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        RawInput::Text(text)
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        RawInput::Text(text.to_string())
    }
}

impl From<Map<String, Value>> for RawInput {
    fn from(map: Map<String, Value>) -> Self {
        RawInput::Structured(map)
    }
}

/// Resolve any accepted input shape into a raw specification document.
pub fn parse(input: RawInput) -> Result<RawSpecification, SpecError> {
    match input {
        RawInput::Structured(map) => Ok(RawSpecification::from_map(map)),
        RawInput::Text(text) => parse_text(&text),
    }
}

/// Shorthand for `parse(RawInput::from_value(value)?)`
pub fn parse_value(value: Value) -> Result<RawSpecification, SpecError> {
    parse(RawInput::from_value(value)?)
}

fn parse_text(text: &str) -> Result<RawSpecification, SpecError> {
    let path = Path::new(text.trim());
    if !text.trim().is_empty() && path.is_file() {
        debug!(path = %path.display(), "reading specification file");
        let content = fs::read_to_string(path)?;
        return parse_document(&content);
    }

    if text.trim_start().starts_with('{') {
        debug!("parsing inline JSON specification");
        let value: Value = serde_json::from_str(text)?;
        return RawSpecification::from_value(value);
    }

    debug!("treating input as free-text description");
    Ok(RawSpecification::from_description(text))
}

/// File contents: JSON when it opens with `{`, YAML otherwise
fn parse_document(content: &str) -> Result<RawSpecification, SpecError> {
    let value: Value = if content.trim_start().starts_with('{') {
        serde_json::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };
    RawSpecification::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_input_is_returned_as_is() {
        let map = json!({"name": "Shop", "entities": ["book"]})
            .as_object()
            .cloned()
            .unwrap();
        let raw = parse(RawInput::Structured(map)).unwrap();
        assert_eq!(raw.name(), Some("Shop"));
        assert_eq!(raw.entities().unwrap().len(), 1);
    }

    #[test]
    fn test_inline_json() {
        let raw = parse(r#"{"entities": ["card", "deck"]}"#.into()).unwrap();
        assert_eq!(raw.entities().unwrap().len(), 2);
        assert!(raw.description().is_none());
    }

    #[test]
    fn test_free_text() {
        let raw = parse("Simple todo list".into()).unwrap();
        assert_eq!(raw.description(), Some("Simple todo list"));
        assert_eq!(raw.keys().count(), 1);
    }

    #[test]
    fn test_malformed_inline_json_is_an_error() {
        let err = parse("{not json".into()).unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
    }

    #[test]
    fn test_non_mapping_values_are_rejected() {
        for value in [json!(42), json!(true), json!(null), json!(["book"])] {
            let err = parse_value(value).unwrap_err();
            assert!(err.is_invalid_format());
        }
    }

    #[test]
    fn test_bracketed_text_is_a_description() {
        // only `{` switches to JSON
        let raw = parse("[1, 2]".into()).unwrap();
        assert_eq!(raw.description(), Some("[1, 2]"));
    }
}
