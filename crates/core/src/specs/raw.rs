use crate::errors::SpecError;
use crate::inflection::to_snake_case;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const ENTITIES: &str = "entities";
pub const RELATIONSHIPS: &str = "relationships";
pub const BUSINESS_RULES: &str = "business_rules";

const LIST_KEYS: [&str; 3] = [ENTITIES, RELATIONSHIPS, BUSINESS_RULES];

/// Loosely typed specification document as supplied by the caller.
///
/// Top-level keys and the structural keys of entity, relationship and
/// rule objects are canonicalized to snake_case on construction.
/// Attribute names nested under `attributes` are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawSpecification(Map<String, Value>);

impl RawSpecification {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut canonical = canonicalize_keys(map);

        for key in LIST_KEYS {
            if let Some(value) = canonical.remove(key) {
                canonical.insert(key.to_string(), canonicalize_list(value));
            }
        }

        Self(canonical)
    }

    /// Document holding only a free-text description
    pub fn from_description(text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(DESCRIPTION.to_string(), Value::String(text.into()));
        Self(map)
    }

    /// Accept a parsed JSON/YAML value, which must be a mapping
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(SpecError::invalid_format(value_kind(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: Value) {
        let key = to_snake_case(key.as_ref());
        let value = if LIST_KEYS.contains(&key.as_str()) {
            canonicalize_list(value)
        } else {
            value
        };
        self.0.insert(key, value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME).and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.get(DESCRIPTION).and_then(Value::as_str)
    }

    pub fn entities(&self) -> Option<&[Value]> {
        self.list(ENTITIES)
    }

    pub fn relationships(&self) -> Option<&[Value]> {
        self.list(RELATIONSHIPS)
    }

    pub fn business_rules(&self) -> Option<&[Value]> {
        self.list(BUSINESS_RULES)
    }

    fn list(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Absent, null, empty sequence or blank string
    pub fn is_blank(&self, key: &str) -> bool {
        match self.get(key) {
            None => true,
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl<'de> Deserialize<'de> for RawSpecification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

/// Short name of a JSON value's type, for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn canonicalize_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (to_snake_case(&key), value))
        .collect()
}

/// Lists accept a single scalar or object in place of a sequence
fn canonicalize_list(value: Value) -> Value {
    let items = match value {
        Value::Null => return Value::Null,
        Value::Array(items) => items,
        single => vec![single],
    };

    Value::Array(
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Value::Object(canonicalize_keys(map)),
                other => other,
            })
            .collect(),
    )
}
