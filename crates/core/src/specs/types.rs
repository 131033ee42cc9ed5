use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Semantic attribute type understood by downstream generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    String,
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    Datetime,
}

impl SemanticType {
    pub const ALL: [SemanticType; 7] = [
        SemanticType::String,
        SemanticType::Text,
        SemanticType::Integer,
        SemanticType::Decimal,
        SemanticType::Boolean,
        SemanticType::Date,
        SemanticType::Datetime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Text => "text",
            SemanticType::Integer => "integer",
            SemanticType::Decimal => "decimal",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::Datetime => "datetime",
        }
    }

    /// Parse a type name, accepting common aliases.
    ///
    /// Unknown names resolve to `String`; this never fails because
    /// type names come from free-form user or model input.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "string" | "varchar" | "str" => SemanticType::String,
            "text" => SemanticType::Text,
            "integer" | "int" | "bigint" => SemanticType::Integer,
            "decimal" | "float" | "number" | "money" | "numeric" => SemanticType::Decimal,
            "boolean" | "bool" => SemanticType::Boolean,
            "date" => SemanticType::Date,
            "datetime" | "timestamp" | "time" => SemanticType::Datetime,
            other => {
                tracing::debug!(type_name = other, "unknown attribute type, using string");
                SemanticType::String
            }
        }
    }

    /// Storage column kind for migrations
    pub fn column_kind(&self) -> &'static str {
        match self {
            SemanticType::String => "VARCHAR(255)",
            SemanticType::Text => "TEXT",
            SemanticType::Integer => "INTEGER",
            SemanticType::Decimal => "DECIMAL(10, 2)",
            SemanticType::Boolean => "BOOLEAN",
            SemanticType::Date => "DATE",
            SemanticType::Datetime => "TIMESTAMPTZ",
        }
    }

    /// Form input kind for generated views
    pub fn form_field(&self) -> &'static str {
        match self {
            SemanticType::String => "text_field",
            SemanticType::Text => "text_area",
            SemanticType::Integer | SemanticType::Decimal => "number_field",
            SemanticType::Boolean => "check_box",
            SemanticType::Date => "date_field",
            SemanticType::Datetime => "datetime_field",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SemanticType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SemanticType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(SemanticType::parse_lenient(&name))
    }
}

/// Ordered attribute name -> type mapping.
///
/// Serializes as a plain object; declaration order survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap(Vec<(String, SemanticType)>);

impl AttributeMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace an attribute; replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, kind: SemanticType) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = kind,
            None => self.0.push((name, kind)),
        }
    }

    pub fn get(&self, name: &str) -> Option<SemanticType> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, k)| *k)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SemanticType)> {
        self.0.iter().map(|(n, k)| (n.as_str(), *k))
    }
}

impl<N: Into<String>> FromIterator<(N, SemanticType)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (N, SemanticType)>>(iter: I) -> Self {
        let mut map = AttributeMap::new();
        for (name, kind) in iter {
            map.insert(name, kind);
        }
        map
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, kind) in &self.0 {
            map.serialize_entry(name, kind)?;
        }
        map.end()
    }
}

struct AttributeMapVisitor;

impl<'de> Visitor<'de> for AttributeMapVisitor {
    type Value = AttributeMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of attribute names to types")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut attributes = AttributeMap::new();
        while let Some((name, kind)) = access.next_entry::<String, SemanticType>()? {
            attributes.insert(name, kind);
        }
        Ok(attributes)
    }
}

impl<'de> Deserialize<'de> for AttributeMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributeMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient_aliases() {
        assert_eq!(SemanticType::parse_lenient("int"), SemanticType::Integer);
        assert_eq!(SemanticType::parse_lenient("Float"), SemanticType::Decimal);
        assert_eq!(SemanticType::parse_lenient("timestamp"), SemanticType::Datetime);
        assert_eq!(SemanticType::parse_lenient("references"), SemanticType::String);
    }

    #[test]
    fn test_attribute_map_preserves_order() {
        let json = r#"{"title": "string", "body": "text", "pages": "integer", "at": "date"}"#;
        let attrs: AttributeMap = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = attrs.names().collect();
        assert_eq!(names, vec!["title", "body", "pages", "at"]);
        assert_eq!(
            serde_json::to_string(&attrs).unwrap(),
            r#"{"title":"string","body":"text","pages":"integer","at":"date"}"#
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut attrs: AttributeMap = [("a", SemanticType::String), ("b", SemanticType::Text)]
            .into_iter()
            .collect();
        attrs.insert("a", SemanticType::Boolean);
        assert_eq!(attrs.iter().next(), Some(("a", SemanticType::Boolean)));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_column_and_form_kinds() {
        assert_eq!(SemanticType::Decimal.column_kind(), "DECIMAL(10, 2)");
        assert_eq!(SemanticType::Boolean.form_field(), "check_box");
        assert_eq!(SemanticType::ALL.len(), 7);
    }
}
