use crate::inflection::{pluralize, to_pascal_case};
use crate::specs::types::AttributeMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Name of the entity every specification is guaranteed to contain
pub const USER_ENTITY: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub business_logic: Vec<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            name: name.into(),
            attributes,
            validations: Vec::new(),
            business_logic: Vec::new(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.name == USER_ENTITY
    }

    /// `order_item` -> `OrderItem`
    pub fn class_name(&self) -> String {
        to_pascal_case(&self.name)
    }

    /// `order_item` -> `order_items`
    pub fn table_name(&self) -> String {
        match self.name.rsplit_once('_') {
            Some((head, last)) => format!("{}_{}", head, pluralize(last)),
            None => pluralize(&self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    HasMany,
    HasOne,
    BelongsTo,
    HasAndBelongsToMany,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::HasMany => "has_many",
            RelationshipKind::HasOne => "has_one",
            RelationshipKind::BelongsTo => "belongs_to",
            RelationshipKind::HasAndBelongsToMany => "has_and_belongs_to_many",
        }
    }

    /// Parse `has_many`, `hasMany` or `has many` style spellings
    pub fn parse(name: &str) -> Option<Self> {
        let canonical: String = name
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match canonical.as_str() {
            "hasmany" => Some(RelationshipKind::HasMany),
            "hasone" => Some(RelationshipKind::HasOne),
            "belongsto" => Some(RelationshipKind::BelongsTo),
            "hasandbelongstomany" | "habtm" => Some(RelationshipKind::HasAndBelongsToMany),
            _ => None,
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RelationshipKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationshipKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        RelationshipKind::parse(&name).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown relationship kind '{}', expected has_many, has_one, belongs_to or has_and_belongs_to_many",
                name
            ))
        })
    }
}

/// Directed association between two entities.
///
/// Endpoint names are kept exactly as declared; they are not checked
/// against the entity list (see [`NormalizedSpecification::dangling_references`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RelationshipRecord")]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub kind: RelationshipKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_of: Option<String>,
}

/// Wire form of [`Relationship`]; `type` is accepted for `kind`, and
/// `kind` wins when both are present.
#[derive(Deserialize)]
struct RelationshipRecord {
    from: String,
    to: String,
    #[serde(default)]
    kind: Option<RelationshipKind>,
    #[serde(default, rename = "type")]
    type_name: Option<RelationshipKind>,
    #[serde(default)]
    through: Option<String>,
    #[serde(default)]
    dependent: Option<String>,
    #[serde(default)]
    inverse_of: Option<String>,
}

impl TryFrom<RelationshipRecord> for Relationship {
    type Error = String;

    fn try_from(record: RelationshipRecord) -> Result<Self, Self::Error> {
        let kind = record
            .kind
            .or(record.type_name)
            .ok_or_else(|| "missing field `kind`".to_string())?;
        Ok(Self {
            from: record.from,
            to: record.to,
            kind,
            through: record.through,
            dependent: record.dependent,
            inverse_of: record.inverse_of,
        })
    }
}

impl Relationship {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationshipKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            through: None,
            dependent: None,
            inverse_of: None,
        }
    }

    /// Default ownership association: `user has_many <entity>`
    pub fn ownership(entity: &str) -> Self {
        Self::new(USER_ENTITY, entity, RelationshipKind::HasMany)
    }
}

/// Human readable rule, optionally tagged with the entity it governs.
///
/// Untagged rules serialize as plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRule {
    pub text: String,
    pub entity: Option<String>,
}

impl BusinessRule {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity: None,
        }
    }

    pub fn for_entity(text: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity: Some(entity.into()),
        }
    }
}

impl fmt::Display for BusinessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(f, "[{}] {}", entity, self.text),
            None => f.write_str(&self.text),
        }
    }
}

impl Serialize for BusinessRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.entity {
            None => serializer.serialize_str(&self.text),
            Some(entity) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("text", &self.text)?;
                map.serialize_entry("entity", entity)?;
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BusinessRuleRepr {
    Text(String),
    Tagged {
        #[serde(alias = "rule", alias = "description")]
        text: String,
        #[serde(default)]
        entity: Option<String>,
    },
}

impl<'de> Deserialize<'de> for BusinessRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match BusinessRuleRepr::deserialize(deserializer)? {
            BusinessRuleRepr::Text(text) => BusinessRule::new(text),
            BusinessRuleRepr::Tagged { text, entity } => BusinessRule { text, entity },
        })
    }
}

/// Output of a normalization pass, consumed by artifact generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedSpecification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub business_rules: Vec<BusinessRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecSummary {
    pub entities: usize,
    pub relationships: usize,
    pub business_rules: usize,
}

impl NormalizedSpecification {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    /// Relationships naming an entity that is not declared.
    ///
    /// These are kept in the specification; callers decide what to do with them.
    pub fn dangling_references(&self) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| self.entity(&r.from).is_none() || self.entity(&r.to).is_none())
            .collect()
    }

    /// Relationships whose `from` side is the given entity
    pub fn associations_of(&self, entity: &str) -> Vec<&Relationship> {
        self.relationships.iter().filter(|r| r.from == entity).collect()
    }

    pub fn summary(&self) -> SpecSummary {
        SpecSummary {
            entities: self.entities.len(),
            relationships: self.relationships.len(),
            business_rules: self.business_rules.len(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
