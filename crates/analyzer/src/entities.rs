use bddgen_core::inflection::canonical_entity_name;
use bddgen_core::specs::value_kind;
use bddgen_core::{AttributeMap, Entity, RawSpecification, SemanticType, SpecError, USER_ENTITY};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Attributes given to entities declared without any
pub fn default_attributes() -> AttributeMap {
    [
        ("name", SemanticType::String),
        ("description", SemanticType::Text),
        ("status", SemanticType::String),
        ("active", SemanticType::Boolean),
        ("price", SemanticType::Decimal),
    ]
    .into_iter()
    .collect()
}

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "my", "your", "our", "their", "his", "her", "its", "this", "that", "these",
    "those", "all", "each", "every", "some", "any", "of", "to", "in", "on", "at", "by", "from",
    "and", "or", "with", "for", "app", "application", "system", "platform", "tool", "website",
    "site", "service", "data", "easy", "simple", "basic", "better", "efficient",
];

/// How the capture group of a [`DetectionRule`] is turned into names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The capture is one noun
    Single,
    /// The capture is a list separated by commas and `and`
    List,
}

#[derive(Debug, Clone)]
pub struct DetectionRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub extraction: Extraction,
}

impl DetectionRule {
    pub fn new(
        name: &'static str,
        pattern: &str,
        extraction: Extraction,
    ) -> Result<Self, SpecError> {
        let pattern = Regex::new(pattern).map_err(|e| {
            SpecError::codegen(format!("invalid detection pattern '{}': {}", name, e))
        })?;
        Ok(Self {
            name,
            pattern,
            extraction,
        })
    }
}

/// Ordered free-text heuristics that pick entity names out of a description.
///
/// Every rule scans the whole description before the next one runs, so
/// names found by earlier rules come first.
#[derive(Debug, Clone)]
pub struct EntityDetector {
    rules: Vec<DetectionRule>,
    list_separator: Regex,
}

impl EntityDetector {
    pub fn new() -> Result<Self, SpecError> {
        Self::with_rules(vec![
            DetectionRule::new(
                "verb-object",
                r"(?i)\b(?:manage|track|store)\s+(\w+)",
                Extraction::Single,
            )?,
            DetectionRule::new(
                "noun-activity",
                r"(?i)\b(\w+)\s+(?:management|tracking|collection)\b",
                Extraction::Single,
            )?,
            DetectionRule::new(
                "enumeration",
                r"(?i)\b(?:with|including|for)\s+(?:(?:a|an|the|my|your|our|their)\s+)?(\w+(?:\s*,\s*(?:and\s+)?\w+)*(?:\s*,?\s+and\s+\w+)?)",
                Extraction::List,
            )?,
        ])
    }

    pub fn with_rules(rules: Vec<DetectionRule>) -> Result<Self, SpecError> {
        let list_separator = Regex::new(r"(?i)\s*(?:,|\band\b)\s*")
            .map_err(|e| SpecError::codegen(format!("invalid list separator: {}", e)))?;
        Ok(Self {
            rules,
            list_separator,
        })
    }

    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    /// Canonical entity names found in `description`, first-seen order, no duplicates.
    ///
    /// A detected `user` is dropped; the canonical user entity is injected later.
    pub fn detect(&self, description: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for rule in &self.rules {
            for captures in rule.pattern.captures_iter(description) {
                let Some(capture) = captures.get(1) else {
                    continue;
                };

                let words: Vec<&str> = match rule.extraction {
                    Extraction::Single => vec![capture.as_str()],
                    Extraction::List => self
                        .list_separator
                        .split(capture.as_str())
                        .map(str::trim)
                        .filter(|w| !w.is_empty())
                        .collect(),
                };

                for word in words {
                    let lowered = word.to_lowercase();
                    if STOP_WORDS.contains(&lowered.as_str())
                        || lowered.ends_with("ing")
                        || lowered.chars().all(|c| c.is_ascii_digit())
                    {
                        continue;
                    }

                    let name = canonical_entity_name(&lowered);
                    if name.is_empty() || name == USER_ENTITY {
                        continue;
                    }

                    if seen.insert(name.clone()) {
                        debug!(rule = rule.name, entity = %name, "detected entity");
                        names.push(name);
                    }
                }
            }
        }

        names
    }
}

/// Entity for a bare name: canonical name and the default attribute set
pub fn bare_entity(name: &str) -> Option<Entity> {
    let name = canonical_entity_name(name);
    if name.is_empty() {
        return None;
    }
    Some(Entity::new(name, default_attributes()))
}

/// Normalize one declaration, either an object or a bare string.
///
/// Returns a human-readable reason when the declaration cannot be used.
pub fn normalize_entity(declaration: &Value) -> Result<Entity, String> {
    match declaration {
        Value::String(name) => {
            bare_entity(name).ok_or_else(|| "entity with an empty name".to_string())
        }
        Value::Object(fields) => {
            let name = fields
                .get("name")
                .and_then(Value::as_str)
                .map(canonical_entity_name)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| "entity object without a name".to_string())?;

            let attributes = fields
                .get("attributes")
                .map(attributes_from_value)
                .filter(|attrs| !attrs.is_empty())
                .unwrap_or_else(default_attributes);

            let mut entity = Entity::new(name, attributes);
            entity.validations = string_list(fields.get("validations"));
            entity.business_logic = string_list(fields.get("business_logic"));
            Ok(entity)
        }
        other => Err(format!(
            "unsupported entity declaration of type {}",
            value_kind(other)
        )),
    }
}

/// Accepts `{attr: "type"}`, `{attr: {type: "..."}}` or `["attr", ...]`
fn attributes_from_value(value: &Value) -> AttributeMap {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(name, kind)| {
                let kind = kind
                    .as_str()
                    .or_else(|| kind.get("type").and_then(Value::as_str))
                    .map(SemanticType::parse_lenient)
                    .unwrap_or(SemanticType::String);
                (name.clone(), kind)
            })
            .collect(),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .map(|name| (name.to_string(), SemanticType::String))
            .collect(),
        _ => AttributeMap::new(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(single)) if !single.trim().is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

/// Canonical entity list for a raw specification.
///
/// An explicit `entities` key is authoritative, even when empty; only
/// its absence triggers detection over the description.
pub fn normalize_entities(
    raw: &RawSpecification,
    detector: &EntityDetector,
    warnings: &mut Vec<String>,
) -> Vec<Entity> {
    let candidates: Vec<Entity> = match raw.entities() {
        Some(declarations) => declarations
            .iter()
            .enumerate()
            .filter_map(|(index, declaration)| match normalize_entity(declaration) {
                Ok(entity) => Some(entity),
                Err(reason) => {
                    warn!(index, %reason, "skipping entity declaration");
                    warnings.push(format!("Skipped entity #{}: {}", index + 1, reason));
                    None
                }
            })
            .collect(),
        None => detector
            .detect(raw.description().unwrap_or(""))
            .iter()
            .filter_map(|name| bare_entity(name))
            .collect(),
    };

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|entity| {
            let first = seen.insert(entity.name.clone());
            if !first {
                warn!(entity = %entity.name, "dropping duplicate entity");
                warnings.push(format!("Duplicate entity '{}' ignored", entity.name));
            }
            first
        })
        .collect()
}
