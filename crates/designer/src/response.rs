use bddgen_core::{DesignError, FeatureFile, RawSpecification};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

const MAX_SCRAPED_RULES: usize = 10;
const SCRAPED_APP_NAME: &str = "GeneratedApp";

/// Slice from the first `{` to the last `}`, if both exist in order
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Replace raw control characters with spaces so models that emit literal
/// newlines inside strings still produce parseable JSON
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_control() { ' ' } else { c })
        .collect()
}

#[derive(Deserialize)]
struct FeatureEnvelope {
    #[serde(default)]
    features: Vec<FeatureFile>,
}

/// Turns free-form completion text into structured design output
pub struct ResponseParser {
    entity_mention: Regex,
    rule_line: Regex,
    list_marker: Regex,
    feature_pair: Regex,
    feature_heading: Regex,
}

impl ResponseParser {
    pub fn new() -> Result<Self, DesignError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| DesignError::configuration(e.to_string()))
        };
        Ok(Self {
            entity_mention: compile(r"(?i)\b(?:model|entity|resource|table)\s+(\w+)")?,
            rule_line: compile(r"(?i)\b(?:must|should|needs?|requires?|validates?)\b")?,
            list_marker: compile(r"^(?:[-*•]|\d+[.)])\s*")?,
            feature_pair: compile(
                r#"(?s)"name"\s*:\s*"((?:[^"\\]|\\.)*)".*?"content"\s*:\s*"((?:[^"\\]|\\.)*)""#,
            )?,
            feature_heading: compile(r"(?m)^[ \t]*Feature:")?,
        })
    }

    /// Parse a design completion. Falls back to scraping entity mentions
    /// and rule-like lines when no usable JSON object is present.
    pub fn parse_design(&self, text: &str) -> Result<RawSpecification, DesignError> {
        if let Some(block) = extract_json_block(text) {
            match serde_json::from_str::<Value>(&strip_control_chars(block)) {
                Ok(Value::Object(map)) => return Ok(RawSpecification::from_map(map)),
                Ok(other) => warn!("design response JSON was not an object: {}", other),
                Err(e) => warn!("design response JSON did not parse: {}", e),
            }
        }

        debug!("scraping design response text");
        self.scrape_design(text)
    }

    fn scrape_design(&self, text: &str) -> Result<RawSpecification, DesignError> {
        let mut names: Vec<String> = Vec::new();
        for caps in self.entity_mention.captures_iter(text) {
            let name = caps[1].to_lowercase();
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let rules: Vec<String> = text
            .lines()
            .filter(|line| self.rule_line.is_match(line))
            .map(|line| self.list_marker.replace(line.trim(), "").trim().to_string())
            .filter(|line| !line.is_empty())
            .take(MAX_SCRAPED_RULES)
            .collect();

        if names.is_empty() && rules.is_empty() {
            return Err(DesignError::malformed(
                "no JSON object, entity mention, or rule found",
            ));
        }

        let entities: Vec<Value> = names
            .into_iter()
            .map(|name| {
                json!({
                    "name": name,
                    "attributes": { "name": "string", "description": "text" }
                })
            })
            .collect();

        let mut map = Map::new();
        map.insert("name".into(), Value::from(SCRAPED_APP_NAME));
        if let Some(first) = text.lines().map(str::trim).find(|l| !l.is_empty()) {
            map.insert("description".into(), Value::from(first));
        }
        map.insert("entities".into(), Value::Array(entities));
        map.insert("relationships".into(), Value::Array(Vec::new()));
        map.insert(
            "business_rules".into(),
            Value::Array(rules.into_iter().map(Value::from).collect()),
        );
        Ok(RawSpecification::from_map(map))
    }

    /// Parse a feature completion. Tries the JSON envelope, then loose
    /// `name`/`content` pairs, then plain `Feature:` sections.
    pub fn parse_features(&self, text: &str) -> Vec<FeatureFile> {
        if let Some(block) = extract_json_block(text) {
            match serde_json::from_str::<FeatureEnvelope>(&strip_control_chars(block)) {
                Ok(envelope) => return envelope.features,
                Err(e) => {
                    warn!("feature response JSON did not parse: {}", e);
                    let pairs = self.scrape_feature_pairs(block);
                    if !pairs.is_empty() {
                        return pairs;
                    }
                }
            }
        }
        self.split_feature_sections(text)
    }

    fn scrape_feature_pairs(&self, text: &str) -> Vec<FeatureFile> {
        self.feature_pair
            .captures_iter(text)
            .map(|caps| FeatureFile::new(unescape(&caps[1]), unescape(&caps[2])))
            .collect()
    }

    fn split_feature_sections(&self, text: &str) -> Vec<FeatureFile> {
        let headings: Vec<_> = self.feature_heading.find_iter(text).collect();
        headings
            .iter()
            .enumerate()
            .filter_map(|(i, heading)| {
                let end = headings.get(i + 1).map_or(text.len(), |next| next.start());
                let body = text[heading.end()..end].trim();
                if body.is_empty() {
                    return None;
                }
                let name = body.lines().next().unwrap_or_default().trim();
                Some(FeatureFile::new(name, format!("Feature: {}", body)))
            })
            .collect()
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ResponseParser {
        ResponseParser::new().unwrap()
    }

    #[test]
    fn test_extract_json_block() {
        assert_eq!(extract_json_block("Here: {\"a\": {}} done"), Some("{\"a\": {}}"));
        assert_eq!(extract_json_block("no braces"), None);
        assert_eq!(extract_json_block("} backwards {"), None);
    }

    #[test]
    fn test_strip_control_chars() {
        assert_eq!(strip_control_chars("a\nb\tc\u{7f}d"), "a b c d");
        assert_eq!(strip_control_chars("caf\u{e9} \u{85}"), "caf\u{e9} \u{85}");
    }

    #[test]
    fn test_design_json_with_preamble() {
        let text = "Sure! Here is the design:\n{\"name\": \"Shop\", \"entities\": [\"product\"], \"businessRules\": [\"x\"]}\nHope it helps.";
        let raw = parser().parse_design(text).unwrap();
        assert_eq!(raw.name(), Some("Shop"));
        assert_eq!(raw.entities().unwrap().len(), 1);
        assert!(raw.business_rules().is_some());
    }

    #[test]
    fn test_design_json_with_literal_newline_in_string() {
        let text = "{\"name\": \"Shop\", \"description\": \"line one\nline two\"}";
        let raw = parser().parse_design(text).unwrap();
        assert_eq!(raw.description(), Some("line one line two"));
    }

    #[test]
    fn test_design_falls_back_to_scraping() {
        let text = "The app needs a model Product and an entity Order.\n- Orders must have a total\n- Products should be priced\nThanks";
        let raw = parser().parse_design(text).unwrap();

        assert_eq!(raw.name(), Some(SCRAPED_APP_NAME));
        let entities = raw.entities().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0]["name"], "product");
        assert_eq!(entities[1]["attributes"]["description"], "text");

        let rules = raw.business_rules().unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[1], "Orders must have a total");
    }

    #[test]
    fn test_scraped_rules_are_capped() {
        let text = (0..15)
            .map(|i| format!("Rule {} must hold", i))
            .collect::<Vec<_>>()
            .join("\n");
        let raw = parser().parse_design(&text).unwrap();
        assert_eq!(raw.business_rules().unwrap().len(), MAX_SCRAPED_RULES);
    }

    #[test]
    fn test_design_without_anything_usable_is_malformed() {
        let err = parser().parse_design("I cannot help with that.").unwrap_err();
        assert!(matches!(err, DesignError::MalformedResponse { .. }));
    }

    #[test]
    fn test_features_from_json() {
        let text = r#"{"features": [{"name": "Books", "content": "Feature: Books\n  Scenario: list", "step_definitions": "Given(/x/) {}"}]}"#;
        let features = parser().parse_features(text);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].content, "Feature: Books\n  Scenario: list");
        assert!(!features[0].step_definitions.is_empty());
    }

    #[test]
    fn test_features_from_broken_json_pairs() {
        let text = r#"{"features": [{"name": "Books", "content": "Feature: Books\n  Scenario: \"quoted\""}, {"name": "Orders", "content": "Feature: Orders"},]}"#;
        let features = parser().parse_features(text);
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].content, "Feature: Books\n  Scenario: \"quoted\"");
        assert_eq!(features[1].name, "Orders");
    }

    #[test]
    fn test_features_from_plain_text() {
        let text = "Here you go\nFeature: Books\n  Scenario: list books\n\nFeature: Orders\n  Scenario: place order\n";
        let features = parser().parse_features(text);
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "Books");
        assert!(features[0].content.starts_with("Feature: Books"));
        assert!(features[1].content.contains("place order"));
    }

    #[test]
    fn test_features_from_nothing() {
        assert!(parser().parse_features("no features here").is_empty());
    }
}
