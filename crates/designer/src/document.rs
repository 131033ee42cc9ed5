use bddgen_core::RawSpecification;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSketch {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_stories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub path: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub authentication: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundJob {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: Option<String>,
}

/// Typed view over a full design proposal.
///
/// Entities, relationships and rules stay as the service sent them; the
/// normalizer owns their interpretation. Sections that do not match the
/// expected shape are dropped element by element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub name: Option<String>,
    pub description: Option<String>,
    pub entities: Vec<Value>,
    pub relationships: Vec<Value>,
    pub business_rules: Vec<Value>,
    pub features: Vec<FeatureSketch>,
    pub api_endpoints: Vec<ApiEndpoint>,
    pub background_jobs: Vec<BackgroundJob>,
    pub security_considerations: Vec<String>,
}

impl DesignDocument {
    pub fn from_raw(raw: &RawSpecification) -> Self {
        Self {
            name: raw.name().map(str::to_string),
            description: raw.description().map(str::to_string),
            entities: raw.entities().map(<[Value]>::to_vec).unwrap_or_default(),
            relationships: raw.relationships().map(<[Value]>::to_vec).unwrap_or_default(),
            business_rules: raw.business_rules().map(<[Value]>::to_vec).unwrap_or_default(),
            features: typed_list(raw, "features"),
            api_endpoints: typed_list(raw, "api_endpoints"),
            background_jobs: typed_list(raw, "background_jobs"),
            security_considerations: typed_list(raw, "security_considerations"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.features.is_empty() && self.api_endpoints.is_empty()
    }
}

fn typed_list<T: DeserializeOwned>(raw: &RawSpecification, key: &str) -> Vec<T> {
    match raw.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_keeps_well_formed_sections() {
        let raw = RawSpecification::from_value(json!({
            "name": "Shop",
            "entities": [{"name": "product"}],
            "features": [{"name": "browse", "user_stories": ["As a shopper"]}, 42],
            "apiEndpoints": [{"path": "/api/v1/products", "method": "GET"}],
            "background_jobs": [{"name": "Restock", "schedule": "0 * * * *"}],
            "security_considerations": ["Rate limit login", {"odd": true}]
        }))
        .unwrap();

        let doc = DesignDocument::from_raw(&raw);
        assert_eq!(doc.name.as_deref(), Some("Shop"));
        assert_eq!(doc.entities.len(), 1);
        assert_eq!(doc.features.len(), 1);
        assert_eq!(doc.features[0].user_stories, vec!["As a shopper"]);
        assert_eq!(doc.api_endpoints[0].method, "GET");
        assert_eq!(doc.background_jobs[0].schedule.as_deref(), Some("0 * * * *"));
        assert_eq!(doc.security_considerations, vec!["Rate limit login"]);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_empty_raw_is_empty_document() {
        let doc = DesignDocument::from_raw(&RawSpecification::new());
        assert!(doc.is_empty());
        assert!(doc.relationships.is_empty());
    }
}
