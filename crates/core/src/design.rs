use crate::errors::DesignError;
use crate::inflection::to_snake_case;
use crate::specs::{NormalizedSpecification, RawSpecification};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// BDD acceptance feature proposed by a design service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFile {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub step_definitions: String,
}

impl FeatureFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            step_definitions: String::new(),
        }
    }

    /// File name under `features/`, e.g. `book_management.feature`
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        let stem = to_snake_case(&stem);
        if stem.is_empty() {
            "feature.feature".to_string()
        } else {
            format!("{}.feature", stem)
        }
    }
}

/// External service that proposes a design from a free-text description.
///
/// Implementations may block on the network; callers are expected to
/// bound them with a timeout and treat every error as non-fatal.
#[async_trait]
pub trait DesignService: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Propose name, entities, relationships and business rules
    async fn design_application(&self, description: &str)
        -> Result<RawSpecification, DesignError>;

    /// Propose BDD acceptance features for a normalized specification
    async fn synthesize_features(
        &self,
        spec: &NormalizedSpecification,
    ) -> Result<Vec<FeatureFile>, DesignError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_file_name() {
        assert_eq!(
            FeatureFile::new("Book Management", "").file_name(),
            "book_management.feature"
        );
        assert_eq!(FeatureFile::new("orders/checkout", "").file_name(), "orders_checkout.feature");
        assert_eq!(FeatureFile::new("???", "").file_name(), "feature.feature");
    }
}
