use crate::entities::{normalize_entities, EntityDetector};
use crate::merge::merge_augmented;
use crate::relationships::derive_relationships;
use crate::rules::collect_business_rules;
use crate::users::ensure_user_entity;
use bddgen_core::{
    DesignError, DesignService, GeneratorConfig, NormalizedSpecification, RawSpecification,
    SpecError,
};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Upper bound for the single design-service call of a pass
    pub design_timeout: Duration,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            design_timeout: Duration::from_secs(120),
        }
    }
}

impl From<&GeneratorConfig> for NormalizerConfig {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            design_timeout: config.design.timeout(),
        }
    }
}

/// Linear normalization pipeline: entities, user guarantee, relationships, rules.
///
/// Holds no state between passes; one instance can serve any number of
/// specifications.
#[derive(Debug, Clone)]
pub struct Normalizer {
    detector: EntityDetector,
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new() -> Result<Self, SpecError> {
        Self::with_config(NormalizerConfig::default())
    }

    pub fn with_config(config: NormalizerConfig) -> Result<Self, SpecError> {
        Ok(Self {
            detector: EntityDetector::new()?,
            config,
        })
    }

    pub fn with_detector(detector: EntityDetector, config: NormalizerConfig) -> Self {
        Self { detector, config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn normalize(&self, raw: &RawSpecification) -> NormalizedSpecification {
        let mut warnings = Vec::new();

        let entities = ensure_user_entity(normalize_entities(raw, &self.detector, &mut warnings));
        let relationships = derive_relationships(raw, &entities, &mut warnings);
        let business_rules = collect_business_rules(raw, &mut warnings);

        info!(
            entities = entities.len(),
            relationships = relationships.len(),
            business_rules = business_rules.len(),
            "analyzed specification"
        );

        NormalizedSpecification {
            name: raw.name().map(str::to_string),
            description: raw.description().map(str::to_string),
            entities,
            relationships,
            business_rules,
            warnings,
        }
    }

    /// Augment through a design service once, then normalize.
    ///
    /// A failed or timed-out augmentation is recorded as a warning and the
    /// pass continues on the caller's document alone.
    pub async fn normalize_with_design(
        &self,
        raw: &RawSpecification,
        service: &dyn DesignService,
    ) -> NormalizedSpecification {
        match self.augment(raw, service).await {
            Ok(merged) => self.normalize(&merged),
            Err(err) => {
                warn!(
                    service = service.name(),
                    error = %err,
                    "design augmentation failed, using heuristics"
                );
                let mut spec = self.normalize(raw);
                spec.warnings.insert(0, format!("AI design unavailable: {}", err));
                spec
            }
        }
    }

    /// Merge the service's proposal into `raw`.
    ///
    /// Without a description there is nothing to design from and `raw` is
    /// returned unchanged.
    pub async fn augment(
        &self,
        raw: &RawSpecification,
        service: &dyn DesignService,
    ) -> Result<RawSpecification, DesignError> {
        let Some(description) = raw.description().filter(|d| !d.trim().is_empty()) else {
            debug!("no description, skipping design augmentation");
            return Ok(raw.clone());
        };

        info!(service = service.name(), "requesting design augmentation");
        let proposal = tokio::time::timeout(
            self.config.design_timeout,
            service.design_application(description),
        )
        .await
        .map_err(|_| DesignError::Timeout {
            seconds: self.config.design_timeout.as_secs(),
        })??;

        Ok(merge_augmented(raw, &proposal))
    }
}
