pub mod config;
pub mod design;
pub mod errors;
pub mod inflection;
pub mod specs;

pub use config::{
    AppConfigTrait, ConfigError, ConfigSource, DesignConfig, Environment, GeneratorConfig,
    LogFormat,
};
pub use design::{DesignService, FeatureFile};
pub use errors::{DesignError, SpecError};
pub use specs::{
    AttributeMap, BusinessRule, Entity, NormalizedSpecification, RawSpecification, Relationship,
    RelationshipKind, SemanticType, SpecSummary, USER_ENTITY,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name used in logs and generated payloads
pub const TOOL_NAME: &str = "bddgen";
