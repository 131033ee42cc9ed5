pub mod entities;
pub mod input;
pub mod merge;
pub mod normalizer;
pub mod relationships;
pub mod rules;
pub mod users;
pub mod writer;

pub use entities::{default_attributes, DetectionRule, EntityDetector, Extraction};
pub use input::{parse, parse_value, RawInput};
pub use merge::merge_augmented;
pub use normalizer::{Normalizer, NormalizerConfig};
pub use rules::DEFAULT_BUSINESS_RULES;
pub use users::{default_user_entity, ensure_user_entity};
pub use writer::{ArtifactWriter, OutputFormat};

use bddgen_core::{NormalizedSpecification, SpecError};

/// Parse and normalize in one step, heuristics only
pub fn analyze(input: impl Into<RawInput>) -> Result<NormalizedSpecification, SpecError> {
    let raw = parse(input.into())?;
    Ok(Normalizer::new()?.normalize(&raw))
}
