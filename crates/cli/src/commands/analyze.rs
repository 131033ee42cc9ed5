use crate::payload::AnalyzePayload;
use anyhow::Context;
use bddgen_analyzer::{parse, Normalizer, RawInput};
use tracing::warn;

/// Heuristic normalization only, no design service and no files written
pub fn run(input: RawInput) -> anyhow::Result<AnalyzePayload> {
    let raw = parse(input).context("Could not read specification")?;
    let spec = Normalizer::new()?.normalize(&raw);

    for relationship in spec.dangling_references() {
        warn!(
            from = %relationship.from,
            to = %relationship.to,
            "undeclared entity in relationship"
        );
    }
    Ok(AnalyzePayload::from(spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_reports_summary() {
        let payload = run(RawInput::from("An app to manage books")).unwrap();
        assert!(payload.success);
        assert_eq!(payload.summary.entities, 2);
        assert_eq!(payload.specification.entity_names(), vec!["user", "book"]);
    }

    #[test]
    fn test_analyze_skips_unusable_entities() {
        let input = RawInput::from_value(serde_json::json!({"entities": 3})).unwrap();
        let payload = run(input).unwrap();
        assert_eq!(payload.specification.entity_names(), vec!["user"]);
    }
}
