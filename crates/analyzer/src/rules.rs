use bddgen_core::{BusinessRule, RawSpecification};
use tracing::warn;

pub const DEFAULT_BUSINESS_RULES: [&str; 3] = [
    "Users must authenticate to access the system",
    "All data is scoped to the current user",
    "Admins can manage all resources",
];

pub fn default_business_rules() -> Vec<BusinessRule> {
    DEFAULT_BUSINESS_RULES.iter().map(|r| BusinessRule::new(*r)).collect()
}

/// Explicit rules with non-empty text, or the fixed default set
pub fn collect_business_rules(
    raw: &RawSpecification,
    warnings: &mut Vec<String>,
) -> Vec<BusinessRule> {
    let explicit: Vec<BusinessRule> = raw
        .business_rules()
        .unwrap_or(&[])
        .iter()
        .filter_map(|value| match serde_json::from_value::<BusinessRule>(value.clone()) {
            Ok(rule) if !rule.text.trim().is_empty() => Some(BusinessRule {
                text: rule.text.trim().to_string(),
                entity: rule.entity,
            }),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "skipping business rule");
                warnings.push(format!("Skipped business rule: {}", e));
                None
            }
        })
        .collect();

    if explicit.is_empty() {
        default_business_rules()
    } else {
        explicit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect(value: serde_json::Value) -> Vec<BusinessRule> {
        let raw = RawSpecification::from_value(value).unwrap();
        collect_business_rules(&raw, &mut Vec::new())
    }

    #[test]
    fn test_defaults_when_absent_or_empty() {
        assert_eq!(collect(json!({})), default_business_rules());
        assert_eq!(collect(json!({"business_rules": []})), default_business_rules());
        assert_eq!(collect(json!({"business_rules": ["", "  "]})), default_business_rules());
        assert_eq!(default_business_rules().len(), 3);
    }

    #[test]
    fn test_explicit_rules_win() {
        let rules = collect(json!({"businessRules": [
            "Orders cannot be edited after shipping ",
            {"rule": "Books need an ISBN", "entity": "book"}
        ]}));
        assert_eq!(
            rules,
            vec![
                BusinessRule::new("Orders cannot be edited after shipping"),
                BusinessRule::for_entity("Books need an ISBN", "book"),
            ]
        );
    }
}
