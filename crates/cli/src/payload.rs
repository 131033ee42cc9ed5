use bddgen_core::{DesignError, NormalizedSpecification, SpecSummary};
use bddgen_designer::DesignDocument;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Result of `generate` / `generate_app`
#[derive(Debug, Serialize)]
pub struct GeneratePayload {
    pub success: bool,
    pub app_path: String,
    pub entities_created: usize,
    pub relationships_created: usize,
    pub business_rules: Vec<String>,
    pub features_generated: usize,
    pub warnings: Vec<String>,
    pub next_steps: Vec<String>,
}

impl GeneratePayload {
    pub fn new(
        app_path: &Path,
        spec: &NormalizedSpecification,
        features_generated: usize,
        warnings: Vec<String>,
    ) -> Self {
        let path = app_path.display().to_string();
        let mut next_steps = vec![
            format!("cd {}", path),
            "Review the generated specification".to_string(),
        ];
        if features_generated > 0 {
            next_steps.push(
                "Implement the step definitions under features/step_definitions".to_string(),
            );
            next_steps.push("cucumber".to_string());
        } else {
            next_steps.push(
                "Re-run with --features and an API key to synthesize BDD features".to_string(),
            );
        }

        Self {
            success: true,
            app_path: path,
            entities_created: spec.entities.len(),
            relationships_created: spec.relationships.len(),
            business_rules: spec.business_rules.iter().map(ToString::to_string).collect(),
            features_generated,
            warnings,
            next_steps,
        }
    }
}

/// Result of `design` / `design_app`
#[derive(Debug, Serialize)]
pub struct DesignPayload {
    pub success: bool,
    #[serde(flatten)]
    pub document: DesignDocument,
}

impl From<DesignDocument> for DesignPayload {
    fn from(document: DesignDocument) -> Self {
        Self {
            success: true,
            document,
        }
    }
}

/// Result of `analyze`
#[derive(Debug, Serialize)]
pub struct AnalyzePayload {
    pub success: bool,
    pub summary: SpecSummary,
    pub specification: NormalizedSpecification,
}

impl From<NormalizedSpecification> for AnalyzePayload {
    fn from(specification: NormalizedSpecification) -> Self {
        Self {
            success: true,
            summary: specification.summary(),
            specification,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailurePayload {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FailurePayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            hint: None,
        }
    }

    /// Failure payload for any error reaching the top level.
    /// Design errors anywhere in the chain contribute their hint.
    pub fn from_error(error: &anyhow::Error) -> Self {
        let hint = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<DesignError>())
            .and_then(DesignError::hint)
            .map(str::to_string);

        Self {
            success: false,
            error: format!("{:#}", error),
            hint,
        }
    }
}

/// Serialize any payload for stdout
pub fn to_value<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or_else(|e| {
        serde_json::json!({ "success": false, "error": format!("payload serialization: {}", e) })
    })
}

pub fn is_success(payload: &Value) -> bool {
    payload.get("success").and_then(Value::as_bool).unwrap_or(false)
}
