//! Tool-call entry point: one JSON request on stdin, one JSON payload on stdout.

use crate::commands::{design, generate};
use crate::payload::{to_value, FailurePayload};
use bddgen_analyzer::RawInput;
use bddgen_core::GeneratorConfig;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::debug;

pub const GENERATE_APP: &str = "generate_app";
pub const DESIGN_APP: &str = "design_app";

/// Tool names accepted from earlier callers of the protocol
const GENERATE_ALIASES: &[&str] = &["generate_rails_app"];
const DESIGN_ALIASES: &[&str] = &["design_rails_app"];

#[derive(Debug, Deserialize)]
pub struct ToolRequest {
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub params: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ToolParams {
    description: Option<String>,
    specification: Option<Value>,
    output_path: Option<PathBuf>,
    use_ai: Option<bool>,
}

/// Parse a request body and dispatch it
pub async fn run(body: &str, config: &GeneratorConfig) -> Value {
    match serde_json::from_str::<ToolRequest>(body) {
        Ok(request) => dispatch(request, config).await,
        Err(e) => to_value(&FailurePayload::new(format!("Invalid request: {}", e))),
    }
}

pub async fn dispatch(request: ToolRequest, config: &GeneratorConfig) -> Value {
    let tool = request.tool.as_deref().unwrap_or(GENERATE_APP);
    debug!(tool, "dispatching tool call");

    let params: ToolParams = match serde_json::from_value(Value::Object(request.params)) {
        Ok(params) => params,
        Err(e) => return to_value(&FailurePayload::new(format!("Invalid params: {}", e))),
    };

    let result = match tool {
        GENERATE_APP => generate_app(params, config).await,
        DESIGN_APP => design_app(params, config).await,
        alias if GENERATE_ALIASES.contains(&alias) => generate_app(params, config).await,
        alias if DESIGN_ALIASES.contains(&alias) => design_app(params, config).await,
        other => return to_value(&FailurePayload::new(format!("Unknown tool: {}", other))),
    };

    result.unwrap_or_else(|err| to_value(&FailurePayload::from_error(&err)))
}

async fn generate_app(params: ToolParams, config: &GeneratorConfig) -> anyhow::Result<Value> {
    let input = match (params.description, params.specification) {
        (Some(description), _) => RawInput::Text(description),
        (None, Some(specification)) => RawInput::from_value(specification)?,
        (None, None) => anyhow::bail!("Either description or specification is required"),
    };

    let options = generate::GenerateOptions {
        output: params.output_path,
        use_ai: params.use_ai.unwrap_or(true),
        ..generate::GenerateOptions::new(input)
    };
    Ok(to_value(&generate::run(options, config).await?))
}

async fn design_app(params: ToolParams, config: &GeneratorConfig) -> anyhow::Result<Value> {
    let description = params.description.unwrap_or_default();
    Ok(to_value(&design::run(&description, config).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::is_success;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_generate_app_is_default_tool() {
        let dir = TempDir::new().unwrap();
        let body = json!({
            "params": {
                "specification": {"entities": ["card", "deck"]},
                "output_path": dir.path().join("cards"),
                "use_ai": false
            }
        });

        let payload = run(&body.to_string(), &GeneratorConfig::testing()).await;
        assert!(is_success(&payload));
        assert_eq!(payload["entities_created"], 3);
        assert!(dir.path().join("cards/specification.yaml").exists());
    }

    #[tokio::test]
    async fn test_legacy_tool_names_are_accepted() {
        let dir = TempDir::new().unwrap();
        let body = json!({
            "tool": "generate_rails_app",
            "params": {
                "description": "manage books",
                "output_path": dir.path().join("books"),
                "use_ai": false
            }
        });

        let payload = run(&body.to_string(), &GeneratorConfig::testing()).await;
        assert!(is_success(&payload));
        assert_eq!(payload["entities_created"], 2);

        let design = run(
            r#"{"tool": "design_rails_app", "params": {"description": "A bookshop"}}"#,
            &GeneratorConfig::testing(),
        )
        .await;
        assert_eq!(design["error"], "ANTHROPIC_API_KEY is required for AI design");
    }

    #[tokio::test]
    async fn test_missing_input_fails() {
        let payload = run(
            r#"{"tool": "generate_app", "params": {}}"#,
            &GeneratorConfig::testing(),
        )
        .await;
        assert!(!is_success(&payload));
        assert_eq!(payload["error"], "Either description or specification is required");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let payload = run(r#"{"tool": "deploy_app"}"#, &GeneratorConfig::testing()).await;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "Unknown tool: deploy_app");
    }

    #[tokio::test]
    async fn test_design_app_without_key_has_hint() {
        let payload = run(
            r#"{"tool": "design_app", "params": {"description": "A bookshop"}}"#,
            &GeneratorConfig::testing(),
        )
        .await;
        assert_eq!(payload["success"], false);
        assert!(payload["hint"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let payload = run("not json", &GeneratorConfig::testing()).await;
        assert!(payload["error"].as_str().unwrap().starts_with("Invalid request"));
    }
}
