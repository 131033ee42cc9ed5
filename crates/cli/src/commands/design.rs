use crate::payload::DesignPayload;
use anyhow::Context;
use bddgen_core::{DesignError, GeneratorConfig};
use bddgen_designer::AnthropicDesigner;
use tracing::info;

pub async fn run(description: &str, config: &GeneratorConfig) -> anyhow::Result<DesignPayload> {
    if description.trim().is_empty() {
        anyhow::bail!("Description is required");
    }
    if !config.ai_enabled() {
        return Err(DesignError::MissingApiKey.into());
    }

    let designer = AnthropicDesigner::new(config.design.clone())?;
    let document = designer
        .design_document(description)
        .await
        .context("Design failed")?;

    info!(
        entities = document.entities.len(),
        features = document.features.len(),
        endpoints = document.api_endpoints.len(),
        "design received"
    );
    Ok(DesignPayload::from(document))
}
