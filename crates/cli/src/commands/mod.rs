pub mod analyze;
pub mod design;
pub mod generate;
pub mod json;

use bddgen_core::GeneratorConfig;
use bddgen_designer::AnthropicDesigner;
use tracing::{info, warn};

/// Design service for this run, if an API key is configured and the client builds
pub fn design_service(config: &GeneratorConfig) -> Option<AnthropicDesigner> {
    if !config.ai_enabled() {
        info!("No API key configured, using heuristic analysis");
        return None;
    }

    match AnthropicDesigner::new(config.design.clone()) {
        Ok(designer) => Some(designer),
        Err(err) => {
            warn!(error = %err, "design service unavailable, using heuristic analysis");
            None
        }
    }
}
