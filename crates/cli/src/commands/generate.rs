use crate::commands::design_service;
use crate::payload::GeneratePayload;
use anyhow::Context;
use bddgen_analyzer::{parse, ArtifactWriter, Normalizer, NormalizerConfig, OutputFormat, RawInput};
use bddgen_core::{DesignService, GeneratorConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub input: RawInput,
    pub output: Option<PathBuf>,
    pub use_ai: bool,
    pub features: bool,
    pub format: OutputFormat,
}

impl GenerateOptions {
    pub fn new(input: impl Into<RawInput>) -> Self {
        Self {
            input: input.into(),
            output: None,
            use_ai: true,
            features: false,
            format: OutputFormat::default(),
        }
    }
}

/// `./generated_<unix-timestamp>`
pub fn default_output_dir() -> PathBuf {
    PathBuf::from(format!("./generated_{}", chrono::Utc::now().timestamp()))
}

pub async fn run(
    options: GenerateOptions,
    config: &GeneratorConfig,
) -> anyhow::Result<GeneratePayload> {
    let raw = parse(options.input).context("Could not read specification")?;
    let normalizer = Normalizer::with_config(NormalizerConfig::from(config))?;

    let designer = if options.use_ai {
        design_service(config)
    } else {
        info!("AI design disabled by request");
        None
    };

    let spec = match &designer {
        Some(service) => normalizer.normalize_with_design(&raw, service).await,
        None => normalizer.normalize(&raw),
    };

    for relationship in spec.dangling_references() {
        warn!(
            from = %relationship.from,
            to = %relationship.to,
            "relationship references an undeclared entity"
        );
    }

    let output_dir = options.output.unwrap_or_else(default_output_dir);
    let writer = ArtifactWriter::new();
    let spec_path = writer.write_specification(&output_dir, &spec, options.format)?;
    info!(path = %spec_path.display(), "specification written");

    let mut warnings = spec.warnings.clone();
    let mut features_generated = 0;

    if options.features {
        match &designer {
            Some(service) => match service.synthesize_features(&spec).await {
                Ok(features) => {
                    let written = writer.write_features(&output_dir, &features)?;
                    features_generated = written.len();
                    info!(count = features_generated, "features written");
                }
                Err(err) => {
                    warn!(error = %err, "feature synthesis failed");
                    warnings.push(format!("Feature synthesis failed: {}", err));
                }
            },
            None => {
                warnings.push("Feature synthesis requires AI design and an API key".to_string())
            }
        }
    }

    Ok(GeneratePayload::new(
        &absolute(&output_dir),
        &spec,
        features_generated,
        warnings,
    ))
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
