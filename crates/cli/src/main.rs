mod commands;
mod logging;
mod payload;

use bddgen_analyzer::{OutputFormat, RawInput};
use bddgen_core::{AppConfigTrait, GeneratorConfig, LogFormat};
use clap::{Parser, Subcommand, ValueEnum};
use commands::*;
use logging::LoggingConfig;
use payload::{is_success, to_value, FailurePayload};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bddgen")]
#[command(about = "Turn a product description or specification into a domain model and BDD features")]
#[command(version)]
struct Cli {
    /// Log level filter, overrides BDDGEN_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format, overrides BDDGEN_LOG_FORMAT
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a specification and write it with optional BDD features
    Generate {
        /// Free text, inline JSON, or a path to a YAML/JSON specification
        input: String,

        /// Output directory (default: ./generated_<timestamp>)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Skip the AI design service even when an API key is set
        #[arg(long)]
        no_ai: bool,

        /// Synthesize Cucumber features through the design service
        #[arg(long)]
        features: bool,

        /// Specification file format
        #[arg(long, value_enum, default_value = "yaml")]
        format: FormatArg,
    },

    /// Ask the design service for a full application design
    Design {
        /// Product description
        description: String,
    },

    /// Print the normalized specification without writing anything
    Analyze {
        /// Free text, inline JSON, or a path to a YAML/JSON specification
        input: String,
    },

    /// Read a `{tool, params}` request from stdin
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Plain,
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Plain => LogFormat::Plain,
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<GeneratorConfig> {
    let mut config = GeneratorConfig::from_env()?;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
        config.set_flag_source("log_level", "--log-level");
    }
    if let Some(format) = cli.log_format {
        config.log_format = format.into();
        config.set_flag_source("log_format", "--log-format");
    }

    config.validate()?;
    Ok(config)
}

async fn execute(command: Commands, config: &GeneratorConfig) -> anyhow::Result<Value> {
    match command {
        Commands::Generate {
            input,
            output,
            no_ai,
            features,
            format,
        } => {
            let options = generate::GenerateOptions {
                output,
                use_ai: !no_ai,
                features,
                format: format.into(),
                ..generate::GenerateOptions::new(input)
            };
            Ok(to_value(&generate::run(options, config).await?))
        }
        Commands::Design { description } => Ok(to_value(&design::run(&description, config).await?)),
        Commands::Analyze { input } => Ok(to_value(&analyze::run(RawInput::Text(input))?)),
        Commands::Json => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(json::run(&body, config).await)
        }
    }
}

fn emit(payload: &Value) -> ExitCode {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", payload),
    }
    if is_success(payload) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => return emit(&to_value(&FailurePayload::from_error(&err))),
    };

    if let Err(err) = logging::init_logging(&LoggingConfig::for_config(&config)) {
        eprintln!("bddgen: logging disabled: {}", err);
    }
    for (field, source) in config.config_sources() {
        tracing::debug!(field = %field, source = %source.description(), "config");
    }

    let payload = match execute(cli.command, &config).await {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(error = %format!("{:#}", err), "command failed");
            to_value(&FailurePayload::from_error(&err))
        }
    };
    emit(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "bddgen",
            "generate",
            "manage books",
            "--no-ai",
            "--features",
            "--format",
            "json",
            "-o",
            "out",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate { input, output, no_ai, features, format } => {
                assert_eq!(input, "manage books");
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(no_ai && features);
                assert_eq!(OutputFormat::from(format), OutputFormat::Json);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    #[serial]
    fn test_flags_override_environment() {
        std::env::set_var("BDDGEN_LOG_FORMAT", "json");
        let cli = Cli::try_parse_from([
            "bddgen",
            "--log-format",
            "pretty",
            "--log-level",
            "trace",
            "json",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        std::env::remove_var("BDDGEN_LOG_FORMAT");

        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.log_level, "trace");
        assert!(matches!(
            config.config_sources().get("log_format"),
            Some(bddgen_core::ConfigSource::Flag(_))
        ));
    }

    #[test]
    #[serial]
    fn test_invalid_environment_config_is_a_failure() {
        std::env::set_var("BDDGEN_TEMPERATURE", "3.5");
        let cli = Cli::try_parse_from(["bddgen", "analyze", "x"]).unwrap();
        let result = load_config(&cli);
        std::env::remove_var("BDDGEN_TEMPERATURE");

        assert!(result.is_err());
    }
}
