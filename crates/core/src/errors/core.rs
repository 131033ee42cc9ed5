use thiserror::Error;

/// Errors raised while reading or emitting a specification
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Invalid specification format: expected a mapping or a string, found {found}")]
    InvalidSpecificationFormat { found: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Codegen error: {message}")]
    Codegen { message: String },
}

impl SpecError {
    /// Create an invalid format error describing what was received instead
    pub fn invalid_format(found: impl Into<String>) -> Self {
        Self::InvalidSpecificationFormat {
            found: found.into(),
        }
    }

    /// Create a new codegen error
    pub fn codegen(message: impl Into<String>) -> Self {
        Self::Codegen {
            message: message.into(),
        }
    }

    /// Check if the error is a structurally invalid input
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Self::InvalidSpecificationFormat { .. })
    }
}

/// Errors raised by the AI design service.
///
/// None of these abort a normalization pass; the pipeline downgrades
/// them to warnings and continues with heuristic extraction.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("ANTHROPIC_API_KEY is required for AI design")]
    MissingApiKey,

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Design service returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Design service timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Malformed design response: {message}")]
    MalformedResponse { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DesignError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Hint shown to CLI users next to the error message
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingApiKey => {
                Some("Set the environment variable or use specification-based generation")
            }
            Self::Status { .. } | Self::Network { .. } => Some("Check your API key and try again"),
            Self::Timeout { .. } => Some("Raise BDDGEN_TIMEOUT_SECS or retry later"),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DesignError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_message() {
        let err = SpecError::invalid_format("number");
        assert!(err.is_invalid_format());
        assert_eq!(
            err.to_string(),
            "Invalid specification format: expected a mapping or a string, found number"
        );
    }

    #[test]
    fn test_design_error_hints() {
        assert!(DesignError::MissingApiKey.hint().is_some());
        assert!(DesignError::malformed("nope").hint().is_none());
        assert_eq!(
            DesignError::Status { code: 401, body: "denied".into() }.to_string(),
            "Design service returned 401: denied"
        );
    }
}
