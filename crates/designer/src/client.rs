use crate::document::DesignDocument;
use crate::prompts::PromptRenderer;
use crate::response::ResponseParser;
use async_trait::async_trait;
use bddgen_core::{
    DesignConfig, DesignError, DesignService, FeatureFile, NormalizedSpecification,
    RawSpecification, TOOL_NAME, VERSION,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn into_text(self) -> Option<String> {
        self.content.into_iter().find_map(|block| block.text)
    }
}

/// Design service backed by the Anthropic messages API
pub struct AnthropicDesigner {
    config: DesignConfig,
    api_key: String,
    client: Client,
    prompts: PromptRenderer,
    parser: ResponseParser,
}

impl AnthropicDesigner {
    pub fn new(config: DesignConfig) -> Result<Self, DesignError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(DesignError::MissingApiKey)?;

        let client = Client::builder()
            .user_agent(format!("{}/{}", TOOL_NAME, VERSION))
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| DesignError::configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key,
            client,
            prompts: PromptRenderer::new(),
            parser: ResponseParser::new()?,
        })
    }

    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    /// Full design proposal including features, endpoints and jobs
    pub async fn design_document(&self, description: &str) -> Result<DesignDocument, DesignError> {
        let raw = self.design_application(description).await?;
        Ok(DesignDocument::from_raw(&raw))
    }

    async fn complete(&self, prompt: &str) -> Result<String, DesignError> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!("POST {} (model {})", self.config.api_url, self.config.model);
        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.config.anthropic_version)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DesignError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| DesignError::malformed(format!("response body: {}", e)))?;
        body.into_text()
            .ok_or_else(|| DesignError::malformed("response had no text content"))
    }

    fn transport_error(&self, error: reqwest::Error) -> DesignError {
        if error.is_timeout() {
            DesignError::Timeout {
                seconds: self.config.timeout_secs,
            }
        } else {
            DesignError::network(error.to_string())
        }
    }
}

#[async_trait]
impl DesignService for AnthropicDesigner {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn design_application(&self, description: &str) -> Result<RawSpecification, DesignError> {
        info!("Requesting application design from {}", self.config.model);
        let prompt = self.prompts.design_prompt(description)?;
        let text = self.complete(&prompt).await?;
        self.parser.parse_design(&text)
    }

    async fn synthesize_features(
        &self,
        spec: &NormalizedSpecification,
    ) -> Result<Vec<FeatureFile>, DesignError> {
        info!("Requesting feature synthesis for {} entities", spec.entities.len());
        let prompt = self.prompts.features_prompt(spec)?;
        let text = self.complete(&prompt).await?;
        Ok(self.parser.parse_features(&text))
    }
}
