//! AI-backed design service for bddgen.
//!
//! [`AnthropicDesigner`] implements [`bddgen_core::DesignService`] over the
//! Anthropic messages API. Completion text is parsed leniently: JSON when the
//! model produced it, scraped entity and rule mentions when it did not.

pub mod client;
pub mod document;
pub mod prompts;
pub mod response;

pub use client::AnthropicDesigner;
pub use document::{ApiEndpoint, BackgroundJob, DesignDocument, FeatureSketch};
pub use prompts::PromptRenderer;
pub use response::{extract_json_block, strip_control_chars, ResponseParser};
