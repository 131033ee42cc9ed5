use bddgen_core::{DesignError, NormalizedSpecification};
use serde::Serialize;
use tinytemplate::{format_unescaped, TinyTemplate};

const DESIGN_TEMPLATE: &str = r#"You are an expert web application architect. Design a complete application based on this description:

"{description}"

Provide a detailed JSON response with the following structure:
{shape}

Think step by step:
1. What are the core entities needed?
2. What attributes should each entity have?
3. How do entities relate to each other?
4. What business rules govern the system?
5. What features would users need?
6. What API endpoints are necessary?
7. What background processing is needed?
8. What security measures should be in place?

Provide a comprehensive, production-ready design. Be specific and detailed."#;

const DESIGN_SHAPE: &str = r#"{
  "name": "ApplicationName",
  "description": "Enhanced description",
  "entities": [
    {
      "name": "entity_name",
      "attributes": { "attribute_name": "string|text|integer|decimal|boolean|date|datetime" },
      "validations": ["validation rules"],
      "business_logic": ["business rules for this entity"]
    }
  ],
  "relationships": [
    {
      "from": "entity1",
      "to": "entity2",
      "type": "has_many|belongs_to|has_one|has_and_belongs_to_many",
      "through": "join_table (if applicable)",
      "dependent": "destroy|nullify|restrict",
      "inverse_of": "relationship_name"
    }
  ],
  "business_rules": ["Clear business rule statements"],
  "features": [
    {
      "name": "feature_name",
      "description": "what this feature does",
      "user_stories": ["As a..., I want..., So that..."]
    }
  ],
  "api_endpoints": [
    {
      "path": "/api/v1/resource",
      "method": "GET|POST|PUT|DELETE",
      "description": "what this endpoint does",
      "authentication": "required|optional|none"
    }
  ],
  "background_jobs": [
    {
      "name": "JobName",
      "description": "what this job does",
      "schedule": "cron expression or trigger"
    }
  ],
  "security_considerations": ["Security measures to implement"]
}"#;

const FEATURES_TEMPLATE: &str = r#"You are an expert in Behavior-Driven Development. Create comprehensive Cucumber features for a web application with:

Entities: {entities}

Relationships:
{relationships}

Business Rules:
{business_rules}

Generate detailed Cucumber features following this structure:
{shape}

Include:
- Happy path scenarios
- Edge cases
- Error scenarios
- Security scenarios
- Data validation scenarios

Make features comprehensive and production-ready."#;

const FEATURES_SHAPE: &str = r#"{
  "features": [
    {
      "name": "feature_name",
      "content": "Complete feature file content with multiple scenarios",
      "step_definitions": "Step definitions for this feature"
    }
  ]
}"#;

#[derive(Serialize)]
struct DesignContext<'a> {
    description: &'a str,
    shape: &'a str,
}

#[derive(Serialize)]
struct FeaturesContext<'a> {
    entities: String,
    relationships: String,
    business_rules: String,
    shape: &'a str,
}

/// Renders the two prompts sent to the completion endpoint.
///
/// Holds no `TinyTemplate`, which is not `Send`; templates are compiled per render.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptRenderer;

impl PromptRenderer {
    pub fn new() -> Self {
        Self
    }

    fn templates() -> Result<TinyTemplate<'static>, DesignError> {
        let mut templates = TinyTemplate::new();
        templates.set_default_formatter(&format_unescaped);
        templates
            .add_template("design", DESIGN_TEMPLATE)
            .map_err(|e| DesignError::configuration(format!("design prompt: {}", e)))?;
        templates
            .add_template("features", FEATURES_TEMPLATE)
            .map_err(|e| DesignError::configuration(format!("feature prompt: {}", e)))?;
        Ok(templates)
    }

    pub fn design_prompt(&self, description: &str) -> Result<String, DesignError> {
        let context = DesignContext {
            description: description.trim(),
            shape: DESIGN_SHAPE,
        };
        Self::templates()?
            .render("design", &context)
            .map_err(|e| DesignError::configuration(format!("design prompt: {}", e)))
    }

    pub fn features_prompt(&self, spec: &NormalizedSpecification) -> Result<String, DesignError> {
        let context = FeaturesContext {
            entities: spec.entity_names().join(", "),
            relationships: spec
                .relationships
                .iter()
                .map(|r| format!("{} {} {}", r.from, r.kind, r.to))
                .collect::<Vec<_>>()
                .join("\n"),
            business_rules: spec
                .business_rules
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            shape: FEATURES_SHAPE,
        };
        Self::templates()?
            .render("features", &context)
            .map_err(|e| DesignError::configuration(format!("feature prompt: {}", e)))
    }
}
