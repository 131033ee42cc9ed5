use bddgen_analyzer::{merge_augmented, Normalizer};
use bddgen_core::RawSpecification;
use bddgen_designer::{DesignDocument, ResponseParser};

const DESIGN_REPLY: &str = r#"Here is a complete design for your request.

```json
{
  "name": "RecipeBox",
  "description": "Share and rate recipes",
  "entities": [
    {"name": "Recipe", "attributes": {"title": "string", "steps": "text", "servings": "integer"},
     "validations": ["title must be present"]},
    {"name": "ratings", "attributes": {"score": "integer"}}
  ],
  "relationships": [
    {"from": "recipe", "to": "rating", "type": "has_many", "dependent": "destroy"}
  ],
  "businessRules": ["Users can rate a recipe once"],
  "features": [{"name": "rate_recipe", "description": "Rate recipes", "user_stories": ["As a cook"]}],
  "api_endpoints": [{"path": "/api/v1/recipes", "method": "GET", "authentication": "optional"}],
  "background_jobs": [],
  "security_considerations": ["Escape user supplied recipe text"]
}
```

Let me know if you need changes."#;

#[test]
fn fenced_design_reply_normalizes() {
    let parser = ResponseParser::new().unwrap();
    let proposal = parser.parse_design(DESIGN_REPLY).unwrap();

    let original = RawSpecification::from_description("A place to share recipes");
    let merged = merge_augmented(&original, &proposal);
    let spec = Normalizer::new().unwrap().normalize(&merged);

    assert_eq!(spec.entity_names(), vec!["user", "recipe", "rating"]);
    assert_eq!(spec.description.as_deref(), Some("A place to share recipes"));
    assert_eq!(spec.name.as_deref(), Some("RecipeBox"));
    assert_eq!(spec.relationships.len(), 1);
    assert_eq!(spec.business_rules.len(), 1);
    assert_eq!(spec.entity("recipe").unwrap().validations.len(), 1);
}

#[test]
fn fenced_design_reply_document_view() {
    let parser = ResponseParser::new().unwrap();
    let document = DesignDocument::from_raw(&parser.parse_design(DESIGN_REPLY).unwrap());

    assert_eq!(document.name.as_deref(), Some("RecipeBox"));
    assert_eq!(document.features[0].name, "rate_recipe");
    assert_eq!(document.api_endpoints[0].authentication.as_deref(), Some("optional"));
    assert!(document.background_jobs.is_empty());
    assert_eq!(document.security_considerations.len(), 1);
}

#[test]
fn prose_reply_still_yields_entities() {
    let reply = "I'd suggest a model Recipe and a table Ingredient.\nEvery recipe must list at least one ingredient.";
    let proposal = ResponseParser::new().unwrap().parse_design(reply).unwrap();
    let spec = Normalizer::new().unwrap().normalize(&proposal);

    assert_eq!(spec.entity_names(), vec!["user", "recipe", "ingredient"]);
    assert_eq!(spec.business_rules.len(), 1);
}
