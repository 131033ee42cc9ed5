use bddgen_core::{Entity, RawSpecification, Relationship};
use tracing::{debug, warn};

/// Relationships for a specification.
///
/// A non-empty explicit list is returned in declaration order without
/// deduplication or endpoint checks. Otherwise every non-user entity gets
/// a default `user has_many <entity>` ownership association.
pub fn derive_relationships(
    raw: &RawSpecification,
    entities: &[Entity],
    warnings: &mut Vec<String>,
) -> Vec<Relationship> {
    if let Some(declarations) = raw.relationships().filter(|list| !list.is_empty()) {
        let explicit: Vec<Relationship> = declarations
            .iter()
            .enumerate()
            .filter_map(|(index, declaration)| {
                match serde_json::from_value::<Relationship>(declaration.clone()) {
                    Ok(relationship) => Some(relationship),
                    Err(e) => {
                        warn!(index, error = %e, "skipping relationship declaration");
                        warnings.push(format!("Skipped relationship #{}: {}", index + 1, e));
                        None
                    }
                }
            })
            .collect();

        if !explicit.is_empty() {
            return explicit;
        }

        warnings.push(
            "No usable relationship declarations, falling back to default ownership".to_string(),
        );
    }

    default_ownership(entities)
}

pub fn default_ownership(entities: &[Entity]) -> Vec<Relationship> {
    entities
        .iter()
        .filter(|entity| !entity.is_user())
        .map(|entity| {
            debug!(entity = %entity.name, "deriving default ownership");
            Relationship::ownership(&entity.name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bddgen_core::{AttributeMap, RelationshipKind};
    use serde_json::json;

    fn entities(names: &[&str]) -> Vec<Entity> {
        names.iter().map(|n| Entity::new(*n, AttributeMap::new())).collect()
    }

    fn raw(value: serde_json::Value) -> RawSpecification {
        RawSpecification::from_value(value).unwrap()
    }

    #[test]
    fn test_default_ownership_order() {
        let mut warnings = Vec::new();
        let rels = derive_relationships(
            &raw(json!({})),
            &entities(&["user", "book", "order"]),
            &mut warnings,
        );
        assert_eq!(
            rels,
            vec![Relationship::ownership("book"), Relationship::ownership("order")]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_explicit_list_is_verbatim() {
        let mut warnings = Vec::new();
        let spec = raw(json!({"relationships": [
            {"from": "card", "to": "deck", "kind": "belongs_to"},
            {"from": "card", "to": "deck", "kind": "belongs_to"},
            {"from": "deck", "to": "ghost", "type": "has_many", "dependent": "destroy"}
        ]}));
        let rels = derive_relationships(&spec, &entities(&["user", "card", "deck"]), &mut warnings);

        assert_eq!(rels.len(), 3);
        assert_eq!(rels[0], rels[1]);
        assert_eq!(rels[2].to, "ghost");
        assert_eq!(rels[2].dependent.as_deref(), Some("destroy"));
        assert_eq!(rels[2].kind, RelationshipKind::HasMany);
    }

    #[test]
    fn test_empty_explicit_list_uses_defaults() {
        let mut warnings = Vec::new();
        let rels = derive_relationships(
            &raw(json!({"relationships": []})),
            &entities(&["user", "book"]),
            &mut warnings,
        );
        assert_eq!(rels, vec![Relationship::ownership("book")]);
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let mut warnings = Vec::new();
        let spec = raw(json!({"relationships": [
            {"from": "card", "kind": "belongs_to"},
            {"from": "card", "to": "deck", "kind": "owns"},
            {"from": "card", "to": "deck", "kind": "has_one"}
        ]}));
        let rels = derive_relationships(&spec, &entities(&["user"]), &mut warnings);
        assert_eq!(rels.len(), 1);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_all_invalid_entries_fall_back() {
        let mut warnings = Vec::new();
        let spec = raw(json!({"relationships": ["nonsense"]}));
        let rels = derive_relationships(&spec, &entities(&["user", "tag"]), &mut warnings);
        assert_eq!(rels, vec![Relationship::ownership("tag")]);
        assert_eq!(warnings.len(), 2);
    }
}
