use bddgen_core::{AttributeMap, Entity, SemanticType, USER_ENTITY};
use tracing::debug;

pub fn default_user_attributes() -> AttributeMap {
    [
        ("email", SemanticType::String),
        ("first_name", SemanticType::String),
        ("last_name", SemanticType::String),
        ("role", SemanticType::String),
    ]
    .into_iter()
    .collect()
}

pub fn default_user_entity() -> Entity {
    Entity::new(USER_ENTITY, default_user_attributes())
}

/// Prepend the canonical user entity unless one is already declared.
///
/// An existing `user` is never modified, so applying this twice is the
/// same as applying it once.
pub fn ensure_user_entity(mut entities: Vec<Entity>) -> Vec<Entity> {
    if !entities.iter().any(Entity::is_user) {
        debug!("injecting default user entity");
        entities.insert(0, default_user_entity());
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injects_user_first() {
        let entities = ensure_user_entity(vec![Entity::new("book", AttributeMap::new())]);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0], default_user_entity());
        let names: Vec<&str> = entities[0].attributes.names().collect();
        assert_eq!(names, vec!["email", "first_name", "last_name", "role"]);
    }

    #[test]
    fn test_declared_user_is_untouched() {
        let custom = Entity::new(
            "user",
            [("username", SemanticType::String)].into_iter().collect(),
        );
        let entities = ensure_user_entity(vec![
            Entity::new("book", AttributeMap::new()),
            custom.clone(),
        ]);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1], custom);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(ensure_user_entity(Vec::new()), vec![default_user_entity()]);
    }
}
