pub mod raw;
pub mod spec;
pub mod types;

pub use raw::{value_kind, RawSpecification};
pub use spec::{
    BusinessRule, Entity, NormalizedSpecification, Relationship, RelationshipKind, SpecSummary,
    USER_ENTITY,
};
pub use types::{AttributeMap, SemanticType};
