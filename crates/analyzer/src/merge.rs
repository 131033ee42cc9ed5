use bddgen_core::RawSpecification;
use tracing::debug;

/// Merge a design-service proposal into the caller's specification.
///
/// For every key, the caller's value wins unless it is absent, null, an
/// empty sequence or a blank string; then the proposed value is taken,
/// provided it is not blank itself. Keys only the caller supplied are kept.
pub fn merge_augmented(
    original: &RawSpecification,
    augmented: &RawSpecification,
) -> RawSpecification {
    let mut merged = original.clone();

    for key in augmented.keys() {
        if original.is_blank(key) && !augmented.is_blank(key) {
            if let Some(value) = augmented.get(key) {
                debug!(key, "taking proposed value");
                merged.insert(key, value.clone());
            }
        }
    }

    merged
}
