pub mod core;

pub use self::core::{DesignError, SpecError};
