//! Config errors.

use super::value::ValueKind;

/// Recoverable configuration failures. Prior state is always left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The key is not in the catalogue (or has no value in the store).
    #[error("config key not found: {0}")]
    NotFound(String),

    /// The key's validator rejected the value.
    #[error("failed to validate value {value:?} for {key}")]
    ValidationFailed {
        /// Key being written.
        key: String,
        /// The rejected value, rendered.
        value: String,
    },

    /// The key exists but holds another value type.
    #[error("config key {key} holds {actual} values, not {requested}")]
    TypeMismatch {
        /// Key being accessed.
        key: String,
        /// Type recorded in the catalogue.
        actual: ValueKind,
        /// Type the caller asked for.
        requested: ValueKind,
    },

    /// A raw string could not be parsed as the key's type.
    #[error("invalid {kind} value {value:?} for {key}")]
    Parse {
        /// Key being loaded.
        key: String,
        /// Type recorded in the catalogue.
        kind: ValueKind,
        /// The raw input.
        value: String,
    },
}
