/// Convenience result type used across the path engine.
pub type PathResult<T> = Result<T, PathError>;

/// Error taxonomy for path edits, outline building and interpolation.
///
/// Every variant aborts the operation that raised it. Structural actions validate
/// their preconditions before mutating, so an `Err` never leaves a half-applied edit.
#[derive(thiserror::Error, Debug)]
pub enum PathError {
    /// Node linkage is broken (self links, malformed cycles, misplaced `Move` nodes,
    /// neighbour lists out of sync). Indicates a bug or a bypassed action API.
    #[error("consistency error: {0}")]
    Consistency(String),

    /// An action was invoked on a node that does not satisfy its contract.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Invalid store usage or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing node lists.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PathError {
    /// Build a [`PathError::Consistency`] value.
    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::Consistency(msg.into())
    }

    /// Build a [`PathError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`PathError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PathError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors that signal corrupted linkage rather than a rejected request.
    pub fn is_consistency(&self) -> bool {
        matches!(self, Self::Consistency(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
