//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Only conditions that abort a turn live here. An unrecognised intent, a
/// stale stored position and a failed position write are ordinary outcomes
/// and never surface as errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A role pointer (start/stop/help/unknown) is missing or does not
    /// resolve to a node. The adventure data itself is broken.
    #[error("graph configuration error: {0}")]
    GraphConfiguration(String),

    /// The adventure definition could not be parsed or violates node
    /// invariants.
    #[error("malformed adventure: {0}")]
    MalformedAdventure(String),

    /// The adventure source or the position store could not be reached.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The inbound request is unusable.
    #[error("validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// Returns a machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::GraphConfiguration(_) => "graph_configuration_error",
            Self::MalformedAdventure(_) => "malformed_adventure",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Validation(_) => "validation_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category_prefix() {
        let err = DomainError::GraphConfiguration("start node 'cave' not found".into());
        assert_eq!(
            err.to_string(),
            "graph configuration error: start node 'cave' not found"
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            DomainError::GraphConfiguration(String::new()).code(),
            DomainError::MalformedAdventure(String::new()).code(),
            DomainError::StorageUnavailable(String::new()).code(),
            DomainError::Validation(String::new()).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
