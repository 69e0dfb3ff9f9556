//! Error types for identity resolution and persistence.

use thiserror::Error;

use crate::base::Name;

/// Errors that can occur while resolving, curating or persisting a names map.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// An operation needs a normalization function that was never supplied.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A remap chain revisits a name it already passed through.
    ///
    /// `chain` starts at `start` and ends with the repeated name.
    #[error("Cycle detected resolving '{start}': {}", format_chain(.chain))]
    CycleDetected { start: Name, chain: Vec<Name> },

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResolverError {
    /// Create the error raised when names are inserted without a normalizer.
    pub fn missing_normalizer() -> Self {
        Self::Configuration("normalization function required to insert names".to_string())
    }

    /// Create a cycle error.
    pub fn cycle(start: impl Into<Name>, chain: Vec<Name>) -> Self {
        Self::CycleDetected {
            start: start.into(),
            chain,
        }
    }

    /// Whether this error reports a remapping cycle.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }
}

/// Render a chain as `a -> b -> a`.
pub(crate) fn format_chain(chain: &[Name]) -> String {
    chain
        .iter()
        .map(Name::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_chain() {
        let err = ResolverError::cycle("a", vec!["a".into(), "b".into(), "a".into()]);
        assert!(err.is_cycle());
        assert_eq!(
            err.to_string(),
            "Cycle detected resolving 'a': a -> b -> a"
        );
    }

    #[test]
    fn test_missing_normalizer_message() {
        let err = ResolverError::missing_normalizer();
        assert!(!err.is_cycle());
        assert!(err.to_string().contains("normalization function required"));
    }
}
