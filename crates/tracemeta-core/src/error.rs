//! Error types for tracemeta

use thiserror::Error;

/// Core tracemeta errors
///
/// `EndOfSequence`, `TryAgain` and `UnknownObject` are control-flow signals
/// rather than failures; see [`MetaError::is_signal`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    // Validation errors
    #[error("'{actual}' is not a '{expected}' object")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}")]
    Range(String),

    #[error("{0}")]
    Precondition(String),

    // Engine errors
    #[error("{0}")]
    Engine(String),

    #[error("{0}")]
    OutOfMemory(String),

    #[error("{0}")]
    Overflow(String),

    // Signals
    #[error("end of sequence{}", detail(.0))]
    EndOfSequence(Option<String>),

    #[error("try again{}", detail(.0))]
    TryAgain(Option<String>),

    #[error("unknown object{}", detail(.0))]
    UnknownObject(Option<String>),
}

fn detail(msg: &Option<String>) -> String {
    match msg {
        Some(msg) => format!(": {}", msg),
        None => String::new(),
    }
}

impl MetaError {
    /// Build a type mismatch error
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        MetaError::TypeMismatch { expected, actual }
    }

    /// Is this a control-flow signal the caller is expected to handle
    /// as a normal outcome (iteration end, backpressure, unknown query)?
    pub fn is_signal(&self) -> bool {
        matches!(
            self,
            MetaError::EndOfSequence(_) | MetaError::TryAgain(_) | MetaError::UnknownObject(_)
        )
    }

    /// Was this error raised before any engine call (input validation or
    /// capability/state precondition)?
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MetaError::TypeMismatch { .. } | MetaError::Range(_) | MetaError::Precondition(_)
        )
    }
}

/// Result type for tracemeta operations
pub type MetaResult<T> = Result<T, MetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let err = MetaError::type_mismatch("str", "bool");
        assert_eq!(err.to_string(), "'bool' is not a 'str' object");
    }

    #[test]
    fn test_signal_messages() {
        assert_eq!(MetaError::EndOfSequence(None).to_string(), "end of sequence");
        assert_eq!(
            MetaError::TryAgain(Some("queue full".into())).to_string(),
            "try again: queue full"
        );
    }

    #[test]
    fn test_signal_classification() {
        assert!(MetaError::EndOfSequence(None).is_signal());
        assert!(MetaError::TryAgain(None).is_signal());
        assert!(MetaError::UnknownObject(None).is_signal());
        assert!(!MetaError::Engine("boom".into()).is_signal());
        assert!(!MetaError::Overflow("boom".into()).is_signal());

        assert!(MetaError::Precondition("nope".into()).is_validation());
        assert!(!MetaError::OutOfMemory("oom".into()).is_validation());
    }
}
