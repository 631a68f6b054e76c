//! Engine status contract
//!
//! Every fallible engine operation reports one of the statuses below.
//! [`handle_status`] is the only place where a status is turned into a
//! [`MetaError`]; call sites never decode statuses by hand.

use crate::error::{MetaError, MetaResult};

/// Status codes of the engine contract
///
/// The numeric values are those used by native trace-processing engines,
/// so a foreign engine can be adapted through [`EngineStatus::from_raw`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    /// Success
    Ok = 0,
    /// End of a sequence (iterator exhaustion)
    End = 1,
    /// Try again later (backpressure)
    Again = 11,
    /// Query target not recognized
    UnknownObject = 42,
    /// Generic error
    Error = -1,
    /// Allocation failure
    MemoryError = -12,
    /// Numeric overflow
    OverflowError = -75,
}

impl EngineStatus {
    /// Parse from a raw status code
    pub fn from_raw(code: i32) -> Option<Self> {
        match code {
            0 => Some(EngineStatus::Ok),
            1 => Some(EngineStatus::End),
            11 => Some(EngineStatus::Again),
            42 => Some(EngineStatus::UnknownObject),
            -1 => Some(EngineStatus::Error),
            -12 => Some(EngineStatus::MemoryError),
            -75 => Some(EngineStatus::OverflowError),
            _ => None,
        }
    }

    /// Convert to a raw status code
    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    #[inline]
    pub fn is_ok(self) -> bool {
        self == EngineStatus::Ok
    }

    /// Error statuses are negative, signals are positive
    #[inline]
    pub fn is_error(self) -> bool {
        self.as_raw() < 0
    }
}

impl From<EngineStatus> for i32 {
    fn from(status: EngineStatus) -> Self {
        status as i32
    }
}

/// Translate an engine status into a result.
///
/// `context` describes the operation that failed. It is mandatory for
/// `Error` and `MemoryError`: an error path without a message is an
/// invariant violation and panics.
pub fn handle_status(status: EngineStatus, context: Option<&str>) -> MetaResult<()> {
    let err = match status {
        EngineStatus::Ok => return Ok(()),
        EngineStatus::Error => MetaError::Engine(required_context(status, context)),
        EngineStatus::MemoryError => MetaError::OutOfMemory(required_context(status, context)),
        EngineStatus::End => MetaError::EndOfSequence(context.map(str::to_owned)),
        EngineStatus::Again => MetaError::TryAgain(context.map(str::to_owned)),
        EngineStatus::OverflowError => MetaError::Overflow(
            context
                .map(str::to_owned)
                .unwrap_or_else(|| "overflow error".to_owned()),
        ),
        EngineStatus::UnknownObject => MetaError::UnknownObject(context.map(str::to_owned)),
    };

    tracing::debug!(status = ?status, "engine status mapped to error: {}", err);
    Err(err)
}

/// Translate a raw status code.
///
/// The engine contract only defines the codes of [`EngineStatus`]; any other
/// code is an invariant violation.
pub fn handle_raw_status(code: i32, context: Option<&str>) -> MetaResult<()> {
    match EngineStatus::from_raw(code) {
        Some(status) => handle_status(status, context),
        None => panic!("engine returned an unknown status code: {}", code),
    }
}

fn required_context(status: EngineStatus, context: Option<&str>) -> String {
    match context {
        Some(msg) if !msg.is_empty() => msg.to_owned(),
        _ => panic!("engine status {:?} requires a context message", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_raw_roundtrip() {
        for status in [
            EngineStatus::Ok,
            EngineStatus::End,
            EngineStatus::Again,
            EngineStatus::UnknownObject,
            EngineStatus::Error,
            EngineStatus::MemoryError,
            EngineStatus::OverflowError,
        ] {
            assert_eq!(EngineStatus::from_raw(status.as_raw()), Some(status));
        }
        assert_eq!(EngineStatus::from_raw(7), None);
    }

    #[test]
    fn test_ok_is_success() {
        assert_eq!(handle_status(EngineStatus::Ok, None), Ok(()));
        assert_eq!(handle_status(EngineStatus::Ok, Some("ignored")), Ok(()));
    }

    #[test]
    fn test_error_statuses_carry_context() {
        assert_eq!(
            handle_status(EngineStatus::Error, Some("cannot set name")),
            Err(MetaError::Engine("cannot set name".into()))
        );
        assert_eq!(
            handle_status(EngineStatus::MemoryError, Some("cannot create value")),
            Err(MetaError::OutOfMemory("cannot create value".into()))
        );
        assert_eq!(
            handle_status(EngineStatus::OverflowError, Some("too big")),
            Err(MetaError::Overflow("too big".into()))
        );
    }

    #[test]
    fn test_signals_accept_missing_context() {
        assert_eq!(
            handle_status(EngineStatus::End, None),
            Err(MetaError::EndOfSequence(None))
        );
        assert_eq!(
            handle_status(EngineStatus::Again, Some("busy")),
            Err(MetaError::TryAgain(Some("busy".into())))
        );
        assert_eq!(
            handle_status(EngineStatus::UnknownObject, None),
            Err(MetaError::UnknownObject(None))
        );
        assert!(matches!(
            handle_status(EngineStatus::OverflowError, None),
            Err(MetaError::Overflow(_))
        ));
    }

    #[test]
    #[should_panic(expected = "requires a context message")]
    fn test_error_without_context_panics() {
        let _ = handle_status(EngineStatus::Error, None);
    }

    #[test]
    #[should_panic(expected = "requires a context message")]
    fn test_memory_error_with_empty_context_panics() {
        let _ = handle_status(EngineStatus::MemoryError, Some(""));
    }

    #[test]
    fn test_raw_status() {
        assert_eq!(handle_raw_status(0, None), Ok(()));
        assert!(matches!(
            handle_raw_status(-75, Some("overflow")),
            Err(MetaError::Overflow(_))
        ));
    }

    #[test]
    #[should_panic(expected = "unknown status code")]
    fn test_unknown_raw_status_panics() {
        let _ = handle_raw_status(-99, Some("whatever"));
    }
}
