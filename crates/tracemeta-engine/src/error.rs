//! Engine-side rejections
//!
//! The engine contract only reports statuses. The reason behind a failed
//! status is kept as the engine's last error, much like a native library
//! keeps an error cause for its caller.

use thiserror::Error;
use tracemeta_core::{EngineStatus, ObjectKind, RawHandle};

/// Why the memory engine rejected an operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{kind} {handle} is frozen")]
    Frozen { kind: ObjectKind, handle: RawHandle },

    #[error("allocation limit reached: {limit} live objects")]
    OutOfMemory { limit: usize },

    #[error("invalid clock class frequency: {0}")]
    InvalidFrequency(u64),

    #[error("invalid clock class precision: {0}")]
    InvalidPrecision(u64),

    #[error("offset cycles ({cycles}) are not less than the frequency ({frequency})")]
    OffsetCyclesTooLarge { cycles: u64, frequency: u64 },

    #[error("clock value overflows the signed 64-bit nanosecond range: cycles={cycles}")]
    Overflow { cycles: u64 },

    #[error("expecting a map value, got a {0} value")]
    NotAMap(&'static str),

    #[error("expecting a structure field class, got a {0}")]
    NotAStructure(&'static str),

    #[error("invalid event class log level: {0}")]
    InvalidLogLevel(u64),

    #[error("minimum alignment {0} is not a power of two")]
    InvalidAlignment(u64),

    #[error("{kind} id {id} is already in use")]
    DuplicateId { kind: ObjectKind, id: u64 },

    #[error("{kind} id {id} does not fit a signed 64-bit integer")]
    IdOutOfRange { kind: ObjectKind, id: u64 },

    #[error("{0} ids are assigned automatically; no explicit id allowed")]
    UnexpectedId(ObjectKind),

    #[error("{0} ids are not assigned automatically; an explicit id is required")]
    MissingId(ObjectKind),

    #[error("stream class and trace do not belong to the same trace class")]
    TraceClassMismatch,

    #[error("stream class does not support packets")]
    PacketsNotSupported,
}

impl EngineError {
    /// Status reported through the engine contract
    pub fn status(&self) -> EngineStatus {
        match self {
            EngineError::OutOfMemory { .. } => EngineStatus::MemoryError,
            EngineError::Overflow { .. } => EngineStatus::OverflowError,
            _ => EngineStatus::Error,
        }
    }
}

/// Result type for memory engine internals
pub type EngineOpResult<T> = Result<T, EngineError>;
