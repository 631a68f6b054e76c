//! Metadata class enumerations
//!
//! - Event class log levels: a syslog-like severity scale with
//!   fine-grained debug sub-levels
//! - Field class types: the shape of a field class
//! - Property availability: how engines report optional properties

use std::fmt;

/// Event class log level
///
/// Lower value = higher severity (by convention).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EventClassLogLevel {
    /// System is unusable
    Emergency = 0,
    /// Action must be taken immediately
    Alert = 1,
    /// Critical conditions
    Critical = 2,
    /// Error conditions
    Error = 3,
    /// Warning conditions
    Warning = 4,
    /// Normal, but significant, condition
    Notice = 5,
    /// Informational message
    Info = 6,
    /// Debug information with system-level scope (set of programs)
    DebugSystem = 7,
    /// Debug information with program-level scope (set of processes)
    DebugProgram = 8,
    /// Debug information with process-level scope (set of modules)
    DebugProcess = 9,
    /// Debug information with module (executable/library) scope
    DebugModule = 10,
    /// Debug information with compilation-unit scope
    DebugUnit = 11,
    /// Debug information with function-level scope
    DebugFunction = 12,
    /// Debug information with line-level scope
    DebugLine = 13,
    /// Debug-level message
    Debug = 14,
}

impl EventClassLogLevel {
    /// All log levels, in declaration order
    pub const ALL: [EventClassLogLevel; 15] = [
        EventClassLogLevel::Emergency,
        EventClassLogLevel::Alert,
        EventClassLogLevel::Critical,
        EventClassLogLevel::Error,
        EventClassLogLevel::Warning,
        EventClassLogLevel::Notice,
        EventClassLogLevel::Info,
        EventClassLogLevel::DebugSystem,
        EventClassLogLevel::DebugProgram,
        EventClassLogLevel::DebugProcess,
        EventClassLogLevel::DebugModule,
        EventClassLogLevel::DebugUnit,
        EventClassLogLevel::DebugFunction,
        EventClassLogLevel::DebugLine,
        EventClassLogLevel::Debug,
    ];

    /// Parse from a raw engine value
    pub fn from_raw(raw: u64) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Convert to a raw engine value
    #[inline]
    pub fn as_raw(self) -> u64 {
        self as u64
    }

    pub fn name(self) -> &'static str {
        match self {
            EventClassLogLevel::Emergency => "emergency",
            EventClassLogLevel::Alert => "alert",
            EventClassLogLevel::Critical => "critical",
            EventClassLogLevel::Error => "error",
            EventClassLogLevel::Warning => "warning",
            EventClassLogLevel::Notice => "notice",
            EventClassLogLevel::Info => "info",
            EventClassLogLevel::DebugSystem => "debug:system",
            EventClassLogLevel::DebugProgram => "debug:program",
            EventClassLogLevel::DebugProcess => "debug:process",
            EventClassLogLevel::DebugModule => "debug:module",
            EventClassLogLevel::DebugUnit => "debug:unit",
            EventClassLogLevel::DebugFunction => "debug:function",
            EventClassLogLevel::DebugLine => "debug:line",
            EventClassLogLevel::Debug => "debug",
        }
    }

    /// Is this one of the debug levels?
    pub fn is_debug(self) -> bool {
        self >= EventClassLogLevel::DebugSystem
    }
}

impl fmt::Display for EventClassLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field class type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldClassType {
    Bool,
    BitArray,
    UnsignedInteger,
    SignedInteger,
    SinglePrecisionReal,
    DoublePrecisionReal,
    String,
    Structure,
    StaticArray,
    DynamicArray,
    Option,
    Variant,
}

impl FieldClassType {
    pub fn name(self) -> &'static str {
        match self {
            FieldClassType::Bool => "bool field class",
            FieldClassType::BitArray => "bit array field class",
            FieldClassType::UnsignedInteger => "unsigned integer field class",
            FieldClassType::SignedInteger => "signed integer field class",
            FieldClassType::SinglePrecisionReal => "single-precision real field class",
            FieldClassType::DoublePrecisionReal => "double-precision real field class",
            FieldClassType::String => "string field class",
            FieldClassType::Structure => "structure field class",
            FieldClassType::StaticArray => "static array field class",
            FieldClassType::DynamicArray => "dynamic array field class",
            FieldClassType::Option => "option field class",
            FieldClassType::Variant => "variant field class",
        }
    }

    #[inline]
    pub fn is_structure(self) -> bool {
        self == FieldClassType::Structure
    }
}

impl fmt::Display for FieldClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Availability flag returned by engines alongside optional properties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyAvailability {
    Available,
    NotAvailable,
}

impl PropertyAvailability {
    /// Convert an availability/value pair into an option
    #[inline]
    pub fn into_option<T>(self, value: T) -> Option<T> {
        match self {
            PropertyAvailability::Available => Some(value),
            PropertyAvailability::NotAvailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_roundtrip() {
        for level in EventClassLogLevel::ALL {
            assert_eq!(EventClassLogLevel::from_raw(level.as_raw()), Some(level));
        }
    }

    #[test]
    fn test_log_level_out_of_range() {
        assert_eq!(EventClassLogLevel::from_raw(15), None);
        assert_eq!(EventClassLogLevel::from_raw(999), None);
        assert_eq!(EventClassLogLevel::from_raw(u64::MAX), None);
    }

    #[test]
    fn test_log_level_severity_ordering() {
        assert!(EventClassLogLevel::Emergency < EventClassLogLevel::Alert);
        assert!(EventClassLogLevel::Info < EventClassLogLevel::DebugSystem);
        assert!(EventClassLogLevel::DebugLine < EventClassLogLevel::Debug);
        assert!(!EventClassLogLevel::Notice.is_debug());
        assert!(EventClassLogLevel::DebugUnit.is_debug());
    }

    #[test]
    fn test_availability() {
        assert_eq!(PropertyAvailability::Available.into_option(3), Some(3));
        assert_eq!(PropertyAvailability::NotAvailable.into_option(3), None);
    }
}
