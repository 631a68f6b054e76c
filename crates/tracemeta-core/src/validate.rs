//! Validation utilities
//!
//! Pure checks applied to caller input before anything reaches an engine.
//! Integers arrive as `i128` so that any value a dynamic caller can hand
//! over around the 64-bit boundaries is representable.

use crate::class::EventClassLogLevel;
use crate::error::{MetaError, MetaResult};
use crate::value::{Value, ValueKind, ValueMap};

/// Check that `v` fits a signed 64-bit integer
pub fn check_int64(v: impl Into<i128>) -> MetaResult<i64> {
    let v = v.into();
    i64::try_from(v).map_err(|_| {
        MetaError::Range(format!(
            "expecting a signed 64-bit integral value (got {})",
            v
        ))
    })
}

/// Check that `v` fits an unsigned 64-bit integer
pub fn check_uint64(v: impl Into<i128>) -> MetaResult<u64> {
    let v = v.into();
    u64::try_from(v).map_err(|_| {
        MetaError::Range(format!(
            "expecting an unsigned 64-bit integral value (got {})",
            v
        ))
    })
}

#[inline]
pub fn is_pow2(v: u64) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

/// Check that `a` is an unsigned 64-bit power of two
pub fn check_alignment(a: impl Into<i128>) -> MetaResult<u64> {
    let a = check_uint64(a)?;
    if !is_pow2(a) {
        return Err(MetaError::Range(format!("{} is not a power of two", a)));
    }
    Ok(a)
}

/// Check that `value` is of the `expected` kind
pub fn check_type(value: &Value, expected: ValueKind) -> MetaResult<()> {
    let actual = value.kind();
    if actual != expected {
        return Err(MetaError::type_mismatch(expected.name(), actual.name()));
    }
    Ok(())
}

pub fn check_str(value: &Value) -> MetaResult<&str> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(MetaError::type_mismatch(
            ValueKind::String.name(),
            other.kind().name(),
        )),
    }
}

pub fn check_bool(value: &Value) -> MetaResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(MetaError::type_mismatch(
            ValueKind::Bool.name(),
            other.kind().name(),
        )),
    }
}

/// Check that `value` is an integer of either signedness
pub fn check_int(value: &Value) -> MetaResult<i128> {
    value
        .as_int()
        .ok_or_else(|| MetaError::type_mismatch("int", value.kind().name()))
}

pub fn check_map(value: &Value) -> MetaResult<&ValueMap> {
    match value {
        Value::Map(map) => Ok(map),
        other => Err(MetaError::type_mismatch(
            ValueKind::Map.name(),
            other.kind().name(),
        )),
    }
}

/// Check that `v` is the raw value of one of the event class log levels
pub fn check_log_level(v: impl Into<i128>) -> MetaResult<EventClassLogLevel> {
    let v = v.into();
    u64::try_from(v)
        .ok()
        .and_then(EventClassLogLevel::from_raw)
        .ok_or_else(|| MetaError::Range(format!("'{}' is not a valid log level", v)))
}
