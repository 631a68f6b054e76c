//! Identity types for tracemeta
//!
//! Engine objects are addressed through opaque 64-bit handles. A handle is
//! never zero, so `Option<RawHandle>` is as small as the handle itself.

use std::fmt;
use std::num::NonZeroU64;

/// Opaque handle to an engine-owned object
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle(NonZeroU64);

impl RawHandle {
    #[inline]
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(RawHandle)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Obj(#{})", self.0)
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of an engine object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    TraceClass,
    Trace,
    ClockClass,
    FieldClass,
    StreamClass,
    EventClass,
    Stream,
    Packet,
    Value,
}

impl ObjectKind {
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::TraceClass => "trace class",
            ObjectKind::Trace => "trace",
            ObjectKind::ClockClass => "clock class",
            ObjectKind::FieldClass => "field class",
            ObjectKind::StreamClass => "stream class",
            ObjectKind::EventClass => "event class",
            ObjectKind::Stream => "stream",
            ObjectKind::Packet => "packet",
            ObjectKind::Value => "value",
        }
    }

    /// Does this kind of object carry a user attributes map?
    pub fn has_user_attributes(self) -> bool {
        !matches!(self, ObjectKind::Packet | ObjectKind::Value)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a sentinel-coded engine id (negative = unset) into an option
#[inline]
pub fn id_from_sentinel(raw: i64) -> Option<u64> {
    u64::try_from(raw).ok()
}

/// Encode an optional id with the negative sentinel
#[inline]
pub fn id_to_sentinel(id: Option<u64>) -> i64 {
    id.and_then(|id| i64::try_from(id).ok()).unwrap_or(-1)
}
