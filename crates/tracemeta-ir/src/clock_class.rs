//! Clock classes
//!
//! A clock class describes a clock: its frequency, precision and offset
//! from an origin. A clock value in cycles converts to nanoseconds from
//! the origin as `offset_seconds * 10^9 + (offset_cycles + cycles) * 10^9 /
//! frequency`, each term rounded down.

use tracemeta_core::{check_int64, check_uint64, handle_status, MetaResult, Value};
use uuid::Uuid;

use crate::object::{engine_result, entity, Constness, Mutable};
use crate::user_attributes::impl_user_attributes;

entity! {
    /// Clock class
    ClockClass, ClockClassConst => ClockClass
}

impl_user_attributes!(ClockClass);

/// Offset of a clock class from its origin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClockClassOffset {
    seconds: i64,
    cycles: i64,
}

impl ClockClassOffset {
    pub fn new(seconds: i64, cycles: i64) -> Self {
        ClockClassOffset { seconds, cycles }
    }

    /// Build an offset from dynamic integers, both must fit an `i64`
    pub fn try_new(seconds: impl Into<i128>, cycles: impl Into<i128>) -> MetaResult<Self> {
        Ok(ClockClassOffset {
            seconds: check_int64(seconds)?,
            cycles: check_int64(cycles)?,
        })
    }

    #[inline]
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    #[inline]
    pub fn cycles(&self) -> i64 {
        self.cycles
    }
}

/// An offset never equals a dynamic value
impl PartialEq<Value> for ClockClassOffset {
    fn eq(&self, _other: &Value) -> bool {
        false
    }
}

impl<C: Constness> ClockClass<C> {
    pub fn name(&self) -> Option<String> {
        self.engine().clock_class_get_name(self.handle())
    }

    pub fn description(&self) -> Option<String> {
        self.engine().clock_class_get_description(self.handle())
    }

    /// Frequency in Hz
    pub fn frequency(&self) -> u64 {
        self.engine().clock_class_get_frequency(self.handle())
    }

    pub fn precision(&self) -> u64 {
        self.engine().clock_class_get_precision(self.handle())
    }

    pub fn offset(&self) -> ClockClassOffset {
        let (seconds, cycles) = self.engine().clock_class_get_offset(self.handle());
        match i64::try_from(cycles) {
            Ok(cycles) => ClockClassOffset::new(seconds, cycles),
            Err(_) => panic!("clock class offset cycles out of range: {}", cycles),
        }
    }

    pub fn origin_is_unix_epoch(&self) -> bool {
        self.engine().clock_class_origin_is_unix_epoch(self.handle())
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.engine()
            .clock_class_get_uuid(self.handle())
            .map(Uuid::from_bytes)
    }

    /// Convert a clock value to nanoseconds from the clock's origin
    pub fn cycles_to_ns_from_origin(&self, cycles: u64) -> MetaResult<i64> {
        let result = self
            .engine()
            .clock_class_cycles_to_ns_from_origin(self.handle(), cycles);
        engine_result(
            result,
            "cannot convert clock value to nanoseconds from origin for given clock class",
        )
    }

    /// Same as [`cycles_to_ns_from_origin`](Self::cycles_to_ns_from_origin)
    /// for a dynamic integer, which must fit a `u64`
    pub fn cycles_to_ns_from_origin_checked(&self, cycles: impl Into<i128>) -> MetaResult<i64> {
        self.cycles_to_ns_from_origin(check_uint64(cycles)?)
    }
}

impl ClockClass<Mutable> {
    pub fn set_name(&mut self, name: &str) -> MetaResult<()> {
        let status = self.engine().clock_class_set_name(self.handle(), name);
        handle_status(status, Some("cannot set clock class object's name"))
    }

    pub fn set_description(&mut self, description: &str) -> MetaResult<()> {
        let status = self
            .engine()
            .clock_class_set_description(self.handle(), description);
        handle_status(status, Some("cannot set clock class object's description"))
    }

    pub fn set_frequency(&mut self, frequency: u64) -> MetaResult<()> {
        let status = self
            .engine()
            .clock_class_set_frequency(self.handle(), frequency);
        handle_status(status, Some("cannot set clock class object's frequency"))
    }

    pub fn set_precision(&mut self, precision: u64) -> MetaResult<()> {
        let status = self
            .engine()
            .clock_class_set_precision(self.handle(), precision);
        handle_status(status, Some("cannot set clock class object's precision"))
    }

    /// Set the offset; its cycles must not be negative
    pub fn set_offset(&mut self, offset: ClockClassOffset) -> MetaResult<()> {
        let cycles = check_uint64(offset.cycles())?;
        let status = self
            .engine()
            .clock_class_set_offset(self.handle(), offset.seconds(), cycles);
        handle_status(status, Some("cannot set clock class object's offset"))
    }

    pub fn set_origin_is_unix_epoch(&mut self, origin_is_unix_epoch: bool) -> MetaResult<()> {
        let status = self
            .engine()
            .clock_class_set_origin_is_unix_epoch(self.handle(), origin_is_unix_epoch);
        handle_status(
            status,
            Some("cannot set clock class object's origin is Unix epoch property"),
        )
    }

    pub fn set_uuid(&mut self, uuid: Uuid) -> MetaResult<()> {
        let status = self
            .engine()
            .clock_class_set_uuid(self.handle(), uuid.into_bytes());
        handle_status(status, Some("cannot set clock class object's UUID"))
    }
}
