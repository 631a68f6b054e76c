//! Clock value conversions
//!
//! A clock class with frequency `f` and offset `(s, c)` maps a clock value
//! of `v` cycles to `s * 10^9 + c * 10^9 / f + v * 10^9 / f` nanoseconds
//! from its origin. The offset part (base offset) and the total must both
//! fit in an `i64`.

/// Nanoseconds per second
pub const NS_PER_S: u64 = 1_000_000_000;

/// Convert cycles to nanoseconds at `frequency` Hz (rounded down)
#[inline]
pub fn cycles_to_ns(frequency: u64, cycles: u64) -> u128 {
    debug_assert!(frequency != 0);
    if frequency == NS_PER_S {
        cycles as u128
    } else {
        (cycles as u128 * NS_PER_S as u128) / frequency as u128
    }
}

/// Base offset in nanoseconds, `None` on overflow
pub fn base_offset_ns(offset_seconds: i64, offset_cycles: u64, frequency: u64) -> Option<i64> {
    let ns = offset_seconds as i128 * NS_PER_S as i128
        + cycles_to_ns(frequency, offset_cycles) as i128;
    i64::try_from(ns).ok()
}

/// Nanoseconds from origin of a clock value, `None` on overflow
pub fn ns_from_origin(
    offset_seconds: i64,
    offset_cycles: u64,
    frequency: u64,
    cycles: u64,
) -> Option<i64> {
    let base = base_offset_ns(offset_seconds, offset_cycles, frequency)?;
    let ns = base as i128 + cycles_to_ns(frequency, cycles) as i128;
    i64::try_from(ns).ok()
}
