//! End-to-end Integration Test Suite
//!
//! Tests that exercise the object model over the memory engine:
//! - Building complete hierarchies
//! - Validation before any engine mutation
//! - Freezing of attached objects
//! - Release of every engine object once the last view is dropped

use tracemeta_core::{FieldClassType, MetaResult};
use tracemeta_ir::{ClockClassOffset, EventClassParams, WithUserAttributesMut};

use crate::fixtures::{Hierarchy, HierarchyConfig};

/// Outcome of a build-then-drop scenario
#[derive(Clone, Debug)]
pub struct TeardownReport {
    pub objects_created: u64,
    pub objects_destroyed: u64,
    /// Objects still alive once every view was dropped
    pub live_after_drop: usize,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.live_after_drop == 0 && self.objects_created == self.objects_destroyed
    }
}

/// Build a populated hierarchy, drop every view and report what the
/// engine still holds
pub fn run_teardown_scenario(
    config: HierarchyConfig,
    event_classes: u64,
    streams: u64,
) -> MetaResult<TeardownReport> {
    let hierarchy = Hierarchy::with_config(config)?;
    let supports_packets = hierarchy.stream_class.supports_packets();

    for i in 0..event_classes {
        let mut payload = hierarchy.trace_class.create_structure_field_class()?;
        payload.set_minimum_alignment(8)?;
        let mut event_class = hierarchy.stream_class.create_event_class(
            EventClassParams::new()
                .with_name(format!("event_{}", i))
                .with_user_attributes([("index", i)])
                .with_payload_field_class(payload),
        )?;
        event_class.user_attributes_mut().insert("built", true)?;
    }

    let mut packets = Vec::new();
    for i in 0..streams {
        let mut stream = hierarchy.stream_class.create_stream(&hierarchy.trace, None)?;
        stream.set_name(&format!("stream_{}", i))?;
        if supports_packets {
            packets.push(stream.create_packet()?);
        }
    }

    let memory = hierarchy.into_engine();
    drop(packets);
    let stats = memory.stats();
    Ok(TeardownReport {
        objects_created: stats.objects_created,
        objects_destroyed: stats.objects_destroyed,
        live_after_drop: memory.live_objects(),
    })
}

/// Set every clock class property and read them back through a read-only
/// view; returns whether all of them round-trip
pub fn clock_class_roundtrip(offset: ClockClassOffset, frequency: u64) -> MetaResult<bool> {
    let hierarchy = Hierarchy::new()?;
    let mut clock_class = hierarchy.trace_class.create_clock_class()?;
    let uuid = uuid::Uuid::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);

    clock_class.set_name("realtime")?;
    clock_class.set_frequency(frequency)?;
    clock_class.set_precision(10)?;
    clock_class.set_offset(offset)?;
    clock_class.set_uuid(uuid)?;

    let view = clock_class.as_const();
    Ok(view.name().as_deref() == Some("realtime")
        && view.frequency() == frequency
        && view.precision() == 10
        && view.offset() == offset
        && view.uuid() == Some(uuid))
}

/// Field class types a trace class can create
pub const FIELD_CLASS_TYPES: [FieldClassType; 4] = [
    FieldClassType::Bool,
    FieldClassType::UnsignedInteger,
    FieldClassType::String,
    FieldClassType::Structure,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracemeta_core::{EngineRef, EventClassLogLevel, MetaError, Value};
    use tracemeta_engine::{EngineConfig, MemoryEngine};
    use tracemeta_ir::{ClockClassConst, TraceClass, WithUserAttributes};

    #[test]
    fn test_teardown_minimal() {
        let report = run_teardown_scenario(HierarchyConfig::minimal(), 3, 2).unwrap();
        assert!(report.is_clean(), "{:?}", report);
        assert!(report.objects_created > 0);
    }

    #[test]
    fn test_teardown_full() {
        let report = run_teardown_scenario(HierarchyConfig::full(), 5, 4).unwrap();
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_clock_class_roundtrip() {
        assert!(clock_class_roundtrip(ClockClassOffset::new(1_600_000_000, 42), 1_000).unwrap());
        assert!(clock_class_roundtrip(ClockClassOffset::new(-5, 0), 1_000_000_000).unwrap());
    }

    #[test]
    fn test_offset_int64_boundaries() {
        let min = i64::MIN as i128;
        let max = i64::MAX as i128;
        assert!(ClockClassOffset::try_new(min, 0).is_ok());
        assert!(ClockClassOffset::try_new(max, 0).is_ok());
        assert!(matches!(
            ClockClassOffset::try_new(min - 1, 0),
            Err(MetaError::Range(_))
        ));
        assert!(matches!(
            ClockClassOffset::try_new(0, max + 1),
            Err(MetaError::Range(_))
        ));
    }

    #[test]
    fn test_offset_equality() {
        assert_eq!(ClockClassOffset::new(5, 10), ClockClassOffset::new(5, 10));
        assert_ne!(ClockClassOffset::new(5, 10), ClockClassOffset::new(5, 11));
        assert!(ClockClassOffset::new(5, 10) != Value::from([("seconds", 5i64)]));
    }

    #[test]
    fn test_structure_alignment_values() {
        let hierarchy = Hierarchy::new().unwrap();
        let mut fc = hierarchy.trace_class.create_structure_field_class().unwrap();
        for good in [1i128, 2, 4, 1024] {
            fc.set_minimum_alignment(good).unwrap();
            assert_eq!(fc.minimum_alignment(), Some(good as u64));
        }
        for bad in [0i128, 3, 6] {
            assert!(matches!(
                fc.set_minimum_alignment(bad),
                Err(MetaError::Range(_))
            ));
        }
    }

    #[test]
    fn test_cycles_to_ns() {
        let hierarchy = Hierarchy::new().unwrap();
        let mut cc = hierarchy.trace_class.create_clock_class().unwrap();
        assert_eq!(cc.cycles_to_ns_from_origin(5).unwrap(), 5);

        cc.set_frequency(3).unwrap();
        assert!(matches!(
            cc.cycles_to_ns_from_origin(u64::MAX),
            Err(MetaError::Overflow(_))
        ));
        assert!(matches!(
            cc.cycles_to_ns_from_origin_checked(u64::MAX as i128 + 1),
            Err(MetaError::Range(_))
        ));
    }

    #[test]
    fn test_event_class_ids_fit_signed_range() {
        let mut hierarchy = Hierarchy::new().unwrap();
        hierarchy
            .stream_class
            .set_assigns_automatic_event_class_id(false)
            .unwrap();

        let present = hierarchy
            .stream_class
            .create_event_class(EventClassParams::new().with_id(42))
            .unwrap();
        assert_eq!(present.id(), Some(42));

        let largest = hierarchy
            .stream_class
            .create_event_class(EventClassParams::new().with_id(i64::MAX as u64))
            .unwrap();
        assert_eq!(largest.id(), Some(i64::MAX as u64));

        // Beyond the signed range an id could not be read back
        let err = hierarchy
            .stream_class
            .create_event_class(EventClassParams::new().with_id(i64::MAX as u64 + 1))
            .unwrap_err();
        assert!(matches!(err, MetaError::Range(_)));
        assert_eq!(hierarchy.stream_class.event_class_count(), 2);
        assert_eq!(
            hierarchy.stream_class.event_class_by_id(i64::MAX as u64 + 1),
            None
        );
    }

    #[test]
    fn test_invalid_log_level_creates_nothing() {
        let hierarchy = Hierarchy::new().unwrap();
        let err = hierarchy
            .stream_class
            .create_event_class(
                EventClassParams::new()
                    .with_name("syscall_entry_open")
                    .with_log_level(999),
            )
            .unwrap_err();
        assert!(matches!(err, MetaError::Range(_)));
        assert!(err.is_validation());
        assert_eq!(hierarchy.stream_class.event_class_count(), 0);
        assert_eq!(hierarchy.stats().calls_to("event_class_create"), 0);
    }

    #[test]
    fn test_log_levels_roundtrip() {
        let hierarchy = Hierarchy::new().unwrap();
        for level in EventClassLogLevel::ALL {
            let ec = hierarchy
                .stream_class
                .create_event_class(EventClassParams::new().with_log_level(level.as_raw() as i64))
                .unwrap();
            assert_eq!(ec.as_const().log_level(), Some(level));
        }
    }

    #[test]
    fn test_create_packet_without_support() {
        let hierarchy = Hierarchy::new().unwrap();
        let stream = hierarchy
            .stream_class
            .create_stream(&hierarchy.trace, None)
            .unwrap();
        let err = stream.create_packet().unwrap_err();
        assert_eq!(
            err,
            MetaError::Precondition(
                "cannot create packet: stream class does not support packets".to_string()
            )
        );
        assert_eq!(hierarchy.stats().calls_to("packet_create"), 0);
    }

    #[test]
    fn test_packet_navigation() {
        let hierarchy = Hierarchy::with_config(HierarchyConfig::full()).unwrap();
        let stream = hierarchy
            .stream_class
            .create_stream(&hierarchy.trace, None)
            .unwrap();
        let packet = stream.create_packet().unwrap();
        assert_eq!(packet.stream(), stream);
        assert_eq!(packet.stream().trace(), hierarchy.trace);
        assert_eq!(
            packet.stream().cls().default_clock_class(),
            hierarchy.clock_class
        );
    }

    #[test]
    fn test_allocation_limit() {
        let memory = Arc::new(MemoryEngine::with_config(EngineConfig::with_max_objects(2)));
        let engine: EngineRef = memory.clone();
        let tc = TraceClass::new(&engine).unwrap();
        let err = tc.create_clock_class().unwrap_err();
        assert_eq!(
            err,
            MetaError::OutOfMemory("cannot create clock class object".to_string())
        );
        assert_eq!(memory.live_objects(), 2);
    }

    #[test]
    fn test_stale_wrapper_on_frozen_clock_class() {
        let mut hierarchy = Hierarchy::new().unwrap();
        let mut clock_class = hierarchy.trace_class.create_clock_class().unwrap();
        let mut stale = clock_class.clone();
        clock_class.set_frequency(1_000).unwrap();
        hierarchy
            .stream_class
            .set_default_clock_class(&clock_class)
            .unwrap();

        assert_eq!(
            stale.set_frequency(2_000),
            Err(MetaError::Engine(
                "cannot set clock class object's frequency".to_string()
            ))
        );
        assert!(stale.set_user_attributes([("late", true)]).is_err());
        assert!(stale.user_attributes_mut().insert("late", true).is_err());
        assert!(clock_class.user_attributes().is_frozen());
        assert_eq!(clock_class.frequency(), 1_000);
    }

    #[test]
    fn test_user_attributes_type_mismatch() {
        let hierarchy = Hierarchy::new().unwrap();
        let mut trace = hierarchy.trace.clone();
        assert_eq!(
            trace.set_user_attributes(23u64),
            Err(MetaError::type_mismatch("map", "unsigned integer"))
        );
        trace.set_user_attributes([("hostname", "node-1")]).unwrap();
        assert_eq!(
            trace.user_attributes().get_str("hostname").unwrap(),
            Some("node-1".to_string())
        );
    }

    #[test]
    fn test_read_only_views() {
        fn describe(clock_class: &ClockClassConst) -> (Option<String>, usize) {
            (clock_class.name(), clock_class.user_attributes().len())
        }

        let hierarchy = Hierarchy::with_config(HierarchyConfig::full()).unwrap();
        let view = hierarchy
            .stream_class
            .as_const()
            .default_clock_class()
            .unwrap();
        assert_eq!(describe(&view), (Some("monotonic".to_string()), 0));
    }

    #[test]
    fn test_field_class_types() {
        let hierarchy = Hierarchy::new().unwrap();
        for field_type in FIELD_CLASS_TYPES {
            let fc = hierarchy.trace_class.create_field_class(field_type).unwrap();
            assert_eq!(fc.field_type(), field_type);
            assert_eq!(fc.minimum_alignment().is_some(), field_type.is_structure());
        }
    }

    #[test]
    fn test_views_shared_across_threads() {
        let hierarchy = Hierarchy::with_config(HierarchyConfig::full()).unwrap();
        let stream_class = hierarchy.stream_class.as_const();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stream_class = stream_class.clone();
                std::thread::spawn(move || {
                    stream_class
                        .default_clock_class()
                        .map(|cc| cc.frequency())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(1_000_000_000));
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_clock_class_roundtrip(
            seconds in proptest::prelude::any::<i64>(),
            frequency in 1u64..=u64::MAX - 1,
            cycles_seed in proptest::prelude::any::<u64>(),
        ) {
            let cycles = (cycles_seed % frequency) as i64;
            proptest::prop_assume!(cycles >= 0);
            let offset = ClockClassOffset::new(seconds, cycles);
            proptest::prop_assert!(clock_class_roundtrip(offset, frequency).unwrap());
        }
    }
}
