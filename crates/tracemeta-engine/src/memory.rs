//! In-process metadata engine

use std::collections::HashMap;

use parking_lot::Mutex;
use tracemeta_core::{
    id_to_sentinel, Engine, EngineResult, EngineStatus, EventClassLogLevel, FieldClassType,
    ObjectKind, PropertyAvailability, RawHandle, Value,
};
use tracing::warn;

use crate::arena::Arena;
use crate::clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineOpResult};
use crate::object::{
    ClockClassData, EventClassData, FieldClassData, Object, PacketData, StreamClassData,
    StreamData, TraceClassData, TraceData,
};
use crate::stats::EngineStats;

/// Reference metadata engine keeping every object in memory
///
/// All operations go through a single lock, so the engine can be shared
/// between threads behind an [`EngineRef`](tracemeta_core::EngineRef).
pub struct MemoryEngine {
    state: Mutex<State>,
}

struct State {
    arena: Arena,
    calls: HashMap<&'static str, u64>,
    rejections: u64,
    last_error: Option<EngineError>,
}

impl State {
    fn reject(&mut self, op: &'static str, err: EngineError) -> EngineStatus {
        warn!(op, error = %err, "engine operation rejected");
        let status = err.status();
        self.rejections += 1;
        self.last_error = Some(err);
        status
    }
}

impl MemoryEngine {
    pub fn new() -> Self {
        MemoryEngine::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        MemoryEngine {
            state: Mutex::new(State {
                arena: Arena::new(config),
                calls: HashMap::new(),
                rejections: 0,
                last_error: None,
            }),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.state.lock().arena.config.clone()
    }

    pub fn stats(&self) -> EngineStats {
        let state = self.state.lock();
        EngineStats {
            calls: state.calls.clone(),
            objects_created: state.arena.created,
            objects_destroyed: state.arena.destroyed,
            rejections: state.rejections,
        }
    }

    /// Number of objects currently alive, user attribute maps included
    pub fn live_objects(&self) -> usize {
        self.state.lock().arena.live_objects()
    }

    /// Reason behind the last error status
    pub fn last_error(&self) -> Option<EngineError> {
        self.state.lock().last_error.clone()
    }

    /// Current reference count of a live object
    pub fn ref_count(&self, handle: RawHandle) -> u64 {
        self.state.lock().arena.refs(handle)
    }

    pub fn is_frozen(&self, handle: RawHandle) -> bool {
        self.state.lock().arena.is_frozen(handle)
    }

    fn with<T>(&self, op: &'static str, f: impl FnOnce(&mut Arena) -> T) -> T {
        let mut state = self.state.lock();
        *state.calls.entry(op).or_insert(0) += 1;
        f(&mut state.arena)
    }

    fn fallible<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Arena) -> EngineOpResult<T>,
    ) -> EngineResult<T> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        *state.calls.entry(op).or_insert(0) += 1;
        f(&mut state.arena).map_err(|err| state.reject(op, err))
    }

    fn mutate(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Arena) -> EngineOpResult<()>,
    ) -> EngineStatus {
        match self.fallible(op, f) {
            Ok(()) => EngineStatus::Ok,
            Err(status) => status,
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        MemoryEngine::new()
    }
}

/// Pick the id of a new object: the next automatic id, or the requested
/// one when ids are explicit
fn assign_id(
    kind: ObjectKind,
    automatic: bool,
    requested: Option<u64>,
    next: u64,
    taken: impl Fn(u64) -> bool,
) -> EngineOpResult<u64> {
    match (automatic, requested) {
        (true, None) => Ok(next),
        (true, Some(_)) => Err(EngineError::UnexpectedId(kind)),
        (false, None) => Err(EngineError::MissingId(kind)),
        (false, Some(id)) if i64::try_from(id).is_err() => {
            Err(EngineError::IdOutOfRange { kind, id })
        }
        (false, Some(id)) if taken(id) => Err(EngineError::DuplicateId { kind, id }),
        (false, Some(id)) => Ok(id),
    }
}

fn ensure_structure(arena: &Arena, field_class: RawHandle) -> EngineOpResult<()> {
    let kind = arena.field_class(field_class).kind;
    if kind.is_structure() {
        Ok(())
    } else {
        Err(EngineError::NotAStructure(kind.name()))
    }
}

/// Attach `field_class` to `slot`, holding a reference on it
fn attach_field_class(arena: &mut Arena, slot: &mut Option<RawHandle>, field_class: RawHandle) {
    arena.get(field_class);
    if let Some(old) = slot.replace(field_class) {
        arena.put(old);
    }
    arena.freeze(field_class);
}

impl Engine for MemoryEngine {
    fn get_ref(&self, handle: RawHandle) {
        self.with("get_ref", |arena| arena.get(handle))
    }

    fn put_ref(&self, handle: RawHandle) {
        self.with("put_ref", |arena| arena.put(handle))
    }

    fn object_kind(&self, handle: RawHandle) -> Option<ObjectKind> {
        self.with("object_kind", |arena| arena.kind(handle))
    }

    fn value_create(&self, value: &Value) -> EngineResult<RawHandle> {
        self.fallible("value_create", |arena| {
            arena.alloc(Object::Value(value.clone()), None)
        })
    }

    fn value_read(&self, value: RawHandle) -> Value {
        self.with("value_read", |arena| arena.value(value).clone())
    }

    fn value_map_insert(&self, map: RawHandle, key: &str, value: &Value) -> EngineStatus {
        self.mutate("value_map_insert", |arena| {
            arena.ensure_mutable(map)?;
            let target = arena.value_mut(map);
            let kind = target.kind();
            let entries = target
                .as_map_mut()
                .ok_or(EngineError::NotAMap(kind.name()))?;
            entries.insert(key.to_owned(), value.clone());
            Ok(())
        })
    }

    fn value_is_frozen(&self, value: RawHandle) -> bool {
        self.with("value_is_frozen", |arena| arena.is_frozen(value))
    }

    fn borrow_user_attributes(&self, owner: RawHandle) -> RawHandle {
        self.with("borrow_user_attributes", |arena| arena.user_attributes(owner))
    }

    fn set_user_attributes(&self, owner: RawHandle, map: RawHandle) -> EngineStatus {
        self.mutate("set_user_attributes", |arena| {
            arena.ensure_mutable(owner)?;
            let value = arena.value(map);
            if !value.is_map() {
                return Err(EngineError::NotAMap(value.kind().name()));
            }
            arena.replace_user_attributes(owner, map);
            Ok(())
        })
    }

    // Trace classes

    fn trace_class_create(&self) -> EngineResult<RawHandle> {
        self.fallible("trace_class_create", |arena| {
            let data = TraceClassData {
                assigns_automatic_stream_class_id: true,
                ..Default::default()
            };
            arena.alloc(Object::TraceClass(data), None)
        })
    }

    fn trace_class_assigns_automatic_stream_class_id(&self, trace_class: RawHandle) -> bool {
        self.with("trace_class_assigns_automatic_stream_class_id", |arena| {
            arena.trace_class(trace_class).assigns_automatic_stream_class_id
        })
    }

    fn trace_class_set_assigns_automatic_stream_class_id(
        &self,
        trace_class: RawHandle,
        value: bool,
    ) -> EngineStatus {
        self.mutate("trace_class_set_assigns_automatic_stream_class_id", |arena| {
            arena.ensure_mutable(trace_class)?;
            arena.trace_class_mut(trace_class).assigns_automatic_stream_class_id = value;
            Ok(())
        })
    }

    fn trace_class_stream_class_count(&self, trace_class: RawHandle) -> u64 {
        self.with("trace_class_stream_class_count", |arena| {
            arena.trace_class(trace_class).stream_classes.len() as u64
        })
    }

    fn trace_class_borrow_stream_class_by_index(
        &self,
        trace_class: RawHandle,
        index: u64,
    ) -> Option<RawHandle> {
        self.with("trace_class_borrow_stream_class_by_index", |arena| {
            let stream_classes = &arena.trace_class(trace_class).stream_classes;
            usize::try_from(index)
                .ok()
                .and_then(|index| stream_classes.get(index).copied())
        })
    }

    fn trace_class_borrow_stream_class_by_id(
        &self,
        trace_class: RawHandle,
        id: u64,
    ) -> Option<RawHandle> {
        self.with("trace_class_borrow_stream_class_by_id", |arena| {
            arena
                .trace_class(trace_class)
                .stream_classes
                .iter()
                .copied()
                .find(|&sc| arena.stream_class(sc).id == id)
        })
    }

    // Traces

    fn trace_create(&self, trace_class: RawHandle) -> EngineResult<RawHandle> {
        self.fallible("trace_create", |arena| {
            let data = TraceData {
                class: trace_class,
                name: None,
                uuid: None,
                streams: Vec::new(),
            };
            // Kind check before allocating
            arena.trace_class(trace_class);
            let trace = arena.alloc(Object::Trace(data), None)?;
            arena.get(trace_class);
            arena.freeze(trace_class);
            Ok(trace)
        })
    }

    fn trace_get_name(&self, trace: RawHandle) -> Option<String> {
        self.with("trace_get_name", |arena| arena.trace(trace).name.clone())
    }

    fn trace_set_name(&self, trace: RawHandle, name: &str) -> EngineStatus {
        self.mutate("trace_set_name", |arena| {
            arena.ensure_mutable(trace)?;
            arena.trace_mut(trace).name = Some(name.to_owned());
            Ok(())
        })
    }

    fn trace_get_uuid(&self, trace: RawHandle) -> Option<[u8; 16]> {
        self.with("trace_get_uuid", |arena| arena.trace(trace).uuid)
    }

    fn trace_set_uuid(&self, trace: RawHandle, uuid: [u8; 16]) -> EngineStatus {
        self.mutate("trace_set_uuid", |arena| {
            arena.ensure_mutable(trace)?;
            arena.trace_mut(trace).uuid = Some(uuid);
            Ok(())
        })
    }

    fn trace_borrow_class(&self, trace: RawHandle) -> Option<RawHandle> {
        self.with("trace_borrow_class", |arena| Some(arena.trace(trace).class))
    }

    fn trace_stream_count(&self, trace: RawHandle) -> u64 {
        self.with("trace_stream_count", |arena| {
            arena.trace(trace).streams.len() as u64
        })
    }

    fn trace_borrow_stream_by_id(&self, trace: RawHandle, id: u64) -> Option<RawHandle> {
        self.with("trace_borrow_stream_by_id", |arena| {
            arena
                .trace(trace)
                .streams
                .iter()
                .copied()
                .find(|&stream| arena.stream(stream).id == id)
        })
    }

    // Clock classes

    fn clock_class_create(&self) -> EngineResult<RawHandle> {
        self.fallible("clock_class_create", |arena| {
            let data = ClockClassData::new(&arena.config);
            arena.alloc(Object::ClockClass(data), None)
        })
    }

    fn clock_class_get_name(&self, clock_class: RawHandle) -> Option<String> {
        self.with("clock_class_get_name", |arena| {
            arena.clock_class(clock_class).name.clone()
        })
    }

    fn clock_class_set_name(&self, clock_class: RawHandle, name: &str) -> EngineStatus {
        self.mutate("clock_class_set_name", |arena| {
            arena.ensure_mutable(clock_class)?;
            arena.clock_class_mut(clock_class).name = Some(name.to_owned());
            Ok(())
        })
    }

    fn clock_class_get_description(&self, clock_class: RawHandle) -> Option<String> {
        self.with("clock_class_get_description", |arena| {
            arena.clock_class(clock_class).description.clone()
        })
    }

    fn clock_class_set_description(
        &self,
        clock_class: RawHandle,
        description: &str,
    ) -> EngineStatus {
        self.mutate("clock_class_set_description", |arena| {
            arena.ensure_mutable(clock_class)?;
            arena.clock_class_mut(clock_class).description = Some(description.to_owned());
            Ok(())
        })
    }

    fn clock_class_get_frequency(&self, clock_class: RawHandle) -> u64 {
        self.with("clock_class_get_frequency", |arena| {
            arena.clock_class(clock_class).frequency
        })
    }

    fn clock_class_set_frequency(&self, clock_class: RawHandle, frequency: u64) -> EngineStatus {
        self.mutate("clock_class_set_frequency", |arena| {
            arena.ensure_mutable(clock_class)?;
            if frequency == 0 || frequency == u64::MAX {
                return Err(EngineError::InvalidFrequency(frequency));
            }
            let cc = arena.clock_class_mut(clock_class);
            if cc.offset_cycles >= frequency {
                return Err(EngineError::OffsetCyclesTooLarge {
                    cycles: cc.offset_cycles,
                    frequency,
                });
            }
            cc.frequency = frequency;
            Ok(())
        })
    }

    fn clock_class_get_precision(&self, clock_class: RawHandle) -> u64 {
        self.with("clock_class_get_precision", |arena| {
            arena.clock_class(clock_class).precision
        })
    }

    fn clock_class_set_precision(&self, clock_class: RawHandle, precision: u64) -> EngineStatus {
        self.mutate("clock_class_set_precision", |arena| {
            arena.ensure_mutable(clock_class)?;
            if precision == u64::MAX {
                return Err(EngineError::InvalidPrecision(precision));
            }
            arena.clock_class_mut(clock_class).precision = precision;
            Ok(())
        })
    }

    fn clock_class_get_offset(&self, clock_class: RawHandle) -> (i64, u64) {
        self.with("clock_class_get_offset", |arena| {
            let cc = arena.clock_class(clock_class);
            (cc.offset_seconds, cc.offset_cycles)
        })
    }

    fn clock_class_set_offset(
        &self,
        clock_class: RawHandle,
        seconds: i64,
        cycles: u64,
    ) -> EngineStatus {
        self.mutate("clock_class_set_offset", |arena| {
            arena.ensure_mutable(clock_class)?;
            let cc = arena.clock_class_mut(clock_class);
            if cycles >= cc.frequency {
                return Err(EngineError::OffsetCyclesTooLarge {
                    cycles,
                    frequency: cc.frequency,
                });
            }
            cc.offset_seconds = seconds;
            cc.offset_cycles = cycles;
            Ok(())
        })
    }

    fn clock_class_origin_is_unix_epoch(&self, clock_class: RawHandle) -> bool {
        self.with("clock_class_origin_is_unix_epoch", |arena| {
            arena.clock_class(clock_class).origin_is_unix_epoch
        })
    }

    fn clock_class_set_origin_is_unix_epoch(
        &self,
        clock_class: RawHandle,
        value: bool,
    ) -> EngineStatus {
        self.mutate("clock_class_set_origin_is_unix_epoch", |arena| {
            arena.ensure_mutable(clock_class)?;
            arena.clock_class_mut(clock_class).origin_is_unix_epoch = value;
            Ok(())
        })
    }

    fn clock_class_get_uuid(&self, clock_class: RawHandle) -> Option<[u8; 16]> {
        self.with("clock_class_get_uuid", |arena| {
            arena.clock_class(clock_class).uuid
        })
    }

    fn clock_class_set_uuid(&self, clock_class: RawHandle, uuid: [u8; 16]) -> EngineStatus {
        self.mutate("clock_class_set_uuid", |arena| {
            arena.ensure_mutable(clock_class)?;
            arena.clock_class_mut(clock_class).uuid = Some(uuid);
            Ok(())
        })
    }

    fn clock_class_cycles_to_ns_from_origin(
        &self,
        clock_class: RawHandle,
        cycles: u64,
    ) -> EngineResult<i64> {
        self.fallible("clock_class_cycles_to_ns_from_origin", |arena| {
            let cc = arena.clock_class(clock_class);
            clock::ns_from_origin(cc.offset_seconds, cc.offset_cycles, cc.frequency, cycles)
                .ok_or(EngineError::Overflow { cycles })
        })
    }

    // Field classes

    fn field_class_create(
        &self,
        trace_class: RawHandle,
        kind: FieldClassType,
    ) -> EngineResult<RawHandle> {
        self.fallible("field_class_create", |arena| {
            arena.trace_class(trace_class);
            arena.alloc(Object::FieldClass(FieldClassData::new(kind)), None)
        })
    }

    fn field_class_get_type(&self, field_class: RawHandle) -> FieldClassType {
        self.with("field_class_get_type", |arena| {
            arena.field_class(field_class).kind
        })
    }

    fn field_class_structure_get_minimum_alignment(&self, field_class: RawHandle) -> u64 {
        self.with("field_class_structure_get_minimum_alignment", |arena| {
            let fc = arena.field_class(field_class);
            assert!(fc.kind.is_structure(), "{} is not a structure", fc.kind);
            fc.minimum_alignment
        })
    }

    fn field_class_structure_set_minimum_alignment(
        &self,
        field_class: RawHandle,
        alignment: u64,
    ) -> EngineStatus {
        self.mutate("field_class_structure_set_minimum_alignment", |arena| {
            arena.ensure_mutable(field_class)?;
            ensure_structure(arena, field_class)?;
            if !alignment.is_power_of_two() {
                return Err(EngineError::InvalidAlignment(alignment));
            }
            arena.field_class_mut(field_class).minimum_alignment = alignment;
            Ok(())
        })
    }

    // Stream classes

    fn stream_class_create(
        &self,
        trace_class: RawHandle,
        id: Option<u64>,
    ) -> EngineResult<RawHandle> {
        self.fallible("stream_class_create", |arena| {
            let tc = arena.trace_class(trace_class);
            let id = assign_id(
                ObjectKind::StreamClass,
                tc.assigns_automatic_stream_class_id,
                id,
                tc.stream_classes.len() as u64,
                |id| tc.stream_classes.iter().any(|&sc| arena.stream_class(sc).id == id),
            )?;
            let sc = arena.alloc(
                Object::StreamClass(StreamClassData::new(id)),
                Some(trace_class),
            )?;
            arena.trace_class_mut(trace_class).stream_classes.push(sc);
            Ok(sc)
        })
    }

    fn stream_class_get_id(&self, stream_class: RawHandle) -> u64 {
        self.with("stream_class_get_id", |arena| {
            arena.stream_class(stream_class).id
        })
    }

    fn stream_class_get_name(&self, stream_class: RawHandle) -> Option<String> {
        self.with("stream_class_get_name", |arena| {
            arena.stream_class(stream_class).name.clone()
        })
    }

    fn stream_class_set_name(&self, stream_class: RawHandle, name: &str) -> EngineStatus {
        self.mutate("stream_class_set_name", |arena| {
            arena.ensure_mutable(stream_class)?;
            arena.stream_class_mut(stream_class).name = Some(name.to_owned());
            Ok(())
        })
    }

    fn stream_class_supports_packets(&self, stream_class: RawHandle) -> bool {
        self.with("stream_class_supports_packets", |arena| {
            arena.stream_class(stream_class).supports_packets
        })
    }

    fn stream_class_set_supports_packets(
        &self,
        stream_class: RawHandle,
        value: bool,
    ) -> EngineStatus {
        self.mutate("stream_class_set_supports_packets", |arena| {
            arena.ensure_mutable(stream_class)?;
            arena.stream_class_mut(stream_class).supports_packets = value;
            Ok(())
        })
    }

    fn stream_class_assigns_automatic_event_class_id(&self, stream_class: RawHandle) -> bool {
        self.with("stream_class_assigns_automatic_event_class_id", |arena| {
            arena.stream_class(stream_class).assigns_automatic_event_class_id
        })
    }

    fn stream_class_set_assigns_automatic_event_class_id(
        &self,
        stream_class: RawHandle,
        value: bool,
    ) -> EngineStatus {
        self.mutate("stream_class_set_assigns_automatic_event_class_id", |arena| {
            arena.ensure_mutable(stream_class)?;
            arena.stream_class_mut(stream_class).assigns_automatic_event_class_id = value;
            Ok(())
        })
    }

    fn stream_class_assigns_automatic_stream_id(&self, stream_class: RawHandle) -> bool {
        self.with("stream_class_assigns_automatic_stream_id", |arena| {
            arena.stream_class(stream_class).assigns_automatic_stream_id
        })
    }

    fn stream_class_set_assigns_automatic_stream_id(
        &self,
        stream_class: RawHandle,
        value: bool,
    ) -> EngineStatus {
        self.mutate("stream_class_set_assigns_automatic_stream_id", |arena| {
            arena.ensure_mutable(stream_class)?;
            arena.stream_class_mut(stream_class).assigns_automatic_stream_id = value;
            Ok(())
        })
    }

    fn stream_class_borrow_default_clock_class(
        &self,
        stream_class: RawHandle,
    ) -> Option<RawHandle> {
        self.with("stream_class_borrow_default_clock_class", |arena| {
            arena.stream_class(stream_class).default_clock_class
        })
    }

    fn stream_class_set_default_clock_class(
        &self,
        stream_class: RawHandle,
        clock_class: RawHandle,
    ) -> EngineStatus {
        self.mutate("stream_class_set_default_clock_class", |arena| {
            arena.ensure_mutable(stream_class)?;
            arena.clock_class(clock_class);
            arena.get(clock_class);
            let old = arena
                .stream_class_mut(stream_class)
                .default_clock_class
                .replace(clock_class);
            if let Some(old) = old {
                arena.put(old);
            }
            arena.freeze(clock_class);
            Ok(())
        })
    }

    fn stream_class_borrow_trace_class(&self, stream_class: RawHandle) -> Option<RawHandle> {
        self.with("stream_class_borrow_trace_class", |arena| {
            arena.stream_class(stream_class);
            arena.parent(stream_class)
        })
    }

    fn stream_class_event_class_count(&self, stream_class: RawHandle) -> u64 {
        self.with("stream_class_event_class_count", |arena| {
            arena.stream_class(stream_class).event_classes.len() as u64
        })
    }

    fn stream_class_borrow_event_class_by_index(
        &self,
        stream_class: RawHandle,
        index: u64,
    ) -> Option<RawHandle> {
        self.with("stream_class_borrow_event_class_by_index", |arena| {
            let event_classes = &arena.stream_class(stream_class).event_classes;
            usize::try_from(index)
                .ok()
                .and_then(|index| event_classes.get(index).copied())
        })
    }

    fn stream_class_borrow_event_class_by_id(
        &self,
        stream_class: RawHandle,
        id: u64,
    ) -> Option<RawHandle> {
        self.with("stream_class_borrow_event_class_by_id", |arena| {
            arena
                .stream_class(stream_class)
                .event_classes
                .iter()
                .copied()
                .find(|&ec| arena.event_class(ec).id == id)
        })
    }

    // Event classes

    fn event_class_create(
        &self,
        stream_class: RawHandle,
        id: Option<u64>,
    ) -> EngineResult<RawHandle> {
        self.fallible("event_class_create", |arena| {
            let sc = arena.stream_class(stream_class);
            let id = assign_id(
                ObjectKind::EventClass,
                sc.assigns_automatic_event_class_id,
                id,
                sc.event_classes.len() as u64,
                |id| sc.event_classes.iter().any(|&ec| arena.event_class(ec).id == id),
            )?;
            let ec = arena.alloc(
                Object::EventClass(EventClassData::new(id)),
                Some(stream_class),
            )?;
            arena.stream_class_mut(stream_class).event_classes.push(ec);
            arena.freeze(stream_class);
            Ok(ec)
        })
    }

    fn event_class_get_id(&self, event_class: RawHandle) -> i64 {
        self.with("event_class_get_id", |arena| {
            id_to_sentinel(Some(arena.event_class(event_class).id))
        })
    }

    fn event_class_get_name(&self, event_class: RawHandle) -> Option<String> {
        self.with("event_class_get_name", |arena| {
            arena.event_class(event_class).name.clone()
        })
    }

    fn event_class_set_name(&self, event_class: RawHandle, name: &str) -> EngineStatus {
        self.mutate("event_class_set_name", |arena| {
            arena.ensure_mutable(event_class)?;
            arena.event_class_mut(event_class).name = Some(name.to_owned());
            Ok(())
        })
    }

    fn event_class_get_log_level(&self, event_class: RawHandle) -> (PropertyAvailability, u64) {
        self.with("event_class_get_log_level", |arena| {
            match arena.event_class(event_class).log_level {
                Some(level) => (PropertyAvailability::Available, level),
                None => (PropertyAvailability::NotAvailable, 0),
            }
        })
    }

    fn event_class_set_log_level(&self, event_class: RawHandle, log_level: u64) -> EngineStatus {
        self.mutate("event_class_set_log_level", |arena| {
            arena.ensure_mutable(event_class)?;
            if EventClassLogLevel::from_raw(log_level).is_none() {
                return Err(EngineError::InvalidLogLevel(log_level));
            }
            arena.event_class_mut(event_class).log_level = Some(log_level);
            Ok(())
        })
    }

    fn event_class_get_emf_uri(&self, event_class: RawHandle) -> Option<String> {
        self.with("event_class_get_emf_uri", |arena| {
            arena.event_class(event_class).emf_uri.clone()
        })
    }

    fn event_class_set_emf_uri(&self, event_class: RawHandle, emf_uri: &str) -> EngineStatus {
        self.mutate("event_class_set_emf_uri", |arena| {
            arena.ensure_mutable(event_class)?;
            arena.event_class_mut(event_class).emf_uri = Some(emf_uri.to_owned());
            Ok(())
        })
    }

    fn event_class_borrow_specific_context_field_class(
        &self,
        event_class: RawHandle,
    ) -> Option<RawHandle> {
        self.with("event_class_borrow_specific_context_field_class", |arena| {
            arena.event_class(event_class).specific_context_field_class
        })
    }

    fn event_class_set_specific_context_field_class(
        &self,
        event_class: RawHandle,
        field_class: RawHandle,
    ) -> EngineStatus {
        self.mutate("event_class_set_specific_context_field_class", |arena| {
            arena.ensure_mutable(event_class)?;
            ensure_structure(arena, field_class)?;
            let mut slot = arena.event_class(event_class).specific_context_field_class;
            attach_field_class(arena, &mut slot, field_class);
            arena.event_class_mut(event_class).specific_context_field_class = slot;
            Ok(())
        })
    }

    fn event_class_borrow_payload_field_class(
        &self,
        event_class: RawHandle,
    ) -> Option<RawHandle> {
        self.with("event_class_borrow_payload_field_class", |arena| {
            arena.event_class(event_class).payload_field_class
        })
    }

    fn event_class_set_payload_field_class(
        &self,
        event_class: RawHandle,
        field_class: RawHandle,
    ) -> EngineStatus {
        self.mutate("event_class_set_payload_field_class", |arena| {
            arena.ensure_mutable(event_class)?;
            ensure_structure(arena, field_class)?;
            let mut slot = arena.event_class(event_class).payload_field_class;
            attach_field_class(arena, &mut slot, field_class);
            arena.event_class_mut(event_class).payload_field_class = slot;
            Ok(())
        })
    }

    fn event_class_borrow_stream_class(&self, event_class: RawHandle) -> Option<RawHandle> {
        self.with("event_class_borrow_stream_class", |arena| {
            arena.event_class(event_class);
            arena.parent(event_class)
        })
    }

    // Streams

    fn stream_create(
        &self,
        stream_class: RawHandle,
        trace: RawHandle,
        id: Option<u64>,
    ) -> EngineResult<RawHandle> {
        self.fallible("stream_create", |arena| {
            let sc = arena.stream_class(stream_class);
            let automatic = sc.assigns_automatic_stream_id;
            if arena.parent(stream_class) != Some(arena.trace(trace).class) {
                return Err(EngineError::TraceClassMismatch);
            }

            // Stream ids are unique per stream class within a trace
            let sibling_ids: Vec<u64> = arena
                .trace(trace)
                .streams
                .iter()
                .map(|&stream| arena.stream(stream))
                .filter(|stream| stream.class == stream_class)
                .map(|stream| stream.id)
                .collect();
            let id = assign_id(
                ObjectKind::Stream,
                automatic,
                id,
                sibling_ids.len() as u64,
                |id| sibling_ids.contains(&id),
            )?;

            let data = StreamData {
                id,
                name: None,
                class: stream_class,
            };
            let stream = arena.alloc(Object::Stream(data), Some(trace))?;
            arena.get(stream_class);
            arena.trace_mut(trace).streams.push(stream);
            arena.freeze(stream_class);
            Ok(stream)
        })
    }

    fn stream_get_id(&self, stream: RawHandle) -> i64 {
        self.with("stream_get_id", |arena| {
            id_to_sentinel(Some(arena.stream(stream).id))
        })
    }

    fn stream_get_name(&self, stream: RawHandle) -> Option<String> {
        self.with("stream_get_name", |arena| arena.stream(stream).name.clone())
    }

    fn stream_set_name(&self, stream: RawHandle, name: &str) -> EngineStatus {
        self.mutate("stream_set_name", |arena| {
            arena.ensure_mutable(stream)?;
            arena.stream_mut(stream).name = Some(name.to_owned());
            Ok(())
        })
    }

    fn stream_borrow_class(&self, stream: RawHandle) -> Option<RawHandle> {
        self.with("stream_borrow_class", |arena| Some(arena.stream(stream).class))
    }

    fn stream_borrow_trace(&self, stream: RawHandle) -> Option<RawHandle> {
        self.with("stream_borrow_trace", |arena| {
            arena.stream(stream);
            arena.parent(stream)
        })
    }

    // Packets

    fn packet_create(&self, stream: RawHandle) -> Option<RawHandle> {
        self.fallible("packet_create", |arena| {
            let class = arena.stream(stream).class;
            if !arena.stream_class(class).supports_packets {
                return Err(EngineError::PacketsNotSupported);
            }
            let packet = arena.alloc(Object::Packet(PacketData { stream }), None)?;
            arena.get(stream);
            Ok(packet)
        })
        .ok()
    }

    fn packet_borrow_stream(&self, packet: RawHandle) -> Option<RawHandle> {
        self.with("packet_borrow_stream", |arena| {
            Some(arena.packet(packet).stream)
        })
    }
}
