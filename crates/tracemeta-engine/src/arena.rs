//! Object arena with reference counting, parent links and freezing

use std::collections::HashMap;

use tracemeta_core::{ObjectKind, RawHandle, Value};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineOpResult};
use crate::object::{
    ClockClassData, EventClassData, FieldClassData, Object, PacketData, Slot, StreamClassData,
    StreamData, TraceClassData, TraceData,
};

pub(crate) struct Arena {
    slots: HashMap<u64, Slot>,
    next_handle: u64,
    pub config: EngineConfig,
    pub created: u64,
    pub destroyed: u64,
}

macro_rules! typed_access {
    ($($get:ident => $variant:ident($data:ty);)*) => {
        $(
            pub fn $get(&self, handle: RawHandle) -> &$data {
                match &self.slot(handle).object {
                    Object::$variant(data) => data,
                    other => panic!(
                        "{handle} is a {} object, expecting a {}",
                        other.kind(),
                        ObjectKind::$variant
                    ),
                }
            }
        )*
    };
}

macro_rules! typed_access_mut {
    ($($get_mut:ident => $variant:ident($data:ty);)*) => {
        $(
            pub fn $get_mut(&mut self, handle: RawHandle) -> &mut $data {
                match &mut self.slot_mut(handle).object {
                    Object::$variant(data) => data,
                    other => panic!(
                        "{handle} is a {} object, expecting a {}",
                        other.kind(),
                        ObjectKind::$variant
                    ),
                }
            }
        )*
    };
}

impl Arena {
    pub fn new(config: EngineConfig) -> Self {
        Arena {
            slots: HashMap::new(),
            next_handle: 1,
            config,
            created: 0,
            destroyed: 0,
        }
    }

    pub fn live_objects(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub fn contains(&self, handle: RawHandle) -> bool {
        self.slots.contains_key(&handle.get())
    }

    fn slot(&self, handle: RawHandle) -> &Slot {
        match self.slots.get(&handle.get()) {
            Some(slot) => slot,
            None => panic!("{handle} is not a live object"),
        }
    }

    fn slot_mut(&mut self, handle: RawHandle) -> &mut Slot {
        match self.slots.get_mut(&handle.get()) {
            Some(slot) => slot,
            None => panic!("{handle} is not a live object"),
        }
    }

    pub fn kind(&self, handle: RawHandle) -> Option<ObjectKind> {
        self.slots.get(&handle.get()).map(|slot| slot.object.kind())
    }

    pub fn refs(&self, handle: RawHandle) -> u64 {
        self.slot(handle).refs
    }

    /// Allocate an object carrying one reference owned by the caller.
    ///
    /// A parented object takes a reference on its parent; the caller is
    /// responsible for listing it among the parent's children.
    pub fn alloc(&mut self, object: Object, parent: Option<RawHandle>) -> EngineOpResult<RawHandle> {
        let kind = object.kind();
        let needed = if kind.has_user_attributes() { 2 } else { 1 };
        if let Some(limit) = self.config.max_objects {
            if self.slots.len() + needed > limit {
                return Err(EngineError::OutOfMemory { limit });
            }
        }

        let user_attributes = if kind.has_user_attributes() {
            Some(self.insert(Object::Value(Value::empty_map()), None, None))
        } else {
            None
        };

        let handle = self.insert(object, parent, user_attributes);
        if let Some(parent) = parent {
            self.get(parent);
        }
        Ok(handle)
    }

    fn insert(
        &mut self,
        object: Object,
        parent: Option<RawHandle>,
        user_attributes: Option<RawHandle>,
    ) -> RawHandle {
        let handle = RawHandle::new(self.next_handle).unwrap_or_else(|| unreachable!());
        self.next_handle += 1;
        self.created += 1;
        trace!(%handle, kind = %object.kind(), "allocated object");
        self.slots.insert(
            handle.get(),
            Slot {
                refs: 1,
                parent,
                frozen: false,
                user_attributes,
                object,
            },
        );
        handle
    }

    /// Take a reference; the first reference on a parented object also
    /// takes a reference on its parent
    pub fn get(&mut self, handle: RawHandle) {
        let mut current = Some(handle);
        while let Some(handle) = current.take() {
            let slot = self.slot_mut(handle);
            slot.refs += 1;
            if slot.refs == 1 {
                current = slot.parent;
            }
        }
    }

    /// Release a reference; the last reference on a parented object
    /// releases its parent, the last reference on a root object destroys it
    pub fn put(&mut self, handle: RawHandle) {
        let mut pending = vec![handle];
        while let Some(handle) = pending.pop() {
            let slot = self.slot_mut(handle);
            assert!(slot.refs > 0, "{handle} has no reference to release");
            slot.refs -= 1;
            if slot.refs > 0 {
                continue;
            }
            match slot.parent {
                Some(parent) => pending.push(parent),
                None => self.destroy(handle, &mut pending),
            }
        }
    }

    /// Destroy an object along with its children; references they hold
    /// are queued on `pending`
    fn destroy(&mut self, handle: RawHandle, pending: &mut Vec<RawHandle>) {
        let mut doomed = vec![handle];
        while let Some(handle) = doomed.pop() {
            let Some(slot) = self.slots.remove(&handle.get()) else {
                panic!("{handle} is not a live object");
            };
            debug_assert_eq!(slot.refs, 0, "destroying referenced object {handle}");
            doomed.extend_from_slice(slot.object.children());
            pending.extend(slot.object.held_refs());
            pending.extend(slot.user_attributes);
            self.destroyed += 1;
            debug!(%handle, kind = %slot.object.kind(), "destroyed object");
        }
    }

    // Freezing

    pub fn is_frozen(&self, handle: RawHandle) -> bool {
        self.slot(handle).frozen
    }

    /// Freeze an object and its user attributes
    pub fn freeze(&mut self, handle: RawHandle) {
        if !self.config.freeze_on_attach {
            return;
        }
        let slot = self.slot_mut(handle);
        if slot.frozen {
            return;
        }
        slot.frozen = true;
        let user_attributes = slot.user_attributes;
        debug!(%handle, kind = %slot.object.kind(), "froze object");
        if let Some(map) = user_attributes {
            self.slot_mut(map).frozen = true;
        }
    }

    pub fn ensure_mutable(&self, handle: RawHandle) -> EngineOpResult<()> {
        let slot = self.slot(handle);
        if slot.frozen {
            return Err(EngineError::Frozen {
                kind: slot.object.kind(),
                handle,
            });
        }
        Ok(())
    }

    // Structure

    pub fn parent(&self, handle: RawHandle) -> Option<RawHandle> {
        self.slot(handle).parent
    }

    pub fn user_attributes(&self, handle: RawHandle) -> RawHandle {
        let slot = self.slot(handle);
        match slot.user_attributes {
            Some(map) => map,
            None => panic!("{} objects have no user attributes", slot.object.kind()),
        }
    }

    /// Replace the map an object holds as user attributes
    pub fn replace_user_attributes(&mut self, owner: RawHandle, map: RawHandle) {
        let old = self.user_attributes(owner);
        self.get(map);
        self.slot_mut(owner).user_attributes = Some(map);
        self.put(old);
    }

    typed_access! {
        value => Value(Value);
        trace_class => TraceClass(TraceClassData);
        trace => Trace(TraceData);
        clock_class => ClockClass(ClockClassData);
        field_class => FieldClass(FieldClassData);
        stream_class => StreamClass(StreamClassData);
        event_class => EventClass(EventClassData);
        stream => Stream(StreamData);
        packet => Packet(PacketData);
    }

    typed_access_mut! {
        value_mut => Value(Value);
        trace_class_mut => TraceClass(TraceClassData);
        trace_mut => Trace(TraceData);
        clock_class_mut => ClockClass(ClockClassData);
        field_class_mut => FieldClass(FieldClassData);
        stream_class_mut => StreamClass(StreamClassData);
        event_class_mut => EventClass(EventClassData);
        stream_mut => Stream(StreamData);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(EngineConfig::default())
    }

    fn stream_class(arena: &mut Arena, trace_class: RawHandle) -> RawHandle {
        let sc = arena
            .alloc(
                Object::StreamClass(StreamClassData::new(0)),
                Some(trace_class),
            )
            .unwrap();
        arena.trace_class_mut(trace_class).stream_classes.push(sc);
        sc
    }

    #[test]
    fn test_alloc_with_user_attributes() {
        let mut arena = arena();
        let tc = arena
            .alloc(Object::TraceClass(TraceClassData::default()), None)
            .unwrap();
        // Trace class plus its user attributes map
        assert_eq!(arena.live_objects(), 2);
        let map = arena.user_attributes(tc);
        assert_eq!(arena.kind(map), Some(ObjectKind::Value));
        assert!(arena.value(map).is_map());

        arena.put(tc);
        assert_eq!(arena.live_objects(), 0);
        assert_eq!(arena.created, arena.destroyed);
    }

    #[test]
    fn test_child_keeps_parent_alive() {
        let mut arena = arena();
        let tc = arena
            .alloc(Object::TraceClass(TraceClassData::default()), None)
            .unwrap();
        let sc = stream_class(&mut arena, tc);
        assert_eq!(arena.refs(tc), 2);

        // Dropping the trace class handle leaves it alive through the child
        arena.put(tc);
        assert!(arena.contains(tc));
        assert_eq!(arena.refs(tc), 1);

        // Last child reference releases the parent, which destroys both
        arena.put(sc);
        assert!(!arena.contains(tc));
        assert!(!arena.contains(sc));
        assert_eq!(arena.live_objects(), 0);
    }

    #[test]
    fn test_child_reacquires_parent() {
        let mut arena = arena();
        let tc = arena
            .alloc(Object::TraceClass(TraceClassData::default()), None)
            .unwrap();
        let sc = stream_class(&mut arena, tc);
        arena.put(sc);
        // Child still owned by its parent
        assert!(arena.contains(sc));
        assert_eq!(arena.refs(sc), 0);
        assert_eq!(arena.refs(tc), 1);

        arena.get(sc);
        assert_eq!(arena.refs(tc), 2);
        arena.put(sc);
        arena.put(tc);
        assert_eq!(arena.live_objects(), 0);
    }

    #[test]
    fn test_held_refs_released_on_destroy() {
        let mut arena = arena();
        let cc = arena
            .alloc(Object::ClockClass(ClockClassData::default()), None)
            .unwrap();
        let tc = arena
            .alloc(Object::TraceClass(TraceClassData::default()), None)
            .unwrap();
        let sc = stream_class(&mut arena, tc);
        arena.get(cc);
        arena.stream_class_mut(sc).default_clock_class = Some(cc);

        arena.put(cc);
        assert!(arena.contains(cc));
        arena.put(sc);
        arena.put(tc);
        assert!(!arena.contains(cc));
        assert_eq!(arena.live_objects(), 0);
    }

    #[test]
    fn test_freeze_covers_user_attributes() {
        let mut arena = arena();
        let cc = arena
            .alloc(Object::ClockClass(ClockClassData::default()), None)
            .unwrap();
        assert!(arena.ensure_mutable(cc).is_ok());
        arena.freeze(cc);
        assert!(arena.is_frozen(cc));
        assert!(arena.is_frozen(arena.user_attributes(cc)));
        assert_eq!(
            arena.ensure_mutable(cc),
            Err(EngineError::Frozen {
                kind: ObjectKind::ClockClass,
                handle: cc
            })
        );
    }

    #[test]
    fn test_freeze_disabled() {
        let mut arena = Arena::new(EngineConfig {
            freeze_on_attach: false,
            ..Default::default()
        });
        let cc = arena
            .alloc(Object::ClockClass(ClockClassData::default()), None)
            .unwrap();
        arena.freeze(cc);
        assert!(!arena.is_frozen(cc));
    }

    #[test]
    fn test_allocation_limit() {
        let mut arena = Arena::new(EngineConfig::with_max_objects(3));
        arena
            .alloc(Object::ClockClass(ClockClassData::default()), None)
            .unwrap();
        // A clock class needs two slots, only one left
        assert_eq!(
            arena
                .alloc(Object::ClockClass(ClockClassData::default()), None)
                .unwrap_err(),
            EngineError::OutOfMemory { limit: 3 }
        );
        assert_eq!(arena.live_objects(), 2);
    }

    #[test]
    fn test_replace_user_attributes() {
        let mut arena = arena();
        let cc = arena
            .alloc(Object::ClockClass(ClockClassData::default()), None)
            .unwrap();
        let old = arena.user_attributes(cc);
        let map = arena
            .alloc(Object::Value(Value::empty_map()), None)
            .unwrap();
        arena.replace_user_attributes(cc, map);
        assert!(!arena.contains(old));
        assert_eq!(arena.refs(map), 2);
        arena.put(map);
        arena.put(cc);
        assert_eq!(arena.live_objects(), 0);
    }

    #[test]
    #[should_panic(expected = "expecting a clock class")]
    fn test_kind_mismatch_panics() {
        let mut arena = arena();
        let tc = arena
            .alloc(Object::TraceClass(TraceClassData::default()), None)
            .unwrap();
        arena.clock_class(tc);
    }
}
