//! Engine contract
//!
//! The [`Engine`] trait lists every operation the metadata object model
//! delegates to the engine that owns the actual metadata objects.
//!
//! Conventions:
//! - Handles passed in must be live handles of the expected kind; passing
//!   anything else is a caller bug and engines may panic.
//! - `borrow_*` operations return non-owning handles: the caller takes its
//!   own reference with [`Engine::get_ref`] if it keeps the object.
//! - Creators return a handle carrying one reference owned by the caller.
//! - Mutators return an [`EngineStatus`].
//! - Ids use a negative sentinel for "unset"; optional enumerations come
//!   with a [`PropertyAvailability`] flag.

use std::sync::Arc;

use crate::class::{FieldClassType, PropertyAvailability};
use crate::id::{ObjectKind, RawHandle};
use crate::status::EngineStatus;
use crate::value::Value;

/// Shared reference to an engine
pub type EngineRef = Arc<dyn Engine>;

/// Result of an engine factory operation
pub type EngineResult<T> = Result<T, EngineStatus>;

/// Operations a metadata engine provides
pub trait Engine: Send + Sync {
    // Reference counting

    /// Take a reference on an object
    fn get_ref(&self, handle: RawHandle);

    /// Release a reference on an object
    fn put_ref(&self, handle: RawHandle);

    /// Kind of a live object
    fn object_kind(&self, handle: RawHandle) -> Option<ObjectKind>;

    // Values

    fn value_create(&self, value: &Value) -> EngineResult<RawHandle>;

    /// Snapshot of a value's content
    fn value_read(&self, value: RawHandle) -> Value;

    /// Insert an entry into a map value
    fn value_map_insert(&self, map: RawHandle, key: &str, value: &Value) -> EngineStatus;

    fn value_is_frozen(&self, value: RawHandle) -> bool;

    // User attributes (any object whose kind has user attributes)

    fn borrow_user_attributes(&self, owner: RawHandle) -> RawHandle;

    /// Replace the owner's user attributes with the map value `map`
    fn set_user_attributes(&self, owner: RawHandle, map: RawHandle) -> EngineStatus;

    // Trace classes

    fn trace_class_create(&self) -> EngineResult<RawHandle>;
    fn trace_class_assigns_automatic_stream_class_id(&self, trace_class: RawHandle) -> bool;
    fn trace_class_set_assigns_automatic_stream_class_id(
        &self,
        trace_class: RawHandle,
        value: bool,
    ) -> EngineStatus;
    fn trace_class_stream_class_count(&self, trace_class: RawHandle) -> u64;
    fn trace_class_borrow_stream_class_by_index(
        &self,
        trace_class: RawHandle,
        index: u64,
    ) -> Option<RawHandle>;
    fn trace_class_borrow_stream_class_by_id(
        &self,
        trace_class: RawHandle,
        id: u64,
    ) -> Option<RawHandle>;

    // Traces

    fn trace_create(&self, trace_class: RawHandle) -> EngineResult<RawHandle>;
    fn trace_get_name(&self, trace: RawHandle) -> Option<String>;
    fn trace_set_name(&self, trace: RawHandle, name: &str) -> EngineStatus;
    fn trace_get_uuid(&self, trace: RawHandle) -> Option<[u8; 16]>;
    fn trace_set_uuid(&self, trace: RawHandle, uuid: [u8; 16]) -> EngineStatus;
    fn trace_borrow_class(&self, trace: RawHandle) -> Option<RawHandle>;
    fn trace_stream_count(&self, trace: RawHandle) -> u64;
    fn trace_borrow_stream_by_id(&self, trace: RawHandle, id: u64) -> Option<RawHandle>;

    // Clock classes

    fn clock_class_create(&self) -> EngineResult<RawHandle>;
    fn clock_class_get_name(&self, clock_class: RawHandle) -> Option<String>;
    fn clock_class_set_name(&self, clock_class: RawHandle, name: &str) -> EngineStatus;
    fn clock_class_get_description(&self, clock_class: RawHandle) -> Option<String>;
    fn clock_class_set_description(&self, clock_class: RawHandle, description: &str)
        -> EngineStatus;
    fn clock_class_get_frequency(&self, clock_class: RawHandle) -> u64;
    fn clock_class_set_frequency(&self, clock_class: RawHandle, frequency: u64) -> EngineStatus;
    fn clock_class_get_precision(&self, clock_class: RawHandle) -> u64;
    fn clock_class_set_precision(&self, clock_class: RawHandle, precision: u64) -> EngineStatus;
    /// Offset as (seconds, cycles)
    fn clock_class_get_offset(&self, clock_class: RawHandle) -> (i64, u64);
    fn clock_class_set_offset(&self, clock_class: RawHandle, seconds: i64, cycles: u64)
        -> EngineStatus;
    fn clock_class_origin_is_unix_epoch(&self, clock_class: RawHandle) -> bool;
    fn clock_class_set_origin_is_unix_epoch(&self, clock_class: RawHandle, value: bool)
        -> EngineStatus;
    fn clock_class_get_uuid(&self, clock_class: RawHandle) -> Option<[u8; 16]>;
    fn clock_class_set_uuid(&self, clock_class: RawHandle, uuid: [u8; 16]) -> EngineStatus;
    /// Convert a clock value in cycles to nanoseconds from the clock origin
    fn clock_class_cycles_to_ns_from_origin(
        &self,
        clock_class: RawHandle,
        cycles: u64,
    ) -> EngineResult<i64>;

    // Field classes

    fn field_class_create(
        &self,
        trace_class: RawHandle,
        kind: FieldClassType,
    ) -> EngineResult<RawHandle>;
    fn field_class_get_type(&self, field_class: RawHandle) -> FieldClassType;
    /// Minimum alignment of a structure field class, in bits
    fn field_class_structure_get_minimum_alignment(&self, field_class: RawHandle) -> u64;
    fn field_class_structure_set_minimum_alignment(
        &self,
        field_class: RawHandle,
        alignment: u64,
    ) -> EngineStatus;

    // Stream classes

    /// Create a stream class; `id` must be set iff the trace class does
    /// not assign stream class ids automatically
    fn stream_class_create(
        &self,
        trace_class: RawHandle,
        id: Option<u64>,
    ) -> EngineResult<RawHandle>;
    fn stream_class_get_id(&self, stream_class: RawHandle) -> u64;
    fn stream_class_get_name(&self, stream_class: RawHandle) -> Option<String>;
    fn stream_class_set_name(&self, stream_class: RawHandle, name: &str) -> EngineStatus;
    fn stream_class_supports_packets(&self, stream_class: RawHandle) -> bool;
    fn stream_class_set_supports_packets(&self, stream_class: RawHandle, value: bool)
        -> EngineStatus;
    fn stream_class_assigns_automatic_event_class_id(&self, stream_class: RawHandle) -> bool;
    fn stream_class_set_assigns_automatic_event_class_id(
        &self,
        stream_class: RawHandle,
        value: bool,
    ) -> EngineStatus;
    fn stream_class_assigns_automatic_stream_id(&self, stream_class: RawHandle) -> bool;
    fn stream_class_set_assigns_automatic_stream_id(
        &self,
        stream_class: RawHandle,
        value: bool,
    ) -> EngineStatus;
    fn stream_class_borrow_default_clock_class(&self, stream_class: RawHandle)
        -> Option<RawHandle>;
    fn stream_class_set_default_clock_class(
        &self,
        stream_class: RawHandle,
        clock_class: RawHandle,
    ) -> EngineStatus;
    fn stream_class_borrow_trace_class(&self, stream_class: RawHandle) -> Option<RawHandle>;
    fn stream_class_event_class_count(&self, stream_class: RawHandle) -> u64;
    fn stream_class_borrow_event_class_by_index(
        &self,
        stream_class: RawHandle,
        index: u64,
    ) -> Option<RawHandle>;
    fn stream_class_borrow_event_class_by_id(
        &self,
        stream_class: RawHandle,
        id: u64,
    ) -> Option<RawHandle>;

    // Event classes

    /// Create an event class; `id` must be set iff the stream class does
    /// not assign event class ids automatically
    fn event_class_create(
        &self,
        stream_class: RawHandle,
        id: Option<u64>,
    ) -> EngineResult<RawHandle>;
    /// Event class id, negative if unset
    fn event_class_get_id(&self, event_class: RawHandle) -> i64;
    fn event_class_get_name(&self, event_class: RawHandle) -> Option<String>;
    fn event_class_set_name(&self, event_class: RawHandle, name: &str) -> EngineStatus;
    fn event_class_get_log_level(&self, event_class: RawHandle) -> (PropertyAvailability, u64);
    fn event_class_set_log_level(&self, event_class: RawHandle, log_level: u64) -> EngineStatus;
    fn event_class_get_emf_uri(&self, event_class: RawHandle) -> Option<String>;
    fn event_class_set_emf_uri(&self, event_class: RawHandle, emf_uri: &str) -> EngineStatus;
    fn event_class_borrow_specific_context_field_class(
        &self,
        event_class: RawHandle,
    ) -> Option<RawHandle>;
    fn event_class_set_specific_context_field_class(
        &self,
        event_class: RawHandle,
        field_class: RawHandle,
    ) -> EngineStatus;
    fn event_class_borrow_payload_field_class(&self, event_class: RawHandle)
        -> Option<RawHandle>;
    fn event_class_set_payload_field_class(
        &self,
        event_class: RawHandle,
        field_class: RawHandle,
    ) -> EngineStatus;
    fn event_class_borrow_stream_class(&self, event_class: RawHandle) -> Option<RawHandle>;

    // Streams

    /// Create a stream of `trace`; `id` must be set iff the stream class
    /// does not assign stream ids automatically
    fn stream_create(
        &self,
        stream_class: RawHandle,
        trace: RawHandle,
        id: Option<u64>,
    ) -> EngineResult<RawHandle>;
    /// Stream id, negative if unset
    fn stream_get_id(&self, stream: RawHandle) -> i64;
    fn stream_get_name(&self, stream: RawHandle) -> Option<String>;
    fn stream_set_name(&self, stream: RawHandle, name: &str) -> EngineStatus;
    fn stream_borrow_class(&self, stream: RawHandle) -> Option<RawHandle>;
    fn stream_borrow_trace(&self, stream: RawHandle) -> Option<RawHandle>;

    // Packets

    /// Create a packet; `None` on allocation failure
    fn packet_create(&self, stream: RawHandle) -> Option<RawHandle>;
    fn packet_borrow_stream(&self, packet: RawHandle) -> Option<RawHandle>;
}
