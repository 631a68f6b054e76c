//! Engine object storage
//!
//! Every object lives in a [`Slot`] of the arena. Objects with a parent
//! (stream class, event class, stream) are owned by that parent: while
//! such a child has references it holds one reference on its parent, and
//! it is destroyed together with the parent.

use tracemeta_core::{FieldClassType, ObjectKind, RawHandle, Value};

use crate::config::EngineConfig;

pub(crate) struct Slot {
    /// References held by callers and by other objects
    pub refs: u64,
    pub parent: Option<RawHandle>,
    pub frozen: bool,
    pub user_attributes: Option<RawHandle>,
    pub object: Object,
}

pub(crate) enum Object {
    Value(Value),
    TraceClass(TraceClassData),
    Trace(TraceData),
    ClockClass(ClockClassData),
    FieldClass(FieldClassData),
    StreamClass(StreamClassData),
    EventClass(EventClassData),
    Stream(StreamData),
    Packet(PacketData),
}

#[derive(Default)]
pub(crate) struct TraceClassData {
    pub assigns_automatic_stream_class_id: bool,
    pub stream_classes: Vec<RawHandle>,
}

pub(crate) struct TraceData {
    pub class: RawHandle,
    pub name: Option<String>,
    pub uuid: Option<[u8; 16]>,
    pub streams: Vec<RawHandle>,
}

pub(crate) struct ClockClassData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: u64,
    pub precision: u64,
    pub offset_seconds: i64,
    pub offset_cycles: u64,
    pub origin_is_unix_epoch: bool,
    pub uuid: Option<[u8; 16]>,
}

pub(crate) struct FieldClassData {
    pub kind: FieldClassType,
    /// Minimum alignment in bits (structures only)
    pub minimum_alignment: u64,
}

pub(crate) struct StreamClassData {
    pub id: u64,
    pub name: Option<String>,
    pub supports_packets: bool,
    pub assigns_automatic_event_class_id: bool,
    pub assigns_automatic_stream_id: bool,
    pub default_clock_class: Option<RawHandle>,
    pub event_classes: Vec<RawHandle>,
}

pub(crate) struct EventClassData {
    pub id: u64,
    pub name: Option<String>,
    pub log_level: Option<u64>,
    pub emf_uri: Option<String>,
    pub specific_context_field_class: Option<RawHandle>,
    pub payload_field_class: Option<RawHandle>,
}

pub(crate) struct StreamData {
    pub id: u64,
    pub name: Option<String>,
    pub class: RawHandle,
}

pub(crate) struct PacketData {
    pub stream: RawHandle,
}

impl ClockClassData {
    pub fn new(config: &EngineConfig) -> Self {
        ClockClassData {
            name: None,
            description: None,
            frequency: config.default_frequency,
            precision: 0,
            offset_seconds: 0,
            offset_cycles: 0,
            origin_is_unix_epoch: config.default_origin_is_unix_epoch,
            uuid: None,
        }
    }
}

impl Default for ClockClassData {
    fn default() -> Self {
        ClockClassData::new(&EngineConfig::default())
    }
}

impl FieldClassData {
    pub fn new(kind: FieldClassType) -> Self {
        FieldClassData {
            kind,
            minimum_alignment: 1,
        }
    }
}

impl StreamClassData {
    pub fn new(id: u64) -> Self {
        StreamClassData {
            id,
            name: None,
            supports_packets: false,
            assigns_automatic_event_class_id: true,
            assigns_automatic_stream_id: true,
            default_clock_class: None,
            event_classes: Vec::new(),
        }
    }
}

impl EventClassData {
    pub fn new(id: u64) -> Self {
        EventClassData {
            id,
            name: None,
            log_level: None,
            emf_uri: None,
            specific_context_field_class: None,
            payload_field_class: None,
        }
    }
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Value(_) => ObjectKind::Value,
            Object::TraceClass(_) => ObjectKind::TraceClass,
            Object::Trace(_) => ObjectKind::Trace,
            Object::ClockClass(_) => ObjectKind::ClockClass,
            Object::FieldClass(_) => ObjectKind::FieldClass,
            Object::StreamClass(_) => ObjectKind::StreamClass,
            Object::EventClass(_) => ObjectKind::EventClass,
            Object::Stream(_) => ObjectKind::Stream,
            Object::Packet(_) => ObjectKind::Packet,
        }
    }

    /// Objects owned through a parent link
    pub fn children(&self) -> &[RawHandle] {
        match self {
            Object::TraceClass(tc) => &tc.stream_classes,
            Object::Trace(trace) => &trace.streams,
            Object::StreamClass(sc) => &sc.event_classes,
            _ => &[],
        }
    }

    /// References this object holds on other (non-child) objects
    pub fn held_refs(&self) -> Vec<RawHandle> {
        match self {
            Object::Trace(trace) => vec![trace.class],
            Object::StreamClass(sc) => sc.default_clock_class.into_iter().collect(),
            Object::EventClass(ec) => ec
                .specific_context_field_class
                .into_iter()
                .chain(ec.payload_field_class)
                .collect(),
            Object::Stream(stream) => vec![stream.class],
            Object::Packet(packet) => vec![packet.stream],
            _ => Vec::new(),
        }
    }
}
