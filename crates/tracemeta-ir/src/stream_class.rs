//! Stream classes
//!
//! A stream class belongs to a trace class and owns event classes.
//! Creating an event class or a stream from a stream class freezes it.

use tracemeta_core::{check_int64, handle_status, MetaError, MetaResult};
use tracing::debug;

use crate::clock_class::ClockClass;
use crate::event_class::{EventClass, EventClassParams};
use crate::object::{ensure_same_engine, entity, Constness, Mutable, Shared};
use crate::stream::Stream;
use crate::trace::Trace;
use crate::trace_class::TraceClass;
use crate::user_attributes::{impl_user_attributes, WithUserAttributesMut};

entity! {
    /// Stream class
    StreamClass, StreamClassConst => StreamClass
}

impl_user_attributes!(StreamClass);

impl<C: Constness> StreamClass<C> {
    pub fn id(&self) -> u64 {
        self.engine().stream_class_get_id(self.handle())
    }

    pub fn name(&self) -> Option<String> {
        self.engine().stream_class_get_name(self.handle())
    }

    pub fn supports_packets(&self) -> bool {
        self.engine().stream_class_supports_packets(self.handle())
    }

    pub fn assigns_automatic_event_class_id(&self) -> bool {
        self.engine()
            .stream_class_assigns_automatic_event_class_id(self.handle())
    }

    pub fn assigns_automatic_stream_id(&self) -> bool {
        self.engine()
            .stream_class_assigns_automatic_stream_id(self.handle())
    }

    pub fn default_clock_class(&self) -> Option<ClockClass<C>> {
        self.engine()
            .stream_class_borrow_default_clock_class(self.handle())
            .map(|handle| ClockClass::borrowed(self.engine(), handle))
    }

    /// Trace class owning this stream class
    pub fn trace_class(&self) -> TraceClass<C> {
        match self.engine().stream_class_borrow_trace_class(self.handle()) {
            Some(handle) => TraceClass::borrowed(self.engine(), handle),
            None => panic!("stream class {} has no trace class", self.handle()),
        }
    }

    pub fn event_class_count(&self) -> u64 {
        self.engine().stream_class_event_class_count(self.handle())
    }

    pub fn event_class_by_index(&self, index: u64) -> Option<EventClass<C>> {
        self.engine()
            .stream_class_borrow_event_class_by_index(self.handle(), index)
            .map(|handle| EventClass::borrowed(self.engine(), handle))
    }

    pub fn event_class_by_id(&self, id: u64) -> Option<EventClass<C>> {
        self.engine()
            .stream_class_borrow_event_class_by_id(self.handle(), id)
            .map(|handle| EventClass::borrowed(self.engine(), handle))
    }
}

impl StreamClass<Mutable> {
    pub fn set_name(&mut self, name: &str) -> MetaResult<()> {
        let status = self.engine().stream_class_set_name(self.handle(), name);
        handle_status(status, Some("cannot set stream class object's name"))
    }

    pub fn set_supports_packets(&mut self, supports_packets: bool) -> MetaResult<()> {
        let status = self
            .engine()
            .stream_class_set_supports_packets(self.handle(), supports_packets);
        handle_status(
            status,
            Some("cannot set stream class object's packet support property"),
        )
    }

    pub fn set_assigns_automatic_event_class_id(&mut self, value: bool) -> MetaResult<()> {
        let status = self
            .engine()
            .stream_class_set_assigns_automatic_event_class_id(self.handle(), value);
        handle_status(
            status,
            Some("cannot set stream class object's automatic event class ID assignment property"),
        )
    }

    pub fn set_assigns_automatic_stream_id(&mut self, value: bool) -> MetaResult<()> {
        let status = self
            .engine()
            .stream_class_set_assigns_automatic_stream_id(self.handle(), value);
        handle_status(
            status,
            Some("cannot set stream class object's automatic stream ID assignment property"),
        )
    }

    /// Set the default clock class; the clock class becomes frozen
    pub fn set_default_clock_class<D: Constness>(
        &mut self,
        clock_class: &ClockClass<D>,
    ) -> MetaResult<()> {
        let context = "cannot set stream class object's default clock class";
        ensure_same_engine(self.engine(), clock_class, context)?;
        let status = self
            .engine()
            .stream_class_set_default_clock_class(self.handle(), clock_class.handle());
        handle_status(status, Some(context))
    }

    /// Create an event class from validated parameters
    ///
    /// Every parameter is checked before anything is created: an invalid
    /// parameter leaves the stream class untouched. An engine failure while
    /// applying the parameters leaves the new event class registered.
    pub fn create_event_class(&self, params: EventClassParams) -> MetaResult<EventClass> {
        let params = params.validate()?;
        let field_classes = [
            &params.specific_context_field_class,
            &params.payload_field_class,
        ];
        for field_class in field_classes.into_iter().flatten() {
            ensure_same_engine(self.engine(), field_class, "cannot create event class")?;
        }

        match (self.assigns_automatic_event_class_id(), params.id) {
            (true, Some(_)) => {
                return Err(MetaError::Precondition(
                    "cannot create event class: stream class assigns event class IDs automatically"
                        .to_string(),
                ))
            }
            (false, None) => {
                return Err(MetaError::Precondition(
                    "cannot create event class: stream class does not assign event class IDs automatically"
                        .to_string(),
                ))
            }
            _ => {}
        }

        let engine = self.engine();
        let result = engine.event_class_create(self.handle(), params.id);
        let shared = Shared::create(engine, result, "event class")?;
        let mut event_class = EventClass::from_shared(shared);
        debug!(handle = %event_class.handle(), id = ?params.id, "created event class");

        if let Some(name) = &params.name {
            event_class.set_name(name)?;
        }
        if let Some(user_attributes) = params.user_attributes {
            event_class.set_user_attributes(user_attributes)?;
        }
        if let Some(log_level) = params.log_level {
            event_class.set_log_level(log_level)?;
        }
        if let Some(emf_uri) = &params.emf_uri {
            event_class.set_emf_uri(emf_uri)?;
        }
        if let Some(field_class) = &params.specific_context_field_class {
            event_class.set_specific_context_field_class(field_class)?;
        }
        if let Some(field_class) = &params.payload_field_class {
            event_class.set_payload_field_class(field_class)?;
        }
        Ok(event_class)
    }

    /// Create a stream of this class in `trace`
    ///
    /// `trace` must be an instance of this stream class's trace class, and
    /// `id` must be given if and only if this stream class does not assign
    /// stream ids automatically. An explicit id must fit a signed 64-bit
    /// integer.
    pub fn create_stream<D: Constness>(
        &self,
        trace: &Trace<D>,
        id: Option<u64>,
    ) -> MetaResult<Stream> {
        if let Some(id) = id {
            check_int64(id)?;
        }
        if trace.cls() != self.trace_class() {
            return Err(MetaError::Precondition(
                "cannot create stream: trace and stream class belong to different trace classes"
                    .to_string(),
            ));
        }

        match (self.assigns_automatic_stream_id(), id) {
            (true, Some(_)) => {
                return Err(MetaError::Precondition(
                    "cannot create stream: stream class assigns stream IDs automatically"
                        .to_string(),
                ))
            }
            (false, None) => {
                return Err(MetaError::Precondition(
                    "cannot create stream: stream class does not assign stream IDs automatically"
                        .to_string(),
                ))
            }
            _ => {}
        }

        let engine = self.engine();
        let result = engine.stream_create(self.handle(), trace.handle(), id);
        let shared = Shared::create(engine, result, "stream")?;
        debug!(handle = %shared.handle(), ?id, "created stream");
        Ok(Stream::from_shared(shared))
    }
}
