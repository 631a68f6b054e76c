//! Trace classes
//!
//! The trace class is the root of a metadata hierarchy. It owns its stream
//! classes and is the factory of clock classes, field classes and traces.

use tracemeta_core::{
    check_int64, handle_status, EngineRef, FieldClassType, MetaError, MetaResult,
};
use tracing::debug;

use crate::clock_class::ClockClass;
use crate::field_class::FieldClass;
use crate::object::{entity, Constness, Mutable, Shared};
use crate::stream_class::StreamClass;
use crate::trace::Trace;
use crate::user_attributes::impl_user_attributes;

entity! {
    /// Trace class
    TraceClass, TraceClassConst => TraceClass
}

impl_user_attributes!(TraceClass);

impl<C: Constness> TraceClass<C> {
    pub fn assigns_automatic_stream_class_id(&self) -> bool {
        self.engine()
            .trace_class_assigns_automatic_stream_class_id(self.handle())
    }

    pub fn stream_class_count(&self) -> u64 {
        self.engine().trace_class_stream_class_count(self.handle())
    }

    pub fn stream_class_by_index(&self, index: u64) -> Option<StreamClass<C>> {
        self.engine()
            .trace_class_borrow_stream_class_by_index(self.handle(), index)
            .map(|handle| StreamClass::borrowed(self.engine(), handle))
    }

    pub fn stream_class_by_id(&self, id: u64) -> Option<StreamClass<C>> {
        self.engine()
            .trace_class_borrow_stream_class_by_id(self.handle(), id)
            .map(|handle| StreamClass::borrowed(self.engine(), handle))
    }

    /// All stream classes, in creation order
    pub fn stream_classes(&self) -> Vec<StreamClass<C>> {
        (0..self.stream_class_count())
            .filter_map(|index| self.stream_class_by_index(index))
            .collect()
    }
}

impl TraceClass<Mutable> {
    /// Create a new hierarchy root in `engine`
    pub fn new(engine: &EngineRef) -> MetaResult<Self> {
        let shared = Shared::create(engine, engine.trace_class_create(), "trace class")?;
        debug!(handle = %shared.handle(), "created trace class");
        Ok(TraceClass::from_shared(shared))
    }

    pub fn set_assigns_automatic_stream_class_id(&mut self, value: bool) -> MetaResult<()> {
        let status = self
            .engine()
            .trace_class_set_assigns_automatic_stream_class_id(self.handle(), value);
        handle_status(
            status,
            Some("cannot set trace class object's automatic stream class ID assignment property"),
        )
    }

    pub fn create_clock_class(&self) -> MetaResult<ClockClass> {
        let engine = self.engine();
        let shared = Shared::create(engine, engine.clock_class_create(), "clock class")?;
        debug!(handle = %shared.handle(), "created clock class");
        Ok(ClockClass::from_shared(shared))
    }

    pub fn create_field_class(&self, field_type: FieldClassType) -> MetaResult<FieldClass> {
        let engine = self.engine();
        let result = engine.field_class_create(self.handle(), field_type);
        let shared = Shared::create(engine, result, field_type.name())?;
        debug!(handle = %shared.handle(), %field_type, "created field class");
        Ok(FieldClass::from_shared(shared))
    }

    pub fn create_structure_field_class(&self) -> MetaResult<FieldClass> {
        self.create_field_class(FieldClassType::Structure)
    }

    /// Create a stream class
    ///
    /// `id` must be given if and only if this trace class does not assign
    /// stream class ids automatically, and must fit a signed 64-bit integer.
    pub fn create_stream_class(&self, id: Option<u64>) -> MetaResult<StreamClass> {
        if let Some(id) = id {
            check_int64(id)?;
        }
        match (self.assigns_automatic_stream_class_id(), id) {
            (true, Some(_)) => {
                return Err(MetaError::Precondition(
                    "cannot create stream class: trace class assigns stream class IDs automatically"
                        .to_string(),
                ))
            }
            (false, None) => {
                return Err(MetaError::Precondition(
                    "cannot create stream class: trace class does not assign stream class IDs automatically"
                        .to_string(),
                ))
            }
            _ => {}
        }

        let engine = self.engine();
        let result = engine.stream_class_create(self.handle(), id);
        let shared = Shared::create(engine, result, "stream class")?;
        debug!(handle = %shared.handle(), ?id, "created stream class");
        Ok(StreamClass::from_shared(shared))
    }

    /// Create a trace of this class; the trace class becomes frozen
    pub fn create_trace(&self) -> MetaResult<Trace> {
        let engine = self.engine();
        let shared = Shared::create(engine, engine.trace_create(self.handle()), "trace")?;
        debug!(handle = %shared.handle(), "created trace");
        Ok(Trace::from_shared(shared))
    }
}
