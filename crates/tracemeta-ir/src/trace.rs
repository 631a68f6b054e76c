//! Traces

use tracemeta_core::{handle_status, MetaResult};
use uuid::Uuid;

use crate::object::{entity, Constness, Mutable};
use crate::stream::Stream;
use crate::trace_class::TraceClass;
use crate::user_attributes::impl_user_attributes;

entity! {
    /// Trace: an instance of a trace class, owning its streams
    Trace, TraceConst => Trace
}

impl_user_attributes!(Trace);

impl<C: Constness> Trace<C> {
    pub fn name(&self) -> Option<String> {
        self.engine().trace_get_name(self.handle())
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.engine()
            .trace_get_uuid(self.handle())
            .map(Uuid::from_bytes)
    }

    /// Class of this trace
    pub fn cls(&self) -> TraceClass<C> {
        match self.engine().trace_borrow_class(self.handle()) {
            Some(handle) => TraceClass::borrowed(self.engine(), handle),
            None => panic!("trace {} has no trace class", self.handle()),
        }
    }

    pub fn stream_count(&self) -> u64 {
        self.engine().trace_stream_count(self.handle())
    }

    pub fn stream_by_id(&self, id: u64) -> Option<Stream<C>> {
        self.engine()
            .trace_borrow_stream_by_id(self.handle(), id)
            .map(|handle| Stream::borrowed(self.engine(), handle))
    }
}

impl Trace<Mutable> {
    pub fn set_name(&mut self, name: &str) -> MetaResult<()> {
        let status = self.engine().trace_set_name(self.handle(), name);
        handle_status(status, Some("cannot set trace object's name"))
    }

    pub fn set_uuid(&mut self, uuid: Uuid) -> MetaResult<()> {
        let status = self
            .engine()
            .trace_set_uuid(self.handle(), uuid.into_bytes());
        handle_status(status, Some("cannot set trace object's UUID"))
    }
}
