//! Streams

use tracemeta_core::{handle_status, id_from_sentinel, MetaError, MetaResult};
use tracing::debug;

use crate::object::{entity, Constness, Mutable, Shared};
use crate::packet::Packet;
use crate::stream_class::StreamClass;
use crate::trace::Trace;
use crate::user_attributes::impl_user_attributes;

entity! {
    /// Stream: an instance of a stream class within a trace
    Stream, StreamConst => Stream
}

impl_user_attributes!(Stream);

impl<C: Constness> Stream<C> {
    /// Id, `None` if the engine cannot represent it
    pub fn id(&self) -> Option<u64> {
        id_from_sentinel(self.engine().stream_get_id(self.handle()))
    }

    pub fn name(&self) -> Option<String> {
        self.engine().stream_get_name(self.handle())
    }

    /// Class of this stream
    pub fn cls(&self) -> StreamClass<C> {
        match self.engine().stream_borrow_class(self.handle()) {
            Some(handle) => StreamClass::borrowed(self.engine(), handle),
            None => panic!("stream {} has no stream class", self.handle()),
        }
    }

    /// Trace this stream belongs to
    pub fn trace(&self) -> Trace<C> {
        match self.engine().stream_borrow_trace(self.handle()) {
            Some(handle) => Trace::borrowed(self.engine(), handle),
            None => panic!("stream {} has no trace", self.handle()),
        }
    }
}

impl Stream<Mutable> {
    pub fn set_name(&mut self, name: &str) -> MetaResult<()> {
        let status = self.engine().stream_set_name(self.handle(), name);
        handle_status(status, Some("cannot set stream object's name"))
    }

    /// Create a packet; the stream class must support packets
    pub fn create_packet(&self) -> MetaResult<Packet> {
        if !self.cls().supports_packets() {
            return Err(MetaError::Precondition(
                "cannot create packet: stream class does not support packets".to_string(),
            ));
        }

        match self.engine().packet_create(self.handle()) {
            Some(handle) => {
                debug!(%handle, stream = %self.handle(), "created packet");
                Ok(Packet::from_shared(Shared::from_owned(self.engine(), handle)))
            }
            None => Err(MetaError::OutOfMemory(
                "cannot create packet object".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracemeta_core::EngineRef;
    use tracemeta_engine::{EngineConfig, MemoryEngine};

    use crate::trace_class::TraceClass;

    #[test]
    fn test_navigation() {
        let engine: EngineRef = Arc::new(MemoryEngine::new());
        let tc = TraceClass::new(&engine).unwrap();
        let sc = tc.create_stream_class(None).unwrap();
        let trace = tc.create_trace().unwrap();
        let mut stream = sc.create_stream(&trace, None).unwrap();

        assert_eq!(stream.id(), Some(0));
        assert_eq!(stream.cls(), sc);
        assert_eq!(stream.trace(), trace);
        stream.set_name("cpu0").unwrap();
        assert_eq!(stream.as_const().name().as_deref(), Some("cpu0"));
    }

    #[test]
    fn test_packet_not_supported() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: EngineRef = memory.clone();
        let tc = TraceClass::new(&engine).unwrap();
        let sc = tc.create_stream_class(None).unwrap();
        let trace = tc.create_trace().unwrap();
        let stream = sc.create_stream(&trace, None).unwrap();

        assert_eq!(
            stream.create_packet().unwrap_err(),
            MetaError::Precondition(
                "cannot create packet: stream class does not support packets".to_string()
            )
        );
        assert_eq!(memory.stats().calls_to("packet_create"), 0);
    }

    #[test]
    fn test_packet_out_of_memory() {
        // Trace class, stream class, trace and stream, each with attributes
        let memory = Arc::new(MemoryEngine::with_config(EngineConfig::with_max_objects(8)));
        let engine: EngineRef = memory.clone();
        let tc = TraceClass::new(&engine).unwrap();
        let mut sc = tc.create_stream_class(None).unwrap();
        sc.set_supports_packets(true).unwrap();
        let trace = tc.create_trace().unwrap();
        let stream = sc.create_stream(&trace, None).unwrap();

        assert_eq!(
            stream.create_packet().unwrap_err(),
            MetaError::OutOfMemory("cannot create packet object".to_string())
        );
    }
}
