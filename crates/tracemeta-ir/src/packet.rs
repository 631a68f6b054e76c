//! Packets

use crate::object::{entity, Constness};
use crate::stream::Stream;

entity! {
    /// Packet of a stream
    Packet, PacketConst => Packet
}

impl<C: Constness> Packet<C> {
    /// Stream this packet belongs to
    pub fn stream(&self) -> Stream<C> {
        match self.engine().packet_borrow_stream(self.handle()) {
            Some(handle) => Stream::borrowed(self.engine(), handle),
            None => panic!("packet {} has no stream", self.handle()),
        }
    }
}
