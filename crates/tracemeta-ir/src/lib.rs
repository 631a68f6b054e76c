//! tracemeta IR - Typed trace metadata object model
//!
//! Typed, reference-counted views over metadata objects owned by an
//! [`Engine`](tracemeta_core::Engine):
//!
//! ```text
//! TraceClass ──┬── StreamClass ──── EventClass ──── FieldClass (payload, context)
//!              │        └── default ClockClass
//!              └── Trace ──── Stream ──── Packet
//! ```
//!
//! Every entity comes in a mutable view (`ClockClass`) and a read-only view
//! (`ClockClassConst`). Setters, factories and user attribute mutation are
//! only available on mutable views. Engine failures surface as
//! [`MetaError`](tracemeta_core::MetaError) values.

mod object;

pub mod clock_class;
pub mod event_class;
pub mod field_class;
pub mod packet;
pub mod stream;
pub mod stream_class;
pub mod trace;
pub mod trace_class;
pub mod user_attributes;
pub mod value;

pub use clock_class::{ClockClass, ClockClassConst, ClockClassOffset};
pub use event_class::{EventClass, EventClassConst, EventClassParams, ValidatedEventClassParams};
pub use field_class::{FieldClass, FieldClassConst};
pub use object::{Const, Constness, Mutable, Shared};
pub use packet::{Packet, PacketConst};
pub use stream::{Stream, StreamConst};
pub use stream_class::{StreamClass, StreamClassConst};
pub use trace::{Trace, TraceConst};
pub use trace_class::{TraceClass, TraceClassConst};
pub use user_attributes::{WithUserAttributes, WithUserAttributesMut};
pub use value::{MapValue, MapValueConst};
