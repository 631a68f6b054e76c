//! tracemeta Engine - In-process metadata engine
//!
//! [`MemoryEngine`] implements the [`Engine`](tracemeta_core::Engine)
//! contract with an arena of reference-counted objects:
//! - Parented objects (stream classes, event classes, streams) keep their
//!   parent alive while referenced and die with it
//! - Objects freeze once they are part of a used hierarchy
//! - Every object with user attributes owns a map value
//! - Rejected operations report a status and keep the cause as last error

pub mod clock;
pub mod config;
pub mod error;
pub mod memory;
pub mod stats;

mod arena;
mod object;

pub use clock::{cycles_to_ns, ns_from_origin, NS_PER_S};
pub use config::EngineConfig;
pub use error::{EngineError, EngineOpResult};
pub use memory::MemoryEngine;
pub use stats::EngineStats;
