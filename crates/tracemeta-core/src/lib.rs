//! tracemeta Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every tracemeta crate:
//! - Object handles and kinds (RawHandle, ObjectKind)
//! - Metadata class enumerations (EventClassLogLevel, FieldClassType)
//! - Dynamic values used for user attributes
//! - The error taxonomy and the engine status chokepoint
//! - Validation utilities for dynamic caller input
//! - The `Engine` contract implemented by metadata engines

pub mod id;
pub mod class;
pub mod value;
pub mod error;
pub mod status;
pub mod validate;
pub mod engine;

pub use id::*;
pub use class::*;
pub use value::*;
pub use error::*;
pub use status::*;
pub use validate::*;
pub use engine::*;
