//! User attributes capability
//!
//! Every clock class, field class, trace class, trace, stream class, event
//! class and stream carries a map of user attributes. Reading is available
//! on every view; writing only on mutable views:
//!
//! ```
//! use std::sync::Arc;
//! use tracemeta_core::{EngineRef, Value};
//! use tracemeta_engine::MemoryEngine;
//! use tracemeta_ir::{TraceClass, WithUserAttributes, WithUserAttributesMut};
//!
//! let engine: EngineRef = Arc::new(MemoryEngine::new());
//! let mut clock_class = TraceClass::new(&engine)?.create_clock_class()?;
//! clock_class.set_user_attributes([("source", "tsc")])?;
//! assert!(clock_class.user_attributes() == Value::from([("source", "tsc")]));
//! # Ok::<(), tracemeta_core::MetaError>(())
//! ```
//!
//! A read-only view has no way to reach the setter:
//!
//! ```compile_fail
//! use tracemeta_ir::{ClockClassConst, WithUserAttributesMut};
//!
//! fn relabel(clock_class: &mut ClockClassConst) {
//!     clock_class.set_user_attributes([("source", "tsc")]).unwrap();
//! }
//! ```

use tracemeta_core::{check_map, handle_status, MetaResult, Value};
use tracing::trace;

use crate::object::sealed::{self, Object as _};
use crate::value::{MapValue, MapValueConst};

/// Read access to user attributes
pub trait WithUserAttributes: sealed::Object {
    /// Read-only view of the user attributes map
    fn user_attributes(&self) -> MapValueConst {
        let shared = self.shared();
        let map = shared.engine().borrow_user_attributes(shared.handle());
        MapValueConst::borrowed(shared.engine(), map)
    }
}

/// Write access to user attributes, only implemented by mutable views
pub trait WithUserAttributesMut: WithUserAttributes {
    /// Replace the user attributes; `attributes` must convert to a map
    fn set_user_attributes(&mut self, attributes: impl Into<Value>) -> MetaResult<()> {
        let attributes = attributes.into();
        check_map(&attributes)?;

        let shared = self.shared();
        let map = MapValue::create(shared.engine(), &attributes)?;
        trace!(owner = %shared.handle(), "setting user attributes");
        let status = shared
            .engine()
            .set_user_attributes(shared.handle(), map.handle());
        handle_status(status, Some("cannot set user attributes"))
    }

    /// Mutable view of the current user attributes map
    fn user_attributes_mut(&mut self) -> MapValue {
        let shared = self.shared();
        let map = shared.engine().borrow_user_attributes(shared.handle());
        MapValue::borrowed(shared.engine(), map)
    }
}

/// Implement the user attributes capability for entity types
macro_rules! impl_user_attributes {
    ($($name:ident),* $(,)?) => {
        $(
            impl<C: $crate::object::Constness> $crate::user_attributes::WithUserAttributes
                for $name<C>
            {
            }

            impl $crate::user_attributes::WithUserAttributesMut
                for $name<$crate::object::Mutable>
            {
            }
        )*
    };
}

pub(crate) use impl_user_attributes;
