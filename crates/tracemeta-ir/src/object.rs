//! Shared engine objects
//!
//! A [`Shared`] owns one engine reference on a metadata object: cloning
//! takes another reference, dropping releases it. Every entity type of the
//! object model is a thin typed wrapper around a `Shared`, parameterized by
//! its [`Constness`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracemeta_core::{
    handle_status, EngineRef, EngineResult, MetaError, MetaResult, ObjectKind, RawHandle,
};

/// Owning reference on an engine object
pub struct Shared {
    engine: EngineRef,
    /// `None` only once released
    handle: Option<RawHandle>,
}

impl Shared {
    /// Take a new reference on a borrowed object
    pub fn new_with_ref(engine: &EngineRef, handle: RawHandle) -> Self {
        engine.get_ref(handle);
        Shared {
            engine: Arc::clone(engine),
            handle: Some(handle),
        }
    }

    /// Take a new reference on an object the engine handed out as a `kind`
    ///
    /// # Panics
    ///
    /// If the engine's handle is not a live object of that kind.
    pub(crate) fn borrow_kind(engine: &EngineRef, handle: RawHandle, kind: ObjectKind) -> Self {
        match engine.object_kind(handle) {
            Some(actual) if actual == kind => Shared::new_with_ref(engine, handle),
            Some(actual) => panic!(
                "engine returned {handle} as a {kind} object, but it is a {actual} object"
            ),
            None => panic!("engine returned {handle} as a {kind} object, but it is not live"),
        }
    }

    /// Adopt a reference the caller already owns
    pub fn from_owned(engine: &EngineRef, handle: RawHandle) -> Self {
        Shared {
            engine: Arc::clone(engine),
            handle: Some(handle),
        }
    }

    /// Adopt the result of an engine factory, mapping its failure status
    pub fn create(engine: &EngineRef, result: EngineResult<RawHandle>, what: &str) -> MetaResult<Self> {
        let handle = engine_result(result, &format!("cannot create {} object", what))?;
        Ok(Shared::from_owned(engine, handle))
    }

    #[inline]
    pub fn engine(&self) -> &EngineRef {
        &self.engine
    }

    #[inline]
    pub fn handle(&self) -> RawHandle {
        match self.handle {
            Some(handle) => handle,
            None => unreachable!("shared object used after release"),
        }
    }
}

impl Clone for Shared {
    fn clone(&self) -> Self {
        Shared::new_with_ref(&self.engine, self.handle())
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.put_ref(handle);
        }
    }
}

impl PartialEq for Shared {
    fn eq(&self, other: &Self) -> bool {
        same_engine(&self.engine, &other.engine) && self.handle == other.handle
    }
}

impl Eq for Shared {}

impl Hash for Shared {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle {
            Some(handle) => write!(f, "Shared({:?})", handle),
            None => f.write_str("Shared(released)"),
        }
    }
}

pub(crate) fn same_engine(a: &EngineRef, b: &EngineRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Fail with a precondition error unless `object` lives in `engine`
pub(crate) fn ensure_same_engine(
    engine: &EngineRef,
    object: &impl sealed::Object,
    context: &str,
) -> MetaResult<()> {
    if same_engine(engine, object.shared().engine()) {
        return Ok(());
    }
    Err(MetaError::Precondition(format!(
        "{}: objects belong to different engines",
        context
    )))
}

/// Map a failed engine result through the status chokepoint
pub(crate) fn engine_result<T>(result: EngineResult<T>, context: &str) -> MetaResult<T> {
    result.or_else(|status| {
        handle_status(status, Some(context))?;
        Err(MetaError::Engine(format!(
            "{}: engine reported success without a result",
            context
        )))
    })
}

pub(crate) mod sealed {
    pub trait Sealed {}

    /// Access to the shared object behind an entity
    pub trait Object {
        fn shared(&self) -> &super::Shared;
    }
}

/// Constness of an entity view
///
/// [`Mutable`] views expose setters and factories, [`Const`] views only
/// getters. Getters return related entities with the same constness.
pub trait Constness: sealed::Sealed + Send + Sync + 'static {
    const IS_CONST: bool;
}

/// Marker of mutable entity views
#[derive(Debug)]
pub enum Mutable {}

/// Marker of read-only entity views
#[derive(Debug)]
pub enum Const {}

impl sealed::Sealed for Mutable {}
impl sealed::Sealed for Const {}

impl Constness for Mutable {
    const IS_CONST: bool = false;
}

impl Constness for Const {
    const IS_CONST: bool = true;
}

/// Declare a typed entity wrapper with its const alias
macro_rules! entity {
    ($(#[$meta:meta])* $name:ident, $const_name:ident => $kind:ident) => {
        $(#[$meta])*
        pub struct $name<C: $crate::object::Constness = $crate::object::Mutable> {
            shared: $crate::object::Shared,
            _constness: ::std::marker::PhantomData<C>,
        }

        #[doc = concat!("Read-only [`", stringify!($name), "`]")]
        pub type $const_name = $name<$crate::object::Const>;

        impl<C: $crate::object::Constness> $name<C> {
            pub(crate) fn from_shared(shared: $crate::object::Shared) -> Self {
                $name {
                    shared,
                    _constness: ::std::marker::PhantomData,
                }
            }

            /// Wrap a borrowed handle, taking a reference
            pub(crate) fn borrowed(
                engine: &::tracemeta_core::EngineRef,
                handle: ::tracemeta_core::RawHandle,
            ) -> Self {
                Self::from_shared($crate::object::Shared::borrow_kind(
                    engine,
                    handle,
                    ::tracemeta_core::ObjectKind::$kind,
                ))
            }

            /// Read-only view of the same object
            pub fn as_const(&self) -> $name<$crate::object::Const> {
                $name::from_shared(self.shared.clone())
            }

            #[inline]
            pub(crate) fn engine(&self) -> &::tracemeta_core::EngineRef {
                self.shared.engine()
            }

            #[inline]
            pub(crate) fn handle(&self) -> ::tracemeta_core::RawHandle {
                self.shared.handle()
            }
        }

        impl From<$name<$crate::object::Mutable>> for $name<$crate::object::Const> {
            fn from(entity: $name<$crate::object::Mutable>) -> Self {
                $name::from_shared(entity.shared)
            }
        }

        impl<C: $crate::object::Constness> $crate::object::sealed::Object for $name<C> {
            fn shared(&self) -> &$crate::object::Shared {
                &self.shared
            }
        }

        impl<C: $crate::object::Constness> Clone for $name<C> {
            fn clone(&self) -> Self {
                Self::from_shared(self.shared.clone())
            }
        }

        impl<C: $crate::object::Constness, D: $crate::object::Constness> PartialEq<$name<D>>
            for $name<C>
        {
            fn eq(&self, other: &$name<D>) -> bool {
                self.shared == other.shared
            }
        }

        impl<C: $crate::object::Constness> Eq for $name<C> {}

        impl<C: $crate::object::Constness> ::std::hash::Hash for $name<C> {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                self.shared.hash(state);
            }
        }

        impl<C: $crate::object::Constness> ::std::fmt::Debug for $name<C> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(
                    f,
                    "{}{}({})",
                    if C::IS_CONST { "Const" } else { "" },
                    stringify!($name),
                    self.shared.handle()
                )
            }
        }
    };
}

pub(crate) use entity;
