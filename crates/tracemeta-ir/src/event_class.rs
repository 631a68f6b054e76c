//! Event classes
//!
//! Event classes are created by a stream class from [`EventClassParams`].
//! The parameters carry loosely typed caller input and are validated as a
//! whole before the event class exists.

use tracemeta_core::{
    check_int64, check_log_level, check_map, handle_status, id_from_sentinel, EventClassLogLevel,
    MetaResult, PropertyAvailability, RawHandle, Value,
};

use crate::field_class::FieldClass;
use crate::object::{ensure_same_engine, entity, Constness, Mutable};
use crate::stream_class::StreamClass;
use crate::user_attributes::impl_user_attributes;

entity! {
    /// Event class
    EventClass, EventClassConst => EventClass
}

impl_user_attributes!(EventClass);

/// Parameters of a new event class
#[derive(Clone, Debug, Default)]
pub struct EventClassParams {
    /// Explicit id, for stream classes not assigning ids automatically;
    /// must fit a signed 64-bit integer
    pub id: Option<u64>,
    pub name: Option<String>,
    /// Must convert to a map
    pub user_attributes: Option<Value>,
    /// Raw log level, must be the value of an [`EventClassLogLevel`]
    pub log_level: Option<i64>,
    pub emf_uri: Option<String>,
    /// Must be a structure field class
    pub specific_context_field_class: Option<FieldClass>,
    /// Must be a structure field class
    pub payload_field_class: Option<FieldClass>,
}

/// Event class parameters that passed validation
///
/// Only [`EventClassParams::validate`] builds one.
#[derive(Clone, Debug)]
pub struct ValidatedEventClassParams {
    pub(crate) id: Option<u64>,
    pub(crate) name: Option<String>,
    pub(crate) user_attributes: Option<Value>,
    pub(crate) log_level: Option<EventClassLogLevel>,
    pub(crate) emf_uri: Option<String>,
    pub(crate) specific_context_field_class: Option<FieldClass>,
    pub(crate) payload_field_class: Option<FieldClass>,
}

impl ValidatedEventClassParams {
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn user_attributes(&self) -> Option<&Value> {
        self.user_attributes.as_ref()
    }

    pub fn log_level(&self) -> Option<EventClassLogLevel> {
        self.log_level
    }

    pub fn emf_uri(&self) -> Option<&str> {
        self.emf_uri.as_deref()
    }

    pub fn specific_context_field_class(&self) -> Option<&FieldClass> {
        self.specific_context_field_class.as_ref()
    }

    pub fn payload_field_class(&self) -> Option<&FieldClass> {
        self.payload_field_class.as_ref()
    }
}

impl EventClassParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_user_attributes(mut self, user_attributes: impl Into<Value>) -> Self {
        self.user_attributes = Some(user_attributes.into());
        self
    }

    pub fn with_log_level(mut self, log_level: impl Into<i64>) -> Self {
        self.log_level = Some(log_level.into());
        self
    }

    pub fn with_emf_uri(mut self, emf_uri: impl Into<String>) -> Self {
        self.emf_uri = Some(emf_uri.into());
        self
    }

    pub fn with_specific_context_field_class(mut self, field_class: FieldClass) -> Self {
        self.specific_context_field_class = Some(field_class);
        self
    }

    pub fn with_payload_field_class(mut self, field_class: FieldClass) -> Self {
        self.payload_field_class = Some(field_class);
        self
    }

    /// Check every parameter, failing on the first invalid one
    pub fn validate(self) -> MetaResult<ValidatedEventClassParams> {
        if let Some(id) = self.id {
            check_int64(id)?;
        }
        if let Some(user_attributes) = &self.user_attributes {
            check_map(user_attributes)?;
        }
        let log_level = self.log_level.map(check_log_level).transpose()?;
        if let Some(field_class) = &self.specific_context_field_class {
            field_class.ensure_structure()?;
        }
        if let Some(field_class) = &self.payload_field_class {
            field_class.ensure_structure()?;
        }

        Ok(ValidatedEventClassParams {
            id: self.id,
            name: self.name,
            user_attributes: self.user_attributes,
            log_level,
            emf_uri: self.emf_uri,
            specific_context_field_class: self.specific_context_field_class,
            payload_field_class: self.payload_field_class,
        })
    }
}

impl<C: Constness> EventClass<C> {
    /// Id, `None` if the engine cannot represent it
    pub fn id(&self) -> Option<u64> {
        id_from_sentinel(self.engine().event_class_get_id(self.handle()))
    }

    pub fn name(&self) -> Option<String> {
        self.engine().event_class_get_name(self.handle())
    }

    /// Log level, `None` if not set
    ///
    /// # Panics
    ///
    /// If the engine reports a log level outside [`EventClassLogLevel`].
    pub fn log_level(&self) -> Option<EventClassLogLevel> {
        let (availability, raw) = self.engine().event_class_get_log_level(self.handle());
        decode_log_level(self.handle(), availability, raw)
    }

    pub fn emf_uri(&self) -> Option<String> {
        self.engine().event_class_get_emf_uri(self.handle())
    }

    pub fn specific_context_field_class(&self) -> Option<FieldClass<C>> {
        self.engine()
            .event_class_borrow_specific_context_field_class(self.handle())
            .map(|handle| FieldClass::borrowed(self.engine(), handle))
    }

    pub fn payload_field_class(&self) -> Option<FieldClass<C>> {
        self.engine()
            .event_class_borrow_payload_field_class(self.handle())
            .map(|handle| FieldClass::borrowed(self.engine(), handle))
    }

    /// Stream class this event class belongs to
    pub fn stream_class(&self) -> Option<StreamClass<C>> {
        self.engine()
            .event_class_borrow_stream_class(self.handle())
            .map(|handle| StreamClass::borrowed(self.engine(), handle))
    }
}

fn decode_log_level(
    handle: RawHandle,
    availability: PropertyAvailability,
    raw: u64,
) -> Option<EventClassLogLevel> {
    availability
        .into_option(raw)
        .map(|raw| match EventClassLogLevel::from_raw(raw) {
            Some(log_level) => log_level,
            None => panic!("event class {handle} has invalid log level {raw}"),
        })
}

impl EventClass<Mutable> {
    pub fn set_name(&mut self, name: &str) -> MetaResult<()> {
        let status = self.engine().event_class_set_name(self.handle(), name);
        handle_status(status, Some("cannot set event class object's name"))
    }

    pub fn set_log_level(&mut self, log_level: EventClassLogLevel) -> MetaResult<()> {
        let status = self
            .engine()
            .event_class_set_log_level(self.handle(), log_level.as_raw());
        handle_status(status, Some("cannot set event class object's log level"))
    }

    pub fn set_emf_uri(&mut self, emf_uri: &str) -> MetaResult<()> {
        let status = self.engine().event_class_set_emf_uri(self.handle(), emf_uri);
        handle_status(status, Some("cannot set event class object's EMF URI"))
    }

    /// Set the specific context field class, which must be a structure and
    /// becomes frozen
    pub fn set_specific_context_field_class<D: Constness>(
        &mut self,
        field_class: &FieldClass<D>,
    ) -> MetaResult<()> {
        let context = "cannot set event class object's specific context field class";
        ensure_same_engine(self.engine(), field_class, context)?;
        field_class.ensure_structure()?;
        let status = self
            .engine()
            .event_class_set_specific_context_field_class(self.handle(), field_class.handle());
        handle_status(status, Some(context))
    }

    /// Set the payload field class, which must be a structure and becomes
    /// frozen
    pub fn set_payload_field_class<D: Constness>(
        &mut self,
        field_class: &FieldClass<D>,
    ) -> MetaResult<()> {
        let context = "cannot set event class object's payload field class";
        ensure_same_engine(self.engine(), field_class, context)?;
        field_class.ensure_structure()?;
        let status = self
            .engine()
            .event_class_set_payload_field_class(self.handle(), field_class.handle());
        handle_status(status, Some(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracemeta_core::{EngineRef, FieldClassType, MetaError};
    use tracemeta_engine::MemoryEngine;

    use crate::trace_class::TraceClass;
    use crate::user_attributes::WithUserAttributes;

    fn stream_class() -> (TraceClass, StreamClass) {
        let engine: EngineRef = Arc::new(MemoryEngine::new());
        let tc = TraceClass::new(&engine).unwrap();
        let sc = tc.create_stream_class(None).unwrap();
        (tc, sc)
    }

    #[test]
    fn test_validate_log_level() {
        let validated = EventClassParams::new()
            .with_log_level(EventClassLogLevel::Warning.as_raw() as i64)
            .validate()
            .unwrap();
        assert_eq!(validated.log_level(), Some(EventClassLogLevel::Warning));

        let err = EventClassParams::new()
            .with_log_level(999)
            .validate()
            .unwrap_err();
        assert_eq!(err, MetaError::Range("'999' is not a valid log level".to_string()));
        assert!(EventClassParams::new().with_log_level(-1).validate().is_err());
    }

    #[test]
    fn test_validate_user_attributes() {
        let err = EventClassParams::new()
            .with_user_attributes("not a map")
            .validate()
            .unwrap_err();
        assert_eq!(err, MetaError::type_mismatch("map", "str"));
    }

    #[test]
    fn test_validate_field_classes() {
        let (tc, _sc) = stream_class();
        let string = tc.create_field_class(FieldClassType::String).unwrap();
        let err = EventClassParams::new()
            .with_payload_field_class(string)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            MetaError::type_mismatch("structure field class", "string field class")
        );
    }

    #[test]
    fn test_invalid_params_create_nothing() {
        let (_tc, sc) = stream_class();
        let result = sc.create_event_class(
            EventClassParams::new()
                .with_name("irq_handler_entry")
                .with_log_level(999),
        );
        assert!(matches!(result, Err(MetaError::Range(_))));
        assert_eq!(sc.event_class_count(), 0);
    }

    #[test]
    fn test_create_with_params() {
        let (tc, sc) = stream_class();
        let context = tc.create_structure_field_class().unwrap();
        let payload = tc.create_structure_field_class().unwrap();
        let ec = sc
            .create_event_class(
                EventClassParams::new()
                    .with_name("sched_switch")
                    .with_user_attributes([("lttng", true)])
                    .with_log_level(13)
                    .with_emf_uri("https://example.com/sched")
                    .with_specific_context_field_class(context.clone())
                    .with_payload_field_class(payload.clone()),
            )
            .unwrap();

        assert_eq!(ec.id(), Some(0));
        assert_eq!(ec.name().as_deref(), Some("sched_switch"));
        assert_eq!(ec.log_level(), Some(EventClassLogLevel::DebugLine));
        assert_eq!(ec.emf_uri().as_deref(), Some("https://example.com/sched"));
        assert_eq!(ec.specific_context_field_class(), Some(context));
        assert_eq!(ec.payload_field_class(), Some(payload));
        assert!(ec.user_attributes() == Value::from([("lttng", true)]));
    }

    #[test]
    fn test_unset_properties() {
        let (_tc, sc) = stream_class();
        let ec = sc.create_event_class(EventClassParams::new()).unwrap();
        let view = ec.as_const();
        assert_eq!(view.name(), None);
        assert_eq!(view.log_level(), None);
        assert_eq!(view.emf_uri(), None);
        assert_eq!(view.specific_context_field_class(), None);
        assert_eq!(view.payload_field_class(), None);
        assert_eq!(view.stream_class(), Some(sc.as_const()));
    }

    #[test]
    fn test_attached_field_class_is_frozen() {
        let (tc, sc) = stream_class();
        let mut payload = tc.create_structure_field_class().unwrap();
        let mut ec = sc.create_event_class(EventClassParams::new()).unwrap();
        ec.set_payload_field_class(&payload).unwrap();
        assert!(matches!(
            payload.set_minimum_alignment(8),
            Err(MetaError::Engine(_))
        ));
    }

    #[test]
    fn test_validate_id_range() {
        let largest = i64::MAX as u64;
        let validated = EventClassParams::new().with_id(largest).validate().unwrap();
        assert_eq!(validated.id(), Some(largest));

        assert!(matches!(
            EventClassParams::new().with_id(largest + 1).validate(),
            Err(MetaError::Range(_))
        ));
    }

    #[test]
    fn test_decode_log_level() {
        let handle = RawHandle::new(1).unwrap();
        assert_eq!(
            decode_log_level(handle, PropertyAvailability::Available, 4),
            Some(EventClassLogLevel::Warning)
        );
        assert_eq!(
            decode_log_level(handle, PropertyAvailability::NotAvailable, 999),
            None
        );
    }

    #[test]
    #[should_panic(expected = "has invalid log level 999")]
    fn test_decode_log_level_out_of_range() {
        let handle = RawHandle::new(1).unwrap();
        decode_log_level(handle, PropertyAvailability::Available, 999);
    }

    #[test]
    fn test_field_class_from_other_engine() {
        let (_tc, sc) = stream_class();
        let (other_tc, _other_sc) = stream_class();
        let foreign = other_tc.create_structure_field_class().unwrap();
        let mut ec = sc.create_event_class(EventClassParams::new()).unwrap();

        assert_eq!(
            ec.set_payload_field_class(&foreign),
            Err(MetaError::Precondition(
                "cannot set event class object's payload field class: objects belong to different engines"
                    .to_string()
            ))
        );
        assert!(matches!(
            ec.set_specific_context_field_class(&foreign),
            Err(MetaError::Precondition(_))
        ));
        assert_eq!(ec.payload_field_class(), None);
        assert_eq!(ec.specific_context_field_class(), None);
    }

    #[test]
    fn test_create_with_field_class_from_other_engine() {
        let (_tc, sc) = stream_class();
        let (other_tc, _other_sc) = stream_class();
        let foreign = other_tc.create_structure_field_class().unwrap();
        let result = sc.create_event_class(
            EventClassParams::new()
                .with_name("sched_wakeup")
                .with_payload_field_class(foreign),
        );
        assert!(matches!(result, Err(MetaError::Precondition(_))));
        assert_eq!(sc.event_class_count(), 0);
    }
}
