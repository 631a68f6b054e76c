//! Map values held by the engine

use tracemeta_core::{check_bool, check_int, check_str, handle_status, MetaResult, Value, ValueMap};

use crate::object::{entity, Constness, Mutable, Shared};

entity! {
    /// Engine-owned map value, such as the user attributes of an object
    MapValue, MapValueConst => Value
}

impl<C: Constness> MapValue<C> {
    /// Snapshot of the whole value
    pub fn to_value(&self) -> Value {
        self.engine().value_read(self.handle())
    }

    /// Snapshot of the map entries
    pub fn to_map(&self) -> ValueMap {
        match self.to_value() {
            Value::Map(map) => map,
            other => panic!("map value holds a {} value", other.kind().name()),
        }
    }

    pub fn len(&self) -> usize {
        self.to_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_map().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.to_map().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.to_map().into_keys().collect()
    }

    pub fn get_str(&self, key: &str) -> MetaResult<Option<String>> {
        self.get(key)
            .map(|value| check_str(&value).map(str::to_owned))
            .transpose()
    }

    pub fn get_bool(&self, key: &str) -> MetaResult<Option<bool>> {
        self.get(key).map(|value| check_bool(&value)).transpose()
    }

    pub fn get_int(&self, key: &str) -> MetaResult<Option<i128>> {
        self.get(key).map(|value| check_int(&value)).transpose()
    }

    pub fn is_frozen(&self) -> bool {
        self.engine().value_is_frozen(self.handle())
    }
}

impl MapValue<Mutable> {
    /// Create a map value holding `value`
    pub(crate) fn create(engine: &tracemeta_core::EngineRef, value: &Value) -> MetaResult<Self> {
        let shared = Shared::create(engine, engine.value_create(value), "map value")?;
        Ok(MapValue::from_shared(shared))
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> MetaResult<()> {
        let value = value.into();
        let status = self.engine().value_map_insert(self.handle(), key, &value);
        handle_status(status, Some("cannot insert entry into map value object"))
    }
}

impl<C: Constness> PartialEq<Value> for MapValue<C> {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}
