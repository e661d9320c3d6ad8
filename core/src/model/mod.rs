//! Sparse entity records.
//!
//! # Design
//! `Model<K>` is a partial record keyed by one entity's field keys. Typed
//! entities (`Customer`, `Company`, `Item`) wrap it and add accessors.
//! Two ways produce a map for transmission:
//! - object-derived (`Model::to_field_map`): a field is sent only when its
//!   accessor would return a value and it is writable, so the server leaves
//!   everything else untouched;
//! - caller-supplied (`to_wire_map` on a `FieldMap`): every entry is kept,
//!   so an explicit null clears the field server-side.
//!
//! Two records are equal iff their underlying field maps are equal.

mod company;
mod customer;
mod item;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::WireMap;
use crate::schema::{FieldKey, FieldMap};

pub use company::{Company, CompanyField};
pub use customer::{Customer, CustomerField};
pub use item::{Item, ItemField};

/// A typed record backed by a `Model`.
pub trait Entity: Sized {
    type Key: FieldKey;

    fn from_model(model: Model<Self::Key>) -> Self;
}

/// Translate a caller-supplied map to wire names, keeping explicit nulls.
pub fn to_wire_map<K: FieldKey>(fields: &FieldMap<K>) -> WireMap {
    fields
        .iter()
        .map(|(k, v)| (k.wire_name().to_string(), v.clone()))
        .collect()
}

/// Translate a wire map to field keys. Unknown wire names are ignored.
pub fn from_wire_map<K: FieldKey>(wire: WireMap) -> FieldMap<K> {
    wire.into_iter()
        .filter_map(|(name, value)| K::from_wire_name(&name).map(|k| (k, value)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model<K: FieldKey> {
    fields: FieldMap<K>,
}

impl<K: FieldKey> Default for Model<K> {
    fn default() -> Self {
        Self {
            fields: FieldMap::new(),
        }
    }
}

impl<K: FieldKey> Model<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: FieldMap<K>) -> Self {
        Self { fields }
    }

    pub fn from_wire_map(wire: WireMap) -> Self {
        Self::from_fields(from_wire_map(wire))
    }

    pub fn fields(&self) -> &FieldMap<K> {
        &self.fields
    }

    pub fn into_fields(self) -> FieldMap<K> {
        self.fields
    }

    /// Present, non-null value of `key`.
    pub fn get(&self, key: K) -> Option<&Value> {
        self.fields.get(&key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: K) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: K) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: K) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Set `key`, or remove it when `value` is `None` or has no JSON
    /// representation (a NaN float converts to null).
    pub fn set<V: Into<Value>>(&mut self, key: K, value: Option<V>) {
        match value.map(Into::<Value>::into) {
            Some(v) if !v.is_null() => {
                self.fields.insert(key, v);
            }
            _ => {
                self.fields.remove(&key);
            }
        }
    }

    /// Object-derived map: writable fields whose accessor yields a value.
    pub fn to_field_map(&self) -> FieldMap<K> {
        self.fields
            .iter()
            .filter(|(k, v)| {
                let spec = k.spec();
                !spec.read_only && spec.kind.is_readable(v)
            })
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }

    /// Every stored field under its wire name, nulls and read-only included.
    pub fn to_wire_map(&self) -> WireMap {
        to_wire_map(&self.fields)
    }
}

impl<K: FieldKey> Serialize for Model<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire_map().serialize(serializer)
    }
}

impl<'de, K: FieldKey> Deserialize<'de> for Model<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        WireMap::deserialize(deserializer).map(Self::from_wire_map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn wire(value: Value) -> WireMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn from_wire_ignores_unknown_keys() {
        let model: Model<ItemField> =
            Model::from_wire_map(wire(json!({"name": "Bolt", "colour": "red"})));
        assert_eq!(model.fields().len(), 1);
        assert_eq!(model.get_str(ItemField::Name), Some("Bolt"));
    }

    #[test]
    fn missing_optional_keys_stay_absent() {
        let model: Model<ItemField> = Model::from_wire_map(wire(json!({"name": "Bolt"})));
        assert!(!model.fields().contains_key(&ItemField::Price));
        assert_eq!(model.get_f64(ItemField::Price), None);
    }

    #[test]
    fn caller_map_round_trips_with_nulls() {
        let fields = FieldMap::from([
            (ItemField::Name, json!("Bolt")),
            (ItemField::Description, Value::Null),
            (ItemField::Price, json!(1.5)),
        ]);
        let back: FieldMap<ItemField> = from_wire_map(to_wire_map(&fields));
        assert_eq!(back, fields);
    }

    #[test]
    fn object_derived_map_skips_nulls() {
        let model: Model<ItemField> =
            Model::from_wire_map(wire(json!({"name": "Bolt", "description": null})));
        let derived = model.to_field_map();
        assert!(!derived.contains_key(&ItemField::Description));
        assert!(model.fields().contains_key(&ItemField::Description));
    }

    #[test]
    fn set_none_removes_the_key() {
        let mut model: Model<ItemField> = Model::new();
        model.set(ItemField::Vat, Some(23.0));
        assert_eq!(model.get_f64(ItemField::Vat), Some(23.0));
        model.set::<f64>(ItemField::Vat, None);
        assert!(model.fields().is_empty());
    }

    #[test]
    fn object_derived_map_skips_values_of_the_wrong_kind() {
        let model: Model<ItemField> =
            Model::from_wire_map(wire(json!({"name": "Bolt", "price": "cheap", "vat": -1})));
        assert_eq!(model.get_f64(ItemField::Price), None);
        assert_eq!(
            model.to_field_map(),
            FieldMap::from([(ItemField::Name, json!("Bolt")), (ItemField::Vat, json!(-1))])
        );
    }

    #[test]
    fn set_nan_removes_the_key() {
        let mut model: Model<ItemField> = Model::new();
        model.set(ItemField::Price, Some(2.0));
        model.set(ItemField::Price, Some(f64::NAN));
        assert_eq!(model, Model::new());
    }

    #[test]
    fn equality_compares_presence() {
        let a: Model<ItemField> = Model::from_wire_map(wire(json!({"name": "Bolt"})));
        let b: Model<ItemField> =
            Model::from_wire_map(wire(json!({"name": "Bolt", "vat": null})));
        assert_ne!(a, b);
        assert_eq!(a, Model::from_wire_map(wire(json!({"name": "Bolt"}))));
    }

    #[test]
    fn serde_uses_wire_names() {
        let model: Model<ItemField> =
            serde_json::from_value(json!({"name": "Bolt", "quantity": 2})).unwrap();
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({"name": "Bolt", "quantity": 2})
        );
    }
}
