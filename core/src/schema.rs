//! Field schema: per-entity field keys, their wire names and value rules.
//!
//! # Design
//! Each entity type declares a closed enum of field keys. A key resolves to a
//! `FieldSpec` record (wire name, value kind, mandatory, read-only) through a
//! static table, so validation is a data-driven walk over the caller's map
//! rather than per-key dispatch. Keys of different entities are different
//! types and can never share a map.
//!
//! A `FieldMap` distinguishes "key absent" from "key present with null":
//! the server leaves absent fields untouched and clears null ones.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde_json::Value;

use crate::error::ValidationError;

/// Caller-facing map from field key to an untyped value. `Value::Null`
/// entries are meaningful and are sent as explicit nulls.
pub type FieldMap<K> = BTreeMap<K, Value>;

/// Shape a non-null value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    NonEmptyString,
    NonNegativeNumber,
    Boolean,
}

impl ValueKind {
    /// Whether `value` satisfies this kind. `Null` never does; null handling
    /// is decided by the caller from the key's `mandatory` flag.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::NonEmptyString => value.as_str().is_some_and(|s| !s.is_empty()),
            ValueKind::NonNegativeNumber => value
                .as_f64()
                .is_some_and(|n| n.is_finite() && n >= 0.0),
            ValueKind::Boolean => value.is_boolean(),
        }
    }

    /// Whether a typed accessor of this kind can read `value` at all. Looser
    /// than `accepts`: an empty name or a negative price is still readable.
    pub fn is_readable(self, value: &Value) -> bool {
        match self {
            ValueKind::String | ValueKind::NonEmptyString => value.is_string(),
            ValueKind::NonNegativeNumber => value.is_number(),
            ValueKind::Boolean => value.is_boolean(),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ValueKind::String => "a string",
            ValueKind::NonEmptyString => "a non-empty string",
            ValueKind::NonNegativeNumber => "a finite non-negative number",
            ValueKind::Boolean => "a boolean",
        }
    }
}

/// Static description of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub wire_name: &'static str,
    pub kind: ValueKind,
    pub mandatory: bool,
    /// Assigned by the server; readable from responses, never sent.
    pub read_only: bool,
}

impl FieldSpec {
    pub const fn optional(wire_name: &'static str, kind: ValueKind) -> Self {
        Self {
            wire_name,
            kind,
            mandatory: false,
            read_only: false,
        }
    }

    pub const fn mandatory(wire_name: &'static str, kind: ValueKind) -> Self {
        Self {
            wire_name,
            kind,
            mandatory: true,
            read_only: false,
        }
    }

    pub const fn read_only(wire_name: &'static str, kind: ValueKind) -> Self {
        Self {
            wire_name,
            kind,
            mandatory: false,
            read_only: true,
        }
    }
}

/// A field key of one entity type.
pub trait FieldKey: Copy + Ord + Debug + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Every key of the entity, in declaration order.
    const ALL: &'static [Self];

    fn spec(self) -> FieldSpec;

    fn wire_name(self) -> &'static str {
        self.spec().wire_name
    }

    fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.wire_name() == name)
    }

    /// Cross-field rules that only apply to creation payloads.
    fn check_entity_rules(_fields: &FieldMap<Self>) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Validate a complete (creation) payload.
///
/// Fails if a mandatory key is absent or null, if a read-only key is present,
/// if a non-null value has the wrong shape, or if an entity rule is broken.
/// Never mutates the map.
pub fn assert_correctly_initialized<K: FieldKey>(
    fields: &FieldMap<K>,
) -> Result<(), ValidationError> {
    for key in K::ALL.iter().copied().filter(|k| k.spec().mandatory) {
        if !fields.contains_key(&key) {
            return Err(ValidationError::MissingKey {
                entity: K::ENTITY,
                key: key.wire_name(),
            });
        }
    }
    check_present_values(fields)?;
    K::check_entity_rules(fields)
}

/// Validate a partial (update) payload. Mandatory keys may be omitted but
/// not cleared.
pub fn assert_valid_update<K: FieldKey>(fields: &FieldMap<K>) -> Result<(), ValidationError> {
    check_present_values(fields)
}

fn check_present_values<K: FieldKey>(fields: &FieldMap<K>) -> Result<(), ValidationError> {
    for (key, value) in fields {
        let spec = key.spec();
        if spec.read_only {
            return Err(ValidationError::ReadOnlyKey {
                entity: K::ENTITY,
                key: spec.wire_name,
            });
        }
        if value.is_null() {
            if spec.mandatory {
                return Err(ValidationError::NullMandatoryKey {
                    entity: K::ENTITY,
                    key: spec.wire_name,
                });
            }
            continue;
        }
        if !spec.kind.accepts(value) {
            return Err(ValidationError::BadValueType {
                entity: K::ENTITY,
                key: spec.wire_name,
                expected: spec.kind.describe(),
            });
        }
    }
    Ok(())
}

/// Require at least one of `keys` to be present and non-null.
pub fn require_one_of<K: FieldKey>(
    fields: &FieldMap<K>,
    keys: &[K],
) -> Result<(), ValidationError> {
    let satisfied = keys
        .iter()
        .any(|k| fields.get(k).is_some_and(|v| !v.is_null()));
    if satisfied {
        Ok(())
    } else {
        Err(ValidationError::MissingOneOf {
            entity: K::ENTITY,
            keys: keys.iter().map(|k| k.wire_name()).collect(),
        })
    }
}
